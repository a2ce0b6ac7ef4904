use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generator::GeneratorKind;
use crate::source::BuildOptions;

/// A batch of sources to evaluate, as read from `slicedep.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildManifest {
  pub generator: GeneratorKind,
  /// Directory containing the generator executable.
  #[serde(default)]
  pub tools_path: Option<PathBuf>,
  /// Defaults to the manifest's own directory.
  #[serde(default)]
  pub working_directory: Option<PathBuf>,
  /// Options for every source without its own.
  #[serde(default)]
  pub options: BuildOptions,
  pub sources: Vec<SourceEntry>,
}

/// A source in a manifest: either a bare path or a path with its own options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
  Path(String),
  Detailed {
    path: String,
    /// Replaces the manifest-wide options entirely.
    #[serde(default)]
    options: Option<BuildOptions>,
  },
}

impl SourceEntry {
  pub fn path(&self) -> &str {
    match self {
      SourceEntry::Path(path) => path,
      SourceEntry::Detailed { path, .. } => path,
    }
  }

  pub fn options<'a>(&'a self, defaults: &'a BuildOptions) -> &'a BuildOptions {
    match self {
      SourceEntry::Detailed {
        options: Some(options), ..
      } => options,
      _ => defaults,
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read manifest {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse manifest {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("no generator tools path: pass --tools-path, set SLICEDEP_TOOLS_PATH, or add toolsPath to the manifest")]
  MissingToolsPath,

  #[error("working directory {path} is not accessible: {source}")]
  WorkingDirectory {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("no sources to evaluate")]
  NoSources,
}
