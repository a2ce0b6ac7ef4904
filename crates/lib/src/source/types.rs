use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_OUTPUT_DIR;
use crate::util::path::normalize;

/// Per-source build options, as supplied by the host build.
///
/// Directory values are kept in the spelling the caller used; they are
/// resolved against the working directory only when touching the filesystem.
/// The C++-only fields are ignored by other generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BuildOptions {
  pub output_dir: String,
  pub include_directories: Vec<String>,
  /// Extra generator flags, shell-quoted.
  pub additional_options: Option<String>,
  pub header_ext: String,
  pub source_ext: String,
  pub header_output_dir: Option<String>,
  pub base_directory_for_generated_include: Option<String>,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      output_dir: DEFAULT_OUTPUT_DIR.to_string(),
      include_directories: Vec::new(),
      additional_options: None,
      header_ext: "h".to_string(),
      source_ext: "cpp".to_string(),
      header_output_dir: None,
      base_directory_for_generated_include: None,
    }
  }
}

/// A Slice source file scheduled for evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
  /// Logical path, as named by the host build and passed to the generator.
  pub identity: String,
  /// Normalized absolute path.
  pub path: PathBuf,
  pub options: BuildOptions,
}

impl SourceDescriptor {
  pub fn new(working_dir: &Path, identity: impl Into<String>, options: BuildOptions) -> Self {
    let identity = identity.into();
    let path = normalize(working_dir, &identity);
    Self {
      identity,
      path,
      options,
    }
  }

  /// File name of the identity without its extension (`slice/Foo.ice` -> `Foo`).
  pub fn stem(&self) -> String {
    Path::new(&self.identity)
      .file_stem()
      .map(|s| s.to_string_lossy().into_owned())
      .unwrap_or_else(|| self.identity.clone())
  }
}
