//! Batch configuration.
//!
//! A batch is either described by a JSON manifest or assembled by the caller.
//! Either way it ends up as a [`BuildContext`] plus a list of
//! [`SourceDescriptor`]s.
//!
//! ```json
//! {
//!   "generator": "cpp",
//!   "toolsPath": "/opt/ice/bin",
//!   "options": { "outputDir": "generated", "includeDirectories": ["slice"] },
//!   "sources": ["slice/Foo.ice", { "path": "slice/Bar.ice", "options": { "headerExt": "hpp" } }]
//! }
//! ```

mod types;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::TOOLS_PATH_ENV;
use crate::generator::GeneratorKind;
use crate::source::{BuildContext, BuildOptions, SourceDescriptor};
use crate::util::path::normalize;

pub use types::{BuildManifest, ConfigError, SourceEntry};

/// Reads and parses the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<BuildManifest, ConfigError> {
  let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  let manifest = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })?;
  debug!(path = %path.display(), "loaded manifest");
  Ok(manifest)
}

/// Picks the generator tools directory: the explicit `flag`, then
/// `SLICEDEP_TOOLS_PATH`, then `manifest`.
///
/// Relative flag and environment values are resolved against the current
/// directory. `manifest` is taken as given.
pub fn resolve_tools_path(flag: Option<&Path>, manifest: Option<&Path>) -> Result<PathBuf, ConfigError> {
  if let Some(path) = flag {
    return absolute(path);
  }
  if let Some(path) = env::var_os(TOOLS_PATH_ENV).filter(|v| !v.is_empty()) {
    debug!(env = TOOLS_PATH_ENV, "using tools path from environment");
    return absolute(Path::new(&path));
  }
  manifest.map(Path::to_path_buf).ok_or(ConfigError::MissingToolsPath)
}

/// A batch ready for evaluation.
#[derive(Debug, Clone)]
pub struct Batch {
  pub context: BuildContext,
  pub sources: Vec<SourceDescriptor>,
}

impl Batch {
  /// Builds a batch from explicit parts. `working_dir` must exist.
  pub fn new(
    working_dir: &Path,
    tools_path: &Path,
    generator: GeneratorKind,
    sources: impl IntoIterator<Item = (String, BuildOptions)>,
  ) -> Result<Self, ConfigError> {
    let working_dir = absolute_dir(working_dir)?;
    let sources: Vec<SourceDescriptor> = sources
      .into_iter()
      .map(|(identity, options)| SourceDescriptor::new(&working_dir, identity, options))
      .collect();
    if sources.is_empty() {
      return Err(ConfigError::NoSources);
    }
    let context = BuildContext::new(working_dir, tools_path, generator);
    Ok(Self { context, sources })
  }

  /// Builds a batch from a manifest located at `manifest_path`.
  pub fn from_manifest(
    manifest: &BuildManifest,
    manifest_path: &Path,
    tools_flag: Option<&Path>,
  ) -> Result<Self, ConfigError> {
    let manifest_dir = manifest_path
      .parent()
      .filter(|p| !p.as_os_str().is_empty())
      .unwrap_or(Path::new("."));
    let manifest_dir = absolute_dir(manifest_dir)?;
    let working_dir = match &manifest.working_directory {
      Some(dir) => normalize(&manifest_dir, dir),
      None => manifest_dir.clone(),
    };

    // A toolsPath in the manifest is relative to the manifest, not the working directory.
    let manifest_tools = manifest.tools_path.as_ref().map(|p| normalize(&manifest_dir, p));
    let tools_path = resolve_tools_path(tools_flag, manifest_tools.as_deref())?;

    let sources = manifest
      .sources
      .iter()
      .map(|entry| (entry.path().to_string(), entry.options(&manifest.options).clone()));
    Self::new(&working_dir, &tools_path, manifest.generator, sources)
  }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
  if path.is_absolute() {
    return Ok(path.to_path_buf());
  }
  let cwd = env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(normalize(&cwd, path))
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
  let absolute = absolute(dir)?;
  match fs::metadata(&absolute) {
    Ok(meta) if meta.is_dir() => Ok(absolute),
    Ok(_) => Err(ConfigError::WorkingDirectory {
      path: absolute,
      source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
    }),
    Err(source) => Err(ConfigError::WorkingDirectory { path: absolute, source }),
  }
}
