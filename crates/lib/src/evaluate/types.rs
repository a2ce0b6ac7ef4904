use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Why a source needs to be regenerated. The first failing check wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum StaleReason {
  SourceMissing,
  ArtifactMissing { artifact: PathBuf },
  GeneratorNewer { artifact: PathBuf },
  RecordAbsent,
  RecordCorrupt,
  /// The record at this source's path belongs to another source with the same stem.
  RecordForeign { owner: String },
  SourceNewer { target: PathBuf },
  OptionsChanged,
  DependencyMissing { dependency: PathBuf },
  DependencyNewer { dependency: PathBuf, artifact: PathBuf },
}

impl fmt::Display for StaleReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StaleReason::SourceMissing => write!(f, "source file doesn't exist"),
      StaleReason::ArtifactMissing { artifact } => {
        write!(f, "generated file {} doesn't exist", artifact.display())
      }
      StaleReason::GeneratorNewer { artifact } => {
        write!(f, "the generator is newer than {}", artifact.display())
      }
      StaleReason::RecordAbsent => write!(f, "dependency record doesn't exist"),
      StaleReason::RecordCorrupt => write!(f, "dependency record has invalid data"),
      StaleReason::RecordForeign { owner } => write!(f, "dependency record belongs to {owner}"),
      StaleReason::SourceNewer { target } => write!(f, "source is newer than {}", target.display()),
      StaleReason::OptionsChanged => write!(f, "build options have changed"),
      StaleReason::DependencyMissing { dependency } => {
        write!(f, "dependency {} doesn't exist", dependency.display())
      }
      StaleReason::DependencyNewer { dependency, artifact } => {
        write!(f, "{} is newer than {}", dependency.display(), artifact.display())
      }
    }
  }
}

/// Per-source outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
  pub identity: String,
  pub build_required: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reason: Option<StaleReason>,
  /// Source, recorded dependencies, then generator executable; absolute and unique.
  pub inputs: Vec<PathBuf>,
  /// Generated files, present whether or not a build is required.
  pub outputs: Vec<PathBuf>,
}
