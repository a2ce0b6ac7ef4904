use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::RECORD_VERSION;
use crate::generator::OptionMap;
use crate::util::path::PathKey;

/// What a source depended on, and under which options, when its artifacts
/// were last generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DependencyRecord {
  pub version: u32,
  /// Logical path of the source this record describes.
  pub source_path: String,
  /// Absolute paths of everything the source transitively includes.
  pub depends_on: Vec<PathBuf>,
  pub options: OptionMap,
}

impl DependencyRecord {
  /// Creates a record, dropping duplicate dependencies while keeping first-seen order.
  pub fn new(source_path: impl Into<String>, depends_on: Vec<PathBuf>, options: OptionMap) -> Self {
    let mut seen = HashSet::new();
    let depends_on = depends_on
      .into_iter()
      .filter(|path| seen.insert(PathKey::new(path)))
      .collect();
    Self {
      version: RECORD_VERSION,
      source_path: source_path.into(),
      depends_on,
      options,
    }
  }

  /// True if the recorded options are exactly `current`: same keys, same values.
  pub fn options_match(&self, current: &OptionMap) -> bool {
    &self.options == current
  }
}

/// Outcome of reading a record file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLoad {
  Found(DependencyRecord),
  Absent,
  /// The file existed but did not parse; it has been removed.
  Corrupt,
}

#[derive(Debug, Error)]
pub enum RecordError {
  #[error("failed to create record directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to serialize dependency record: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write dependency record {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}
