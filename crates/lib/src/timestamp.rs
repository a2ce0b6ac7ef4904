//! Filesystem timestamp queries.
//!
//! Modification times are reduced to signed nanoseconds relative to the Unix
//! epoch, so comparisons behave identically on every platform and never
//! depend on formatted time strings. Nothing here is cached: the generator
//! rewrites files between queries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimestampError {
  #[error("file not found: {0}")]
  NotFound(PathBuf),

  #[error("failed to read metadata of {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A file modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i128);

impl Timestamp {
  /// Older than every real file; stands in for timestamps that cannot be read.
  pub const OLDEST: Timestamp = Timestamp(i128::MIN);

  pub fn from_system_time(time: SystemTime) -> Self {
    match time.duration_since(UNIX_EPOCH) {
      Ok(after) => Timestamp(after.as_nanos() as i128),
      Err(before) => Timestamp(-(before.duration().as_nanos() as i128)),
    }
  }

  pub fn as_nanos(self) -> i128 {
    self.0
  }
}

/// Returns true if `path` exists (following symlinks).
pub fn exists(path: &Path) -> bool {
  fs::metadata(path).is_ok()
}

/// Returns the last modification time of `path`.
pub fn last_modified(path: &Path) -> Result<Timestamp, TimestampError> {
  let metadata = fs::metadata(path).map_err(|e| map_err(path, e))?;
  let modified = metadata.modified().map_err(|e| map_err(path, e))?;
  Ok(Timestamp::from_system_time(modified))
}

/// Like [`last_modified`], but an unreadable or missing file is older than anything.
pub fn last_modified_or_oldest(path: &Path) -> Timestamp {
  last_modified(path).unwrap_or(Timestamp::OLDEST)
}

/// Returns true if `a` is strictly newer than `b`.
pub fn newer(a: Timestamp, b: Timestamp) -> bool {
  a > b
}

fn map_err(path: &Path, err: io::Error) -> TimestampError {
  if err.kind() == io::ErrorKind::NotFound {
    TimestampError::NotFound(path.to_path_buf())
  } else {
    TimestampError::Io {
      path: path.to_path_buf(),
      source: err,
    }
  }
}
