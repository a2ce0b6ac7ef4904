//! Reading and writing dependency record files.
//!
//! Records are pretty-printed JSON so they can be diffed by hand. Writes go
//! to a uniquely named temporary file in the same directory which is then
//! renamed over the record, so a reader never observes a partial record.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::consts::RECORD_VERSION;

use super::types::{DependencyRecord, RecordError, RecordLoad};

/// Loads the record at `path`.
///
/// A record that fails to parse, or carries an unknown version, is deleted
/// (best effort) and reported as [`RecordLoad::Corrupt`].
pub fn load(path: &Path) -> RecordLoad {
  let content = match fs::read(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return RecordLoad::Absent,
    Err(e) => {
      warn!(path = %path.display(), error = %e, "failed to read dependency record");
      return RecordLoad::Absent;
    }
  };

  match serde_json::from_slice::<DependencyRecord>(&content) {
    Ok(record) if record.version == RECORD_VERSION => RecordLoad::Found(record),
    Ok(record) => {
      debug!(path = %path.display(), version = record.version, "unsupported dependency record version");
      discard(path);
      RecordLoad::Corrupt
    }
    Err(e) => {
      debug!(path = %path.display(), error = %e, "dependency record has invalid data");
      discard(path);
      RecordLoad::Corrupt
    }
  }
}

/// Writes `record` to `path`, replacing any previous record atomically.
pub fn save(record: &DependencyRecord, path: &Path) -> Result<(), RecordError> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(dir).map_err(|source| RecordError::CreateDir {
    path: dir.to_path_buf(),
    source,
  })?;

  let content = serde_json::to_string_pretty(record).map_err(RecordError::Serialize)?;

  let write_err = |source: io::Error| RecordError::Write {
    path: path.to_path_buf(),
    source,
  };
  let mut temp = tempfile::Builder::new()
    .prefix(".record-")
    .suffix(".tmp")
    .tempfile_in(dir)
    .map_err(write_err)?;
  temp.write_all(content.as_bytes()).map_err(write_err)?;
  temp.write_all(b"\n").map_err(write_err)?;
  temp.as_file().sync_all().map_err(write_err)?;
  temp.persist(path).map_err(|e| write_err(e.error))?;

  debug!(path = %path.display(), dependencies = record.depends_on.len(), "saved dependency record");
  Ok(())
}

fn discard(path: &Path) {
  if let Err(e) = fs::remove_file(path) {
    debug!(path = %path.display(), error = %e, "failed to remove corrupt dependency record");
  }
}
