//! The rebuild decision.
//!
//! [`evaluate`] runs a fixed sequence of checks against the filesystem and the
//! source's dependency record, cheapest first. The first failing check makes
//! the source stale and ends the evaluation:
//!
//! 1. the source exists
//! 2. every artifact exists
//! 3. the generator is not newer than the oldest artifact
//! 4. a record exists, parses, and belongs to this source
//! 5. the source is not newer than the record or the oldest artifact
//! 6. the recorded options equal the current options
//! 7. every recorded dependency exists and is not newer than the oldest artifact
//!
//! Timestamps are read fresh on every call.

mod types;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::record::{self, DependencyRecord, RecordLoad};
use crate::source::{BuildContext, SourceDescriptor};
use crate::timestamp::{self, Timestamp};
use crate::util::path::PathKey;

pub use types::{EvaluationResult, StaleReason};

/// Decides whether `source` must be regenerated.
pub fn evaluate(ctx: &BuildContext, source: &SourceDescriptor) -> EvaluationResult {
  let outputs = ctx.artifacts(source);
  let mut record = LazyRecord::new(ctx.record_path(source));

  let reason = stale_reason(ctx, source, &outputs, &mut record);

  match &reason {
    Some(reason) => debug!(source = %source.identity, "build required because {reason}"),
    None => info!("Skipping {} -> {}", source.identity, up_to_date_message(ctx, &outputs)),
  }

  let inputs = inputs(ctx, source, record.owned(ctx, source));
  EvaluationResult {
    identity: source.identity.clone(),
    build_required: reason.is_some(),
    reason,
    inputs,
    outputs,
  }
}

/// Source path, recorded dependencies and generator path, without duplicates.
pub fn inputs(ctx: &BuildContext, source: &SourceDescriptor, record: Option<&DependencyRecord>) -> Vec<PathBuf> {
  let dependencies = record.map(|r| r.depends_on.as_slice()).unwrap_or_default();
  let generator = ctx.generator_path();

  let mut seen = HashSet::new();
  std::iter::once(source.path.as_path())
    .chain(dependencies.iter().map(PathBuf::as_path))
    .chain(std::iter::once(generator.as_path()))
    .filter(|path| seen.insert(PathKey::new(path)))
    .map(Path::to_path_buf)
    .collect()
}

fn stale_reason(
  ctx: &BuildContext,
  source: &SourceDescriptor,
  outputs: &[PathBuf],
  record: &mut LazyRecord,
) -> Option<StaleReason> {
  if !timestamp::exists(&source.path) {
    return Some(StaleReason::SourceMissing);
  }

  let mut oldest: Option<(Timestamp, &PathBuf)> = None;
  for artifact in outputs {
    let Ok(modified) = timestamp::last_modified(artifact) else {
      return Some(StaleReason::ArtifactMissing {
        artifact: artifact.clone(),
      });
    };
    if oldest.is_none_or(|(t, _)| modified < t) {
      oldest = Some((modified, artifact));
    }
  }
  // Generators always produce at least one file.
  let (oldest, oldest_artifact) = oldest?;

  if timestamp::newer(timestamp::last_modified_or_oldest(&ctx.generator_path()), oldest) {
    return Some(StaleReason::GeneratorNewer {
      artifact: oldest_artifact.clone(),
    });
  }

  let record_path = record.path.clone();
  let found = match record.load() {
    RecordLoad::Found(found) => found,
    RecordLoad::Absent => return Some(StaleReason::RecordAbsent),
    RecordLoad::Corrupt => return Some(StaleReason::RecordCorrupt),
  };
  if !belongs_to(ctx, source, found) {
    return Some(StaleReason::RecordForeign {
      owner: found.source_path.clone(),
    });
  }

  let modified = timestamp::last_modified_or_oldest(&source.path);
  if timestamp::newer(modified, timestamp::last_modified_or_oldest(&record_path)) {
    return Some(StaleReason::SourceNewer { target: record_path });
  }
  if timestamp::newer(modified, oldest) {
    return Some(StaleReason::SourceNewer {
      target: oldest_artifact.clone(),
    });
  }

  if !found.options_match(&ctx.effective_options(source)) {
    return Some(StaleReason::OptionsChanged);
  }

  for dependency in &found.depends_on {
    let Ok(modified) = timestamp::last_modified(dependency) else {
      return Some(StaleReason::DependencyMissing {
        dependency: dependency.clone(),
      });
    };
    if timestamp::newer(modified, oldest) {
      return Some(StaleReason::DependencyNewer {
        dependency: dependency.clone(),
        artifact: oldest_artifact.clone(),
      });
    }
  }

  None
}

fn belongs_to(ctx: &BuildContext, source: &SourceDescriptor, record: &DependencyRecord) -> bool {
  record.source_path == source.identity || PathKey::new(&ctx.resolve(&record.source_path)) == PathKey::new(&source.path)
}

fn up_to_date_message(ctx: &BuildContext, outputs: &[PathBuf]) -> String {
  let names: Vec<String> = outputs.iter().map(|path| ctx.display(path)).collect();
  match names.as_slice() {
    [single] => format!("{single} is up to date"),
    _ => format!("{} are up to date", names.join(" and ")),
  }
}

/// A dependency record read at most once per evaluation.
struct LazyRecord {
  path: PathBuf,
  loaded: Option<RecordLoad>,
}

impl LazyRecord {
  fn new(path: PathBuf) -> Self {
    Self { path, loaded: None }
  }

  fn load(&mut self) -> &RecordLoad {
    self.loaded.get_or_insert_with(|| record::load(&self.path))
  }

  /// The record, if it is valid and belongs to `source`.
  fn owned(&mut self, ctx: &BuildContext, source: &SourceDescriptor) -> Option<&DependencyRecord> {
    match self.load() {
      RecordLoad::Found(found) if belongs_to(ctx, source, found) => Some(found),
      _ => None,
    }
  }
}
