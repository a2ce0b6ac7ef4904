use serde::{Serialize, Serializer};

use crate::evaluate::EvaluationResult;
use crate::generate::GenerateError;

/// Options for a batch evaluation.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
  /// Only evaluate staleness; never run the generator.
  pub dry_run: bool,
}

/// A source whose generation failed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFailure {
  pub identity: String,
  #[serde(serialize_with = "serialize_display")]
  pub error: GenerateError,
}

/// Outcome of evaluating a list of sources.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
  /// One result per source, in input order.
  pub results: Vec<EvaluationResult>,
  /// True if any source required a rebuild.
  pub update_depends: bool,
  pub failures: Vec<SourceFailure>,
}

impl BatchResult {
  pub fn is_success(&self) -> bool {
    self.failures.is_empty()
  }

  /// Number of sources that required a rebuild.
  pub fn rebuilt(&self) -> usize {
    self.results.iter().filter(|r| r.build_required).count()
  }
}

fn serialize_display<S: Serializer>(error: &GenerateError, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.collect_str(error)
}
