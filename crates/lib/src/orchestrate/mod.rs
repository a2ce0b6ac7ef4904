//! Batch evaluation over a list of sources.
//!
//! Sources are handled one after another, in the order given, and the results
//! keep that order. A failed generation is recorded and the batch moves on.

mod types;

use tracing::{info, warn};

use crate::evaluate::{self, EvaluationResult};
use crate::generate;
use crate::source::{BuildContext, SourceDescriptor};

pub use types::{BatchOptions, BatchResult, SourceFailure};

/// Evaluates every source, generating the stale ones unless `options.dry_run` is set.
pub async fn evaluate_all(ctx: &BuildContext, sources: &[SourceDescriptor], options: &BatchOptions) -> BatchResult {
  let mut batch = BatchResult::default();

  for source in sources {
    let result = evaluate::evaluate(ctx, source);
    let result = if result.build_required && !options.dry_run {
      match generate::run(ctx, source).await {
        Ok(outcome) => EvaluationResult {
          inputs: evaluate::inputs(ctx, source, Some(&outcome.record)),
          outputs: ctx.artifacts(source),
          ..result
        },
        Err(error) => {
          warn!(source = %source.identity, error = %error, "generation failed");
          batch.failures.push(SourceFailure {
            identity: source.identity.clone(),
            error,
          });
          result
        }
      }
    } else {
      result
    };

    batch.update_depends |= result.build_required;
    batch.results.push(result);
  }

  info!(
    sources = batch.results.len(),
    rebuilt = batch.rebuilt(),
    failed = batch.failures.len(),
    dry_run = options.dry_run,
    "evaluation finished"
  );
  batch
}
