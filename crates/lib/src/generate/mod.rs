//! Running the generator for a stale source.
//!
//! A generation is two generator invocations: one that writes the artifacts,
//! and a follow-up with `--depend-xml` whose report becomes the source's new
//! [`DependencyRecord`]. Nothing is persisted unless both succeed, so a failed
//! run leaves the previous record in charge.

mod depend;
mod diagnostics;
mod process;
mod types;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::record::{self, DependencyRecord};
use crate::source::{BuildContext, SourceDescriptor};
use crate::generator::command_arguments;
use crate::timestamp;

pub use depend::{DependReport, ReportError, ReportedSource, parse_report};
pub use diagnostics::{DiagnosticParser, report};
pub use process::{ProcessOutput, run as run_process};
pub use types::{Diagnostic, DiagnosticKind, GenerateError, GenerationOutcome};

/// Generates the artifacts of `source` and persists its fresh dependency record.
pub async fn run(ctx: &BuildContext, source: &SourceDescriptor) -> Result<GenerationOutcome, GenerateError> {
  let generator = ctx.generator();
  let program = ctx.generator_path();

  if !timestamp::exists(&program) {
    let err = GenerateError::GeneratorNotFound { path: program };
    error!("{err}");
    return Err(err);
  }

  let output_dir = ctx.resolve(&source.options.output_dir);
  fs::create_dir_all(&output_dir).map_err(|e| GenerateError::io(&output_dir, e))?;

  let options = ctx.effective_options(source);
  let artifacts = ctx.artifacts(source);
  info!(
    "Compiling {} Generating -> {}",
    source.identity,
    artifacts.iter().map(|a| ctx.display(a)).collect::<Vec<_>>().join(" and ")
  );

  let mut diagnostics = Vec::new();

  let args = command_arguments(generator, &options, None, &source.identity)?;
  run_pass(ctx, source, &program, &args, false, &mut diagnostics).await?;

  generator.finish(ctx, source)?;

  let depend_file = tempfile::Builder::new()
    .prefix(&format!(".{}.", source.stem()))
    .suffix(".xml")
    .tempfile_in(&output_dir)
    .map_err(|e| GenerateError::io(&output_dir, e))?
    .into_temp_path();
  let args = command_arguments(generator, &options, Some(&*depend_file), &source.identity)?;
  run_pass(ctx, source, &program, &args, true, &mut diagnostics).await?;

  let xml = fs::read_to_string(&depend_file).map_err(|e| GenerateError::io(&depend_file, e))?;
  let report = parse_report(&xml).map_err(|e| GenerateError::DependReport {
    path: depend_file.to_path_buf(),
    source: e,
  })?;

  let depends_on: Vec<PathBuf> = report
    .dependencies_of(&ctx.working_dir, &source.identity)
    .iter()
    .map(|dep| ctx.resolve(dep))
    .collect();
  debug!(source = %source.identity, dependencies = depends_on.len(), "collected dependencies");

  let record = DependencyRecord::new(source.identity.clone(), depends_on, options);
  record::save(&record, &ctx.record_path(source))?;

  Ok(GenerationOutcome { record, diagnostics })
}

/// One generator invocation. Diagnostics are logged and collected; a non-zero
/// exit fails the generation with the diagnostic text attached.
async fn run_pass(
  ctx: &BuildContext,
  source: &SourceDescriptor,
  program: &Path,
  args: &[String],
  depend_mode: bool,
  diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), GenerateError> {
  debug!(command = %command_line(program, args), "running generator");
  let output = run_process(program, args, &ctx.working_dir).await?;

  let generator = ctx.generator();
  let executable = generator.executable_name();
  let mut parser = DiagnosticParser::new(generator.tool_name(), &executable, &ctx.working_dir, depend_mode);
  let mut found = parser.parse(&output.stderr);
  found.extend(parser.parse(&output.stdout));
  for diagnostic in &found {
    report(diagnostic);
  }

  if !output.status.success() {
    let text = if found.is_empty() {
      [output.stderr.trim(), output.stdout.trim()]
        .into_iter()
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .to_string()
    } else {
      found.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    };
    diagnostics.extend(found);
    return Err(GenerateError::GenerationFailed {
      identity: source.identity.clone(),
      code: output.status.code(),
      diagnostics: text,
    });
  }

  diagnostics.extend(found);
  Ok(())
}

fn command_line(program: &Path, args: &[String]) -> String {
  let mut words = vec![program.display().to_string()];
  words.extend(args.iter().cloned());
  shell_words::join(words)
}
