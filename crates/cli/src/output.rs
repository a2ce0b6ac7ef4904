//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output including colored status
//! messages, duration formatting, and Unicode symbols.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use slicedep_lib::config::Batch;
use slicedep_lib::evaluate::EvaluationResult;
use slicedep_lib::orchestrate::BatchResult;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const MODIFY: &str = "~";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Prints the per-source results of a batch followed by a summary.
pub fn print_batch(
  batch: &Batch,
  result: &BatchResult,
  elapsed: Duration,
  format: OutputFormat,
  dry_run: bool,
) -> anyhow::Result<()> {
  if format.is_json() {
    return print_json(result);
  }

  for source in &result.results {
    print_source(batch, source, dry_run);
  }
  for failure in &result.failures {
    print_error(&format!("{}: {}", failure.identity, failure.error));
  }

  println!();
  let rebuilt = result.rebuilt().saturating_sub(result.failures.len());
  if dry_run {
    print_stat("Stale", &result.rebuilt().to_string());
  } else {
    print_stat("Generated", &rebuilt.to_string());
    print_stat("Failed", &result.failures.len().to_string());
  }
  print_stat("Up to date", &(result.results.len() - result.rebuilt()).to_string());
  print_stat("Elapsed", &format_duration(elapsed));
  Ok(())
}

fn print_source(batch: &Batch, source: &EvaluationResult, dry_run: bool) {
  let outputs: Vec<String> = source.outputs.iter().map(|p| batch.context.display(p)).collect();
  let outputs = outputs.join(", ");

  if !source.build_required {
    print_success(&format!("{} {} {}", source.identity, symbols::ARROW, outputs));
    return;
  }

  let reason = source.reason.as_ref().map(|r| format!(" ({r})")).unwrap_or_default();
  if dry_run {
    println!(
      "{} {} {} {}{}",
      symbols::MODIFY.if_supports_color(Stream::Stdout, |s| s.yellow()),
      source.identity,
      symbols::ARROW,
      outputs,
      reason.if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  } else {
    print_info(&format!("{} {} {}{}", source.identity, symbols::ARROW, outputs, reason));
  }
}
