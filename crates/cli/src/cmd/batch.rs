//! Arguments shared by `check` and `build`, and the batch they describe.
//!
//! Without positional sources the batch comes from a manifest
//! (`slicedep.json` in the current directory unless `--manifest` says
//! otherwise). With sources, the option flags apply to all of them.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use slicedep_lib::config::{Batch, load_manifest, resolve_tools_path};
use slicedep_lib::consts::MANIFEST_FILENAME;
use slicedep_lib::generator::GeneratorKind;
use slicedep_lib::orchestrate::{BatchOptions, BatchResult, evaluate_all};
use slicedep_lib::source::BuildOptions;

#[derive(Debug, Args)]
pub struct BatchArgs {
  /// Build manifest to read (default: slicedep.json)
  #[arg(short, long, conflicts_with = "sources")]
  pub manifest: Option<PathBuf>,

  /// Generator to run: cpp or csharp
  #[arg(short, long, default_value = "cpp")]
  pub generator: GeneratorKind,

  /// Directory containing the generator executable
  #[arg(long, value_name = "DIR")]
  pub tools_path: Option<PathBuf>,

  /// Directory the generator runs in and relative paths resolve against
  #[arg(short = 'C', long, value_name = "DIR")]
  pub working_dir: Option<PathBuf>,

  /// Output directory for generated files
  #[arg(short, long, value_name = "DIR")]
  pub output_dir: Option<String>,

  /// Slice include directory (repeatable)
  #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
  pub include_directories: Vec<String>,

  /// Extension of generated C++ headers
  #[arg(long, value_name = "EXT")]
  pub header_ext: Option<String>,

  /// Extension of generated C++ sources
  #[arg(long, value_name = "EXT")]
  pub source_ext: Option<String>,

  /// Directory generated C++ headers are moved into
  #[arg(long, value_name = "DIR")]
  pub header_output_dir: Option<String>,

  /// Prefix for #include directives in generated C++ code
  #[arg(long, value_name = "DIR")]
  pub include_prefix: Option<String>,

  /// Extra generator flags, shell-quoted
  #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
  pub additional_options: Option<String>,

  /// Slice files to evaluate
  pub sources: Vec<String>,
}

impl BatchArgs {
  /// Options from the flags, on top of the defaults.
  fn build_options(&self) -> BuildOptions {
    let defaults = BuildOptions::default();
    BuildOptions {
      output_dir: self.output_dir.clone().unwrap_or(defaults.output_dir),
      include_directories: self.include_directories.clone(),
      additional_options: self.additional_options.clone(),
      header_ext: self.header_ext.clone().unwrap_or(defaults.header_ext),
      source_ext: self.source_ext.clone().unwrap_or(defaults.source_ext),
      header_output_dir: self.header_output_dir.clone(),
      base_directory_for_generated_include: self.include_prefix.clone(),
    }
  }

  pub fn load(&self) -> Result<Batch> {
    if self.sources.is_empty() {
      let path = self.manifest.clone().unwrap_or_else(|| PathBuf::from(MANIFEST_FILENAME));
      let manifest = load_manifest(&path)?;
      return Batch::from_manifest(&manifest, &path, self.tools_path.as_deref())
        .with_context(|| format!("Invalid manifest: {}", path.display()));
    }

    let working_dir = self.working_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let tools_path = resolve_tools_path(self.tools_path.as_deref(), None)?;
    let options = self.build_options();
    let sources = self.sources.iter().map(|source| (source.clone(), options.clone()));
    Ok(Batch::new(&working_dir, &tools_path, self.generator, sources)?)
  }
}

/// Runs a batch and returns its result with the elapsed time.
pub fn run(batch: &Batch, options: &BatchOptions) -> Result<(BatchResult, Duration)> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  debug!(sources = batch.sources.len(), dry_run = options.dry_run, "evaluating batch");
  let started = Instant::now();
  let result = rt.block_on(evaluate_all(&batch.context, &batch.sources, options));
  Ok((result, started.elapsed()))
}
