//! Implementation of the `slicedep build` command.

use anyhow::{Result, bail};

use slicedep_lib::orchestrate::BatchOptions;

use crate::output::{OutputFormat, print_batch};

use super::batch::{self, BatchArgs};

pub fn cmd_build(args: &BatchArgs, format: OutputFormat) -> Result<()> {
  let batch = args.load()?;
  let (result, elapsed) = batch::run(&batch, &BatchOptions::default())?;
  print_batch(&batch, &result, elapsed, format, false)?;

  if !result.is_success() {
    bail!("{} of {} source(s) failed to generate", result.failures.len(), result.results.len());
  }
  Ok(())
}
