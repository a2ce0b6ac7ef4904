//! Implementation of the `slicedep check` command.
//!
//! Evaluates every source and reports which ones need regeneration. The
//! generator is never run and no record is written, though corrupt records
//! are still removed.

use anyhow::Result;

use slicedep_lib::orchestrate::BatchOptions;

use crate::output::{OutputFormat, print_batch};

use super::batch::{self, BatchArgs};

pub fn cmd_check(args: &BatchArgs, format: OutputFormat) -> Result<()> {
  let batch = args.load()?;
  let (result, elapsed) = batch::run(&batch, &BatchOptions { dry_run: true })?;
  print_batch(&batch, &result, elapsed, format, true)
}
