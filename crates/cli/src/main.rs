mod cmd;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::BatchArgs;
use crate::output::OutputFormat;

/// slicedep - incremental dependency tracking for Slice code generation
#[derive(Parser)]
#[command(name = "slicedep")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Show debug logging
  #[arg(short, long, global = true, conflicts_with = "quiet")]
  verbose: bool,

  /// Only log warnings and errors
  #[arg(short, long, global = true)]
  quiet: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Report which sources need regeneration without running the generator
  Check(BatchArgs),

  /// Regenerate every stale source and update its dependency record
  Build(BatchArgs),
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose {
    "debug"
  } else if cli.quiet {
    "warn"
  } else {
    "info"
  };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .with_target(false)
    .init();

  match cli.command {
    Commands::Check(args) => cmd::cmd_check(&args, cli.format),
    Commands::Build(args) => cmd::cmd_build(&args, cli.format),
  }
}
