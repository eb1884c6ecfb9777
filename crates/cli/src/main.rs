mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{Workspace, cmd_build, cmd_clean, cmd_plan};
use crate::output::OutputFormat;

/// lwsbuild - build a universal iOS libwebsockets static library
#[derive(Parser)]
#[command(name = "lwsbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Directory holding the Xcode project, source trees and `out/`
  /// (default: $LWSBUILD_ROOT, then the current directory)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Path to the config file (default: <root>/lwsbuild.toml, if present)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Fetch dependencies, build every target and assemble the universal library (default)
  Build {
    /// Number of targets to build concurrently (overrides `jobs` in the config)
    #[arg(short, long)]
    jobs: Option<usize>,
  },

  /// Remove the output directory and recreate it empty
  Clean,

  /// Show which artifacts are cached and which a build would produce
  Plan,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();

  let workspace = Workspace::resolve(cli.root, cli.config)?;

  match cli.command.unwrap_or(Commands::Build { jobs: None }) {
    Commands::Build { jobs } => cmd_build(&workspace, jobs, cli.verbose, cli.output),
    Commands::Clean => cmd_clean(&workspace, cli.output),
    Commands::Plan => cmd_plan(&workspace, cli.output),
  }
}
