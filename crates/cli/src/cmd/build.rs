//! Implementation of the `lwsbuild build` command.
//!
//! Fetches dependencies, builds every configured target, assembles the
//! universal library and stages headers, skipping whatever already exists.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use lwsbuild_lib::cache::Outcome;
use lwsbuild_lib::exec::SystemRunner;
use lwsbuild_lib::pipeline::Pipeline;

use super::Workspace;
use crate::output::{OutputFormat, format_bytes, format_duration, print_item, print_json, print_stat, print_success, symbols};

pub fn cmd_build(workspace: &Workspace, jobs: Option<usize>, verbose: bool, output: OutputFormat) -> Result<()> {
  let mut config = workspace.load_config()?;
  if let Some(jobs) = jobs {
    config = config.with_jobs(jobs).context("Invalid --jobs value")?;
  }

  let pipeline = Pipeline::new(Arc::new(SystemRunner), workspace.layout(), config);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(pipeline.build()).context("Build failed")?;

  if output.is_json() {
    return print_json(&report);
  }

  println!();
  print_success("Build complete!");
  print_stat("Targets built", &report.targets_built.to_string());
  print_stat("Artifacts produced", &report.built().to_string());
  print_stat("Artifacts cached", &report.cached().to_string());
  print_stat("Headers copied", &report.headers_copied.to_string());

  let size = std::fs::metadata(&report.fat_lib).map(|m| m.len()).unwrap_or(0);
  print_stat(
    "Universal library",
    &format!("{} ({})", report.fat_lib.display(), format_bytes(size)),
  );
  print_stat("Headers", &report.include_dir.display().to_string());
  print_stat("Duration", &format_duration(Duration::from_millis(report.elapsed_ms)));

  if verbose {
    println!();
    for step in &report.steps {
      let symbol = match step.outcome {
        Outcome::Built => symbols::ADD,
        Outcome::Cached => symbols::CACHED,
      };
      print_item(symbol, &step.artifact, &step.path);
    }
  }

  Ok(())
}
