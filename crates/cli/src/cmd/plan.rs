//! Implementation of the `lwsbuild plan` command.
//!
//! Reports, without running anything, which artifacts a build would produce
//! and which it would reuse.

use std::sync::Arc;

use anyhow::Result;

use lwsbuild_lib::cache::Status;
use lwsbuild_lib::exec::SystemRunner;
use lwsbuild_lib::pipeline::Pipeline;

use super::Workspace;
use crate::output::{OutputFormat, print_item, print_json, print_stat, symbols};

pub fn cmd_plan(workspace: &Workspace, output: OutputFormat) -> Result<()> {
  let config = workspace.load_config()?;
  let pipeline = Pipeline::new(Arc::new(SystemRunner), workspace.layout(), config);
  let entries = pipeline.plan();

  if output.is_json() {
    return print_json(&entries);
  }

  println!("Plan: {}", workspace.root.display());
  let mut phase = None;
  for entry in &entries {
    if phase != Some(entry.phase) {
      println!("{}:", entry.phase);
      phase = Some(entry.phase);
    }
    let symbol = match entry.status {
      Status::Missing => symbols::ADD,
      Status::AlwaysRuns => symbols::REBUILD,
      Status::Present => symbols::CACHED,
    };
    print_item(symbol, &entry.artifact, &entry.path);
  }

  let count = |status: Status| entries.iter().filter(|e| e.status == status).count().to_string();
  println!();
  print_stat("To produce", &count(Status::Missing));
  print_stat("Always rebuilt", &count(Status::AlwaysRuns));
  print_stat("Cached", &count(Status::Present));

  Ok(())
}
