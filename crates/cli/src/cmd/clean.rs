//! Implementation of the `lwsbuild clean` command.

use anyhow::{Context, Result};

use lwsbuild_lib::clean::clean;

use super::Workspace;
use crate::output::{OutputFormat, print_info, print_json, print_success};

pub fn cmd_clean(workspace: &Workspace, output: OutputFormat) -> Result<()> {
  let layout = workspace.layout();
  let removed = clean(&layout).context("Clean failed")?;

  if output.is_json() {
    return print_json(&serde_json::json!({
      "output_dir": layout.output_dir(),
      "removed": removed,
    }));
  }

  if removed {
    print_success(&format!("Removed {}", layout.output_dir().display()));
  } else {
    print_info("Nothing to clean");
  }
  print_success(&format!("Initialized {}", layout.output_dir().display()));

  Ok(())
}
