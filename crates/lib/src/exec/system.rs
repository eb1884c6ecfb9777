use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use super::{CommandRunner, ExecError, Invocation};

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
  fn command(invocation: &Invocation) -> Command {
    let mut command = Command::new(&invocation.program);
    command
      .args(&invocation.args)
      .current_dir(&invocation.cwd)
      // Parallel target builds are cancelled by dropping their futures
      .kill_on_drop(true);
    command
  }

  fn spawn_error(invocation: &Invocation, source: std::io::Error) -> ExecError {
    ExecError::Spawn {
      program: invocation.program_name(),
      source,
    }
  }
}

impl CommandRunner for SystemRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), ExecError> {
    info!(cmd = %invocation, "executing command");
    debug!(cwd = ?invocation.cwd, "spawning process");

    let status = Self::command(invocation)
      .stdin(Stdio::null())
      .status()
      .await
      .map_err(|e| Self::spawn_error(invocation, e))?;

    if !status.success() {
      return Err(ExecError::Failed {
        command: invocation.command_line(),
        code: status.code(),
      });
    }

    Ok(())
  }

  async fn capture(&self, invocation: &Invocation) -> Result<String, ExecError> {
    debug!(cmd = %invocation, cwd = ?invocation.cwd, "capturing command output");

    let output = Self::command(invocation)
      .stdin(Stdio::null())
      .output()
      .await
      .map_err(|e| Self::spawn_error(invocation, e))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if !stderr.is_empty() {
        debug!(stderr = %stderr, "command stderr");
      }

      return Err(ExecError::Failed {
        command: invocation.command_line(),
        code: output.status.code(),
      });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    debug!(stdout = %stdout, "command output");

    Ok(stdout)
  }
}
