//! External process execution.
//!
//! Every external tool (git, xcodebuild, xcrun, lipo, the OpenSSL build
//! script) is reached through [`CommandRunner`]. Each [`Invocation`] carries
//! its own working directory; the process-wide current directory is never
//! changed.

mod system;

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::shell::quote;

pub use system::SystemRunner;

/// Errors from running an external process.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The process ran and exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {command}")]
  Failed { command: String, code: Option<i32> },

  /// The process could not be started at all.
  #[error("failed to spawn '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },
}

/// A program, its arguments and the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: OsString,
  pub args: Vec<OsString>,
  pub cwd: PathBuf,
}

impl Invocation {
  pub fn new(program: impl Into<OsString>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.into(),
    }
  }

  pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn program_name(&self) -> String {
    self.program.to_string_lossy().into_owned()
  }

  /// Arguments as lossy UTF-8 strings.
  pub fn arg_strings(&self) -> Vec<String> {
    self.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
  }

  /// Returns the value following `flag`, e.g. `-sdk <value>`.
  pub fn flag_value(&self, flag: &str) -> Option<&OsStr> {
    let pos = self.args.iter().position(|a| a.as_os_str() == OsStr::new(flag))?;
    self.args.get(pos + 1).map(OsString::as_os_str)
  }

  /// The invocation as a shell-quoted command line, for logs and errors.
  pub fn command_line(&self) -> String {
    std::iter::once(&self.program)
      .chain(self.args.iter())
      .map(|part| quote(&part.to_string_lossy()))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.command_line())
  }
}

/// Runs external processes.
///
/// There are no retries: a nonzero exit is returned as
/// [`ExecError::Failed`] and callers abort on it.
pub trait CommandRunner: Send + Sync {
  /// Run to completion with inherited stdio.
  fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<(), ExecError>> + Send;

  /// Run to completion and return stdout with surrounding whitespace trimmed.
  fn capture(&self, invocation: &Invocation) -> impl Future<Output = Result<String, ExecError>> + Send;
}
