//! Path-addressed artifact cache.
//!
//! Every artifact the pipeline produces is keyed by its path. Presence means
//! "already built": the producer is skipped and the artifact is never
//! re-validated, even if stale.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

/// What happened to an artifact during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  /// Already present, producer skipped.
  Cached,
  /// Absent, producer ran and succeeded.
  Built,
}

/// Artifact status as reported by a dry plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
  Present,
  Missing,
  /// Produced on every run regardless of what is on disk.
  AlwaysRuns,
}

/// A named, path-keyed build product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  pub name: String,
  pub path: PathBuf,
}

impl Artifact {
  pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self {
      name: name.into(),
      path: path.into(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn is_present(&self) -> bool {
    self.path.exists()
  }

  pub fn status(&self) -> Status {
    if self.is_present() {
      Status::Present
    } else {
      Status::Missing
    }
  }

  /// Run `produce` only if the artifact is absent.
  ///
  /// The producer is responsible for leaving the artifact at `self.path` on
  /// success; a producer error is returned unchanged.
  pub async fn ensure<F, Fut, E>(&self, produce: F) -> Result<Outcome, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), E>>,
  {
    if self.is_present() {
      debug!(artifact = %self.name, path = %self.path.display(), "artifact present, skipping");
      return Ok(Outcome::Cached);
    }

    info!(artifact = %self.name, path = %self.path.display(), "producing artifact");
    produce().await?;
    Ok(Outcome::Built)
  }
}
