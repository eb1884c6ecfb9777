//! The build pipeline.
//!
//! Runs the phases in a fixed order:
//!
//! ```text
//! Fetching -> Building (per target) -> Assembling -> Staging -> Done
//! ```
//!
//! Any failure aborts the run immediately. Artifacts completed before the
//! failure stay on disk and are picked up as cached by the next run.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::assemble::{self, AssembleError};
use crate::build::{self, BuildError};
use crate::cache::{Artifact, Outcome, Status};
use crate::clean::{self, CleanError};
use crate::config::BuildConfig;
use crate::exec::CommandRunner;
use crate::fetch::{self, FetchError};
use crate::headers::{self, HeaderError};
use crate::layout::OutputLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Fetching,
  Building,
  Assembling,
  Staging,
}

impl Phase {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Fetching => "fetching",
      Self::Building => "building",
      Self::Assembling => "assembling",
      Self::Staging => "staging",
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Clean(#[from] CleanError),

  #[error(transparent)]
  Build(#[from] BuildError),

  #[error(transparent)]
  Assemble(#[from] AssembleError),

  #[error(transparent)]
  Headers(#[from] HeaderError),
}

impl PipelineError {
  /// The phase that was running when the pipeline aborted.
  pub fn phase(&self) -> Phase {
    match self {
      Self::Fetch(_) => Phase::Fetching,
      // The output root is initialized right before the first target build
      Self::Clean(_) | Self::Build(_) => Phase::Building,
      Self::Assemble(_) => Phase::Assembling,
      Self::Headers(_) => Phase::Staging,
    }
  }
}

/// One artifact handled during a build.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
  pub phase: Phase,
  pub artifact: String,
  pub path: PathBuf,
  pub outcome: Outcome,
}

/// Summary of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
  pub root: PathBuf,
  pub steps: Vec<StepRecord>,
  pub targets_built: usize,
  pub headers_copied: usize,
  pub fat_lib: PathBuf,
  pub include_dir: PathBuf,
  pub elapsed_ms: u64,
}

impl BuildReport {
  pub fn built(&self) -> usize {
    self.steps.iter().filter(|s| s.outcome == Outcome::Built).count()
  }

  pub fn cached(&self) -> usize {
    self.steps.iter().filter(|s| s.outcome == Outcome::Cached).count()
  }

  fn record(&mut self, phase: Phase, artifact: &Artifact, outcome: Outcome) {
    self.steps.push(StepRecord {
      phase,
      artifact: artifact.name.clone(),
      path: artifact.path.clone(),
      outcome,
    });
  }
}

/// One artifact in a dry plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanEntry {
  pub phase: Phase,
  pub artifact: String,
  pub path: PathBuf,
  pub status: Status,
}

pub struct Pipeline<R> {
  runner: Arc<R>,
  layout: OutputLayout,
  config: BuildConfig,
}

impl<R: CommandRunner + 'static> Pipeline<R> {
  pub fn new(runner: Arc<R>, layout: OutputLayout, config: BuildConfig) -> Self {
    Self { runner, layout, config }
  }

  pub fn layout(&self) -> &OutputLayout {
    &self.layout
  }

  /// Run every phase, skipping artifacts that already exist.
  pub async fn build(&self) -> Result<BuildReport, PipelineError> {
    let start = Instant::now();
    let mut report = BuildReport {
      root: self.layout.root().to_path_buf(),
      steps: Vec::new(),
      targets_built: 0,
      headers_copied: 0,
      fat_lib: self.layout.fat_lib(),
      include_dir: self.layout.include_dir(),
      elapsed_ms: 0,
    };

    if let Err(e) = self.run_phases(&mut report).await {
      error!(phase = %e.phase(), error = %e, "pipeline aborted");
      return Err(e);
    }

    report.elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(
      built = report.built(),
      cached = report.cached(),
      elapsed_ms = report.elapsed_ms,
      "build complete"
    );
    Ok(report)
  }

  async fn run_phases(&self, report: &mut BuildReport) -> Result<(), PipelineError> {
    let runner = self.runner.as_ref();
    let layout = &self.layout;
    let config = &self.config;

    info!(phase = %Phase::Fetching, "fetching dependencies");
    for (artifact, outcome) in fetch::ensure_sources(runner, layout, config).await? {
      report.record(Phase::Fetching, &artifact, outcome);
    }
    let (artifact, outcome) = fetch::ensure_openssl(runner, layout).await?;
    report.record(Phase::Fetching, &artifact, outcome);

    clean::init_output_dir(layout)?;

    info!(phase = %Phase::Building, targets = config.targets.len(), jobs = config.jobs, "building targets");
    let thin_libs = build::build_targets(&self.runner, layout, config).await?;
    for (target, lib) in config.targets.iter().zip(thin_libs) {
      report.record(Phase::Building, &Artifact::new(target.to_string(), lib), Outcome::Built);
    }
    report.targets_built = config.targets.len();

    info!(phase = %Phase::Assembling, "assembling universal library");
    let (artifact, outcome) = assemble::assemble(runner, layout, config).await?;
    report.record(Phase::Assembling, &artifact, outcome);

    info!(phase = %Phase::Staging, "staging headers");
    let (artifact, outcome, copied) = headers::stage_headers(layout).await?;
    report.record(Phase::Staging, &artifact, outcome);
    report.headers_copied = copied;

    Ok(())
  }

  /// Delete and recreate the output root.
  pub fn clean(&self) -> Result<bool, PipelineError> {
    Ok(clean::clean(&self.layout)?)
  }

  /// Report what a build would do, without running anything.
  pub fn plan(&self) -> Vec<PlanEntry> {
    let layout = &self.layout;
    let config = &self.config;

    let entry = |phase: Phase, artifact: Artifact, status: Status| PlanEntry {
      phase,
      artifact: artifact.name,
      path: artifact.path,
      status,
    };

    let mut entries = Vec::new();
    for tree in fetch::source_trees(layout, config) {
      let status = tree.artifact.status();
      entries.push(entry(Phase::Fetching, tree.artifact, status));
    }

    let ssl = fetch::openssl_artifact(layout);
    let status = ssl.status();
    entries.push(entry(Phase::Fetching, ssl, status));

    for target in &config.targets {
      let lib = Artifact::new(target.to_string(), layout.thin_lib(target, config.configuration));
      entries.push(entry(Phase::Building, lib, Status::AlwaysRuns));
    }

    let fat = assemble::fat_lib_artifact(layout);
    let status = fat.status();
    entries.push(entry(Phase::Assembling, fat, status));

    let include = headers::include_artifact(layout);
    let status = include.status();
    entries.push(entry(Phase::Staging, include, status));

    entries
  }
}
