//! Per-target xcodebuild orchestration.
//!
//! Every configured target is compiled into its own `SYMROOT` below
//! `out/xcode-build/`. There is no existence check here: xcodebuild is
//! incremental and always writes to the same product path, so running it
//! again is cheap.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::exec::{CommandRunner, ExecError, Invocation};
use crate::layout::OutputLayout;
use crate::platform::{BuildTarget, Platform};

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("failed to create build directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to resolve {sdk} SDK path: {source}")]
  SdkLookup {
    sdk: &'static str,
    #[source]
    source: ExecError,
  },

  #[error("xcodebuild failed for {target}: {source}")]
  Xcodebuild {
    target: String,
    #[source]
    source: ExecError,
  },

  #[error("build task failed: {0}")]
  Task(#[from] JoinError),
}

/// Ask the toolchain where the platform's SDK lives.
///
/// Not cached; every target performs its own lookup.
pub async fn sdk_path<R: CommandRunner>(
  runner: &R,
  config: &BuildConfig,
  platform: Platform,
  cwd: PathBuf,
) -> Result<String, BuildError> {
  let lookup = Invocation::new(&config.tools.xcrun, cwd)
    .args(["-sdk", platform.sdk(), "--show-sdk-path"]);

  let path = runner.capture(&lookup).await.map_err(|source| BuildError::SdkLookup {
    sdk: platform.sdk(),
    source,
  })?;

  debug!(sdk = platform.sdk(), path = %path, "resolved SDK path");
  Ok(path)
}

/// The xcodebuild invocation for one target.
///
/// The process runs inside the target's own build directory and gets an
/// absolute project path, so concurrent builds never share a working directory.
pub fn xcodebuild_invocation(
  layout: &OutputLayout,
  config: &BuildConfig,
  target: &BuildTarget,
  sdk_path: &str,
) -> Invocation {
  let build_dir = layout.target_build_dir(target);
  let mut symroot = OsString::from("SYMROOT=");
  symroot.push(&build_dir);

  Invocation::new(&config.tools.xcodebuild, &build_dir)
    .arg("-project")
    .arg(layout.root().join(&config.project.path))
    .arg("-target")
    .arg(&config.project.target)
    .arg("-configuration")
    .arg(config.configuration.as_str())
    .arg("-arch")
    .arg(&target.arch)
    .arg("-sdk")
    .arg(sdk_path)
    .arg(symroot)
}

/// Build one target and return the path of its thin library.
pub async fn build_target<R: CommandRunner>(
  runner: &R,
  layout: &OutputLayout,
  config: &BuildConfig,
  target: &BuildTarget,
) -> Result<PathBuf, BuildError> {
  info!(target = %target, "build target");

  let build_dir = layout.target_build_dir(target);
  tokio::fs::create_dir_all(&build_dir)
    .await
    .map_err(|source| BuildError::CreateDir {
      path: build_dir.clone(),
      source,
    })?;

  let sdk = sdk_path(runner, config, target.platform, build_dir).await?;
  let xcodebuild = xcodebuild_invocation(layout, config, target, &sdk);

  runner.run(&xcodebuild).await.map_err(|source| BuildError::Xcodebuild {
    target: target.to_string(),
    source,
  })?;

  Ok(layout.thin_lib(target, config.configuration))
}

/// Build every configured target and return the thin libraries in target order.
///
/// With `jobs == 1` targets build one after another. Otherwise up to `jobs`
/// builds run at once; the first failure cancels the rest.
pub async fn build_targets<R: CommandRunner + 'static>(
  runner: &Arc<R>,
  layout: &OutputLayout,
  config: &BuildConfig,
) -> Result<Vec<PathBuf>, BuildError> {
  if config.jobs <= 1 || config.targets.len() <= 1 {
    let mut libs = Vec::with_capacity(config.targets.len());
    for target in &config.targets {
      libs.push(build_target(runner.as_ref(), layout, config, target).await?);
    }
    return Ok(libs);
  }

  // Semaphore permits are capped by tokio
  let jobs = config.jobs.min(config.targets.len());
  info!(jobs, targets = config.targets.len(), "building targets in parallel");

  let semaphore = Arc::new(Semaphore::new(jobs));
  let shared = Arc::new((layout.clone(), config.clone()));
  let mut set = JoinSet::new();

  for (index, target) in config.targets.iter().cloned().enumerate() {
    let runner = Arc::clone(runner);
    let semaphore = Arc::clone(&semaphore);
    let shared = Arc::clone(&shared);

    set.spawn(async move {
      // The semaphore is never closed
      let _permit = semaphore.acquire_owned().await;
      let (layout, config) = &*shared;
      build_target(runner.as_ref(), layout, config, &target)
        .await
        .map(|lib| (index, lib))
    });
  }

  let mut libs = Vec::with_capacity(config.targets.len());
  while let Some(joined) = set.join_next().await {
    match joined? {
      Ok(built) => libs.push(built),
      Err(e) => {
        set.abort_all();
        return Err(e);
      }
    }
  }

  libs.sort_by_key(|(index, _)| *index);
  Ok(libs.into_iter().map(|(_, lib)| lib).collect())
}
