//! Universal library assembly.
//!
//! Merges the per-target thin libraries into `out/lib/libwebsockets.a` with
//! `lipo -create`. An existing universal library is kept even when a thin
//! library has been rebuilt since; a warning points at `clean` in that case.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{Artifact, Outcome};
use crate::config::BuildConfig;
use crate::consts::LIB_NAME;
use crate::exec::{CommandRunner, ExecError, Invocation};
use crate::layout::OutputLayout;

#[derive(Debug, Error)]
pub enum AssembleError {
  #[error("failed to create library directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("thin library for {target} not found at '{path}'")]
  MissingThinLibrary { target: String, path: PathBuf },

  #[error("failed to merge universal library: {0}")]
  Merge(#[source] ExecError),
}

pub fn fat_lib_artifact(layout: &OutputLayout) -> Artifact {
  Artifact::new(LIB_NAME, layout.fat_lib())
}

/// The `lipo -create` invocation merging `thin_libs` into `fat_lib`.
pub fn merge_invocation(config: &BuildConfig, layout: &OutputLayout, thin_libs: &[PathBuf], fat_lib: &Path) -> Invocation {
  Invocation::new(&config.tools.lipo, layout.root())
    .arg("-create")
    .args(thin_libs)
    .arg("-output")
    .arg(fat_lib)
}

/// Create the universal library unless it already exists.
pub async fn assemble<R: CommandRunner>(
  runner: &R,
  layout: &OutputLayout,
  config: &BuildConfig,
) -> Result<(Artifact, Outcome), AssembleError> {
  let lib_dir = layout.lib_dir();
  tokio::fs::create_dir_all(&lib_dir)
    .await
    .map_err(|source| AssembleError::CreateDir {
      path: lib_dir.clone(),
      source,
    })?;

  let artifact = fat_lib_artifact(layout);
  let thin_libs: Vec<PathBuf> = config
    .targets
    .iter()
    .map(|t| layout.thin_lib(t, config.configuration))
    .collect();

  let outcome = artifact
    .ensure(|| async {
      for (target, path) in config.targets.iter().zip(&thin_libs) {
        if !path.exists() {
          return Err(AssembleError::MissingThinLibrary {
            target: target.to_string(),
            path: path.clone(),
          });
        }
      }

      info!(inputs = thin_libs.len(), "make fat lib: {}", LIB_NAME);
      let merge = merge_invocation(config, layout, &thin_libs, artifact.path());
      runner.run(&merge).await.map_err(AssembleError::Merge)?;

      report_architectures(runner, config, layout, artifact.path()).await;
      Ok(())
    })
    .await?;

  if outcome == Outcome::Cached {
    warn_if_stale(artifact.path(), &thin_libs);
  }

  Ok((artifact, outcome))
}

/// Log the architectures lipo reports for the merged library.
///
/// Informational only; a failure is logged at debug level.
async fn report_architectures<R: CommandRunner>(runner: &R, config: &BuildConfig, layout: &OutputLayout, fat_lib: &Path) {
  let lipo_info = Invocation::new(&config.tools.lipo, layout.root()).arg("-info").arg(fat_lib);
  match runner.capture(&lipo_info).await {
    Ok(archs) => info!(archs = %archs, "universal library created"),
    Err(e) => debug!(cmd = %lipo_info, error = %e, "could not inspect universal library"),
  }
}

fn modified(path: &Path) -> Option<SystemTime> {
  std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Returns the thin libraries newer than the universal library.
pub fn stale_inputs<'a>(fat_lib: &Path, thin_libs: &'a [PathBuf]) -> Vec<&'a Path> {
  let Some(fat_time) = modified(fat_lib) else {
    return Vec::new();
  };

  thin_libs
    .iter()
    .filter(|lib| modified(lib).is_some_and(|t| t > fat_time))
    .map(PathBuf::as_path)
    .collect()
}

fn warn_if_stale(fat_lib: &Path, thin_libs: &[PathBuf]) {
  let stale = stale_inputs(fat_lib, thin_libs);
  if !stale.is_empty() {
    warn!(
      path = %fat_lib.display(),
      newer_inputs = stale.len(),
      "universal library is older than its inputs and was kept; run `lwsbuild clean` to rebuild it"
    );
  }
}
