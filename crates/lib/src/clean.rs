//! Output directory lifecycle.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::layout::OutputLayout;

#[derive(Debug, Error)]
pub enum CleanError {
  #[error("failed to remove '{path}': {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to initialize output directory '{path}': {source}")]
  Init {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Create `out/` and its `.keep` sentinel.
pub fn init_output_dir(layout: &OutputLayout) -> Result<(), CleanError> {
  let dir = layout.output_dir();
  fs::create_dir_all(&dir).map_err(|source| CleanError::Init {
    path: dir.clone(),
    source,
  })?;

  let keep = layout.keep_file();
  fs::write(&keep, b"").map_err(|source| CleanError::Init { path: keep, source })
}

/// Delete everything under `out/` and start over with an empty output root.
///
/// Returns whether there was anything to remove.
pub fn clean(layout: &OutputLayout) -> Result<bool, CleanError> {
  let dir = layout.output_dir();
  let existed = dir.exists();

  if existed {
    info!(path = %dir.display(), "removing output directory");
    fs::remove_dir_all(&dir).map_err(|source| CleanError::Remove {
      path: dir.clone(),
      source,
    })?;
  }

  init_output_dir(layout)?;
  Ok(existed)
}
