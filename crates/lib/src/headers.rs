//! Public header staging.
//!
//! Copies the libwebsockets headers into `out/include`, mirroring the source
//! directory structure and leaving out internal headers. The include directory
//! is the cache key: if it exists, nothing is copied.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::cache::{Artifact, Outcome};
use crate::consts::EXCLUDED_HEADERS;
use crate::layout::OutputLayout;

#[derive(Debug, Error)]
pub enum HeaderError {
  #[error("header source directory not found: {0}")]
  MissingSource(PathBuf),

  #[error("failed to walk '{path}': {source}")]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to create '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to copy '{from}' to '{to}': {source}")]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to publish staged headers to '{path}': {source}")]
  Publish {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Whether a file belongs in the public include tree.
pub fn is_public_header(path: &Path) -> bool {
  let is_header = path.extension().is_some_and(|ext| ext == "h");
  let excluded = path
    .file_name()
    .and_then(|n| n.to_str())
    .is_some_and(|n| EXCLUDED_HEADERS.contains(&n));
  is_header && !excluded
}

/// Copy public headers from `source` into `dest`, recreating every directory.
///
/// Returns the number of headers copied.
pub fn copy_headers(source: &Path, dest: &Path) -> Result<usize, HeaderError> {
  if !source.is_dir() {
    return Err(HeaderError::MissingSource(source.to_path_buf()));
  }

  let mut copied = 0;
  for entry in WalkDir::new(source).sort_by_file_name() {
    let entry = entry.map_err(|e| HeaderError::Walk {
      path: source.to_path_buf(),
      source: e,
    })?;
    let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
    let target = dest.join(relative);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).map_err(|e| HeaderError::CreateDir {
        path: target.clone(),
        source: e,
      })?;
    } else if is_public_header(entry.path()) {
      fs::copy(entry.path(), &target).map_err(|e| HeaderError::Copy {
        from: entry.path().to_path_buf(),
        to: target.clone(),
        source: e,
      })?;
      debug!(header = %relative.display(), "copied header");
      copied += 1;
    }
  }

  Ok(copied)
}

pub fn include_artifact(layout: &OutputLayout) -> Artifact {
  Artifact::new("include", layout.include_dir())
}

/// Stage headers unless `out/include` already exists.
///
/// Headers are copied into a scratch directory first and renamed into place
/// once complete, so a failed copy never leaves a half-populated include tree
/// that later runs would treat as done.
pub async fn stage_headers(layout: &OutputLayout) -> Result<(Artifact, Outcome, usize), HeaderError> {
  let artifact = include_artifact(layout);
  let source = layout.header_source_dir();
  let dest = layout.include_dir();
  let scratch = layout.output_dir().join(".include.partial");

  let mut copied = 0;
  let copied_ref = &mut copied;
  let outcome = artifact
    .ensure(move || async move {
      info!("copy headers");
      if scratch.exists() {
        fs::remove_dir_all(&scratch).map_err(|e| HeaderError::CreateDir {
          path: scratch.clone(),
          source: e,
        })?;
      }

      *copied_ref = copy_headers(&source, &scratch)?;

      fs::rename(&scratch, &dest).map_err(|e| HeaderError::Publish { path: dest, source: e })
    })
    .await?;

  Ok((artifact, outcome, copied))
}
