use std::io;
use std::path::PathBuf;

use crate::consts::{CONFIG_FILE_NAME, ROOT_ENV_VAR};

/// Returns the root directory the build works in.
///
/// `LWSBUILD_ROOT` takes precedence over the current working directory. The
/// result is canonicalized when the directory exists.
pub fn root_dir() -> io::Result<PathBuf> {
  let root = match std::env::var_os(ROOT_ENV_VAR) {
    Some(path) if !path.is_empty() => PathBuf::from(path),
    _ => std::env::current_dir()?,
  };
  Ok(dunce::canonicalize(&root).unwrap_or(root))
}

/// Returns the default config file location for a root directory
pub fn default_config_path(root: &std::path::Path) -> PathBuf {
  root.join(CONFIG_FILE_NAME)
}
