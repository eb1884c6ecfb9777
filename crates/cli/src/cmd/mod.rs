mod build;
mod clean;
mod plan;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use lwsbuild_lib::config::BuildConfig;
use lwsbuild_lib::layout::OutputLayout;
use lwsbuild_lib::platform::paths::{default_config_path, root_dir};

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use plan::cmd_plan;

/// Root directory and config location shared by every command.
pub struct Workspace {
  pub root: PathBuf,
  /// Set when `--config` was given; the file must then exist.
  pub explicit_config: Option<PathBuf>,
}

impl Workspace {
  pub fn resolve(root: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self> {
    let root = match root {
      Some(root) => dunce::canonicalize(&root).unwrap_or(root),
      None => root_dir().context("Failed to determine root directory")?,
    };
    debug!(root = %root.display(), config = ?config, "resolved workspace");

    Ok(Self {
      root,
      explicit_config: config,
    })
  }

  pub fn layout(&self) -> OutputLayout {
    OutputLayout::new(&self.root)
  }

  /// Load and validate the build config.
  pub fn load_config(&self) -> Result<BuildConfig> {
    match &self.explicit_config {
      Some(path) => {
        BuildConfig::load(path).with_context(|| format!("Failed to load config: {}", path.display()))
      }
      None => {
        let path = default_config_path(&self.root);
        BuildConfig::load_or_default(&path).with_context(|| format!("Failed to load config: {}", path.display()))
      }
    }
  }
}
