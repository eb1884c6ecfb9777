//! Build configuration.
//!
//! An optional `lwsbuild.toml` in the root directory declares the target list,
//! the Xcode project, source URLs and tool overrides. Everything has a
//! default, so a missing file yields the standard four-target iOS build.
//!
//! ```toml
//! configuration = "Release"
//! jobs = 1
//!
//! [project]
//! path = "websockets.xcodeproj"
//! target = "websockets"
//!
//! [sources]
//! libwebsockets = "https://github.com/warmcat/libwebsockets.git"
//! openssl = "https://github.com/omochi/OpenSSL-for-iPhone.git"
//!
//! [[targets]]
//! platform = "iphone"
//! arch = "arm64"
//!
//! [tools]
//! xcodebuild = "/Applications/Xcode.app/Contents/Developer/usr/bin/xcodebuild"
//! ```
//!
//! The file is validated once, up front, into a [`BuildConfig`].

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_LIBWEBSOCKETS_URL, DEFAULT_OPENSSL_URL, DEFAULT_XCODE_PROJECT, DEFAULT_XCODE_TARGET};
use crate::platform::{BuildTarget, Configuration, TargetError, default_targets, resolve_target};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid config: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("target #{index}: {source}")]
  Target {
    index: usize,
    #[source]
    source: TargetError,
  },

  #[error("no build targets configured")]
  NoTargets,

  #[error("target '{0}' is listed more than once")]
  DuplicateTarget(String),

  #[error("jobs must be at least 1")]
  InvalidJobs,
}

/// Xcode project and target to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
  /// Project path, relative to the root directory.
  pub path: PathBuf,
  pub target: String,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      path: PathBuf::from(DEFAULT_XCODE_PROJECT),
      target: DEFAULT_XCODE_TARGET.to_string(),
    }
  }
}

/// Git remotes for the two source trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
  pub libwebsockets: String,
  pub openssl: String,
}

impl Default for SourcesConfig {
  fn default() -> Self {
    Self {
      libwebsockets: DEFAULT_LIBWEBSOCKETS_URL.to_string(),
      openssl: DEFAULT_OPENSSL_URL.to_string(),
    }
  }
}

/// Program names or paths for the external tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
  pub git: String,
  pub xcodebuild: String,
  pub xcrun: String,
  pub lipo: String,
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      git: "git".to_string(),
      xcodebuild: "xcodebuild".to_string(),
      xcrun: "xcrun".to_string(),
      lipo: "lipo".to_string(),
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
  platform: String,
  arch: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
  configuration: Option<Configuration>,
  jobs: Option<usize>,
  #[serde(default)]
  project: ProjectConfig,
  #[serde(default)]
  sources: SourcesConfig,
  targets: Option<Vec<RawTarget>>,
  #[serde(default)]
  tools: ToolsConfig,
}

/// Validated build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
  pub configuration: Configuration,
  /// Maximum number of targets built concurrently.
  pub jobs: usize,
  pub project: ProjectConfig,
  pub sources: SourcesConfig,
  pub targets: Vec<BuildTarget>,
  pub tools: ToolsConfig,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      configuration: Configuration::default(),
      jobs: 1,
      project: ProjectConfig::default(),
      sources: SourcesConfig::default(),
      targets: default_targets(),
      tools: ToolsConfig::default(),
    }
  }
}

impl BuildConfig {
  /// Parse and validate a TOML document.
  pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
    let raw: RawConfig = toml::from_str(content)?;
    Self::from_raw(raw)
  }

  /// Load a config file, failing if it does not exist.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded config file");
    Self::from_toml_str(&content)
  }

  /// Load a config file, or fall back to defaults when it does not exist.
  pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
    if !path.exists() {
      debug!(path = %path.display(), "no config file, using defaults");
      return Ok(Self::default());
    }
    Self::load(path)
  }

  /// Override the job count, e.g. from the command line.
  pub fn with_jobs(mut self, jobs: usize) -> Result<Self, ConfigError> {
    if jobs == 0 {
      return Err(ConfigError::InvalidJobs);
    }
    self.jobs = jobs;
    Ok(self)
  }

  fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
    let targets = match raw.targets {
      None => default_targets(),
      Some(raw_targets) => raw_targets
        .iter()
        .enumerate()
        .map(|(index, t)| resolve_target(&t.platform, &t.arch).map_err(|source| ConfigError::Target { index, source }))
        .collect::<Result<Vec<_>, _>>()?,
    };

    if targets.is_empty() {
      return Err(ConfigError::NoTargets);
    }

    let mut seen = HashSet::new();
    for target in &targets {
      if !seen.insert(target) {
        return Err(ConfigError::DuplicateTarget(target.to_string()));
      }
    }

    let jobs = raw.jobs.unwrap_or(1);
    if jobs == 0 {
      return Err(ConfigError::InvalidJobs);
    }

    Ok(Self {
      configuration: raw.configuration.unwrap_or_default(),
      jobs,
      project: raw.project,
      sources: raw.sources,
      targets,
      tools: raw.tools,
    })
  }
}
