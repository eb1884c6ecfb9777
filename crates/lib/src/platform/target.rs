use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Platform, UnknownPlatform};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
  #[error(transparent)]
  UnknownPlatform(#[from] UnknownPlatform),

  #[error("architecture must not be empty")]
  EmptyArch,

  /// The arch ends up as a directory name component.
  #[error("invalid architecture '{0}': must be a single path component")]
  InvalidArch(String),

  #[error("unknown configuration '{0}' (expected Debug or Release)")]
  UnknownConfiguration(String),
}

/// One (platform, architecture) pair that gets its own thin library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BuildTarget {
  pub platform: Platform,
  pub arch: String,
}

impl BuildTarget {
  /// Create a target, validating the architecture name.
  pub fn new(platform: Platform, arch: impl Into<String>) -> Result<Self, TargetError> {
    let arch = arch.into();
    if arch.is_empty() {
      return Err(TargetError::EmptyArch);
    }
    if arch.contains(['/', '\\']) || arch == "." || arch == ".." {
      return Err(TargetError::InvalidArch(arch));
    }
    Ok(Self { platform, arch })
  }

  /// Name of the per-target build directory, e.g. `iphone-arm64`.
  pub fn dir_name(&self) -> String {
    format!("{}-{}", self.platform, self.arch)
  }
}

impl fmt::Display for BuildTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.dir_name())
  }
}

/// Resolve a target from its string form.
///
/// Fails with `UnknownPlatform` for anything but the known platform names, so
/// bad input is caught before any external process is started.
pub fn resolve_target(platform: &str, arch: &str) -> Result<BuildTarget, TargetError> {
  let platform: Platform = platform.parse()?;
  BuildTarget::new(platform, arch)
}

/// The four targets of a standard iOS build: two device and two simulator slices.
pub fn default_targets() -> Vec<BuildTarget> {
  [
    (Platform::Device, "armv7"),
    (Platform::Device, "arm64"),
    (Platform::Simulator, "i386"),
    (Platform::Simulator, "x86_64"),
  ]
  .into_iter()
  .map(|(platform, arch)| BuildTarget {
    platform,
    arch: arch.to_string(),
  })
  .collect()
}

/// Xcode build configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Configuration {
  Debug,
  #[default]
  Release,
}

impl Configuration {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::Release => "Release",
    }
  }
}

impl FromStr for Configuration {
  type Err = TargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Debug" => Ok(Self::Debug),
      "Release" => Ok(Self::Release),
      other => Err(TargetError::UnknownConfiguration(other.to_string())),
    }
  }
}

impl fmt::Display for Configuration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
