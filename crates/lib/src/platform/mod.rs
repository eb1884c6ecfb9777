//! Target platforms, architectures and build configurations.
//!
//! A [`BuildTarget`] pairs a [`Platform`] with a CPU architecture string. The
//! platform decides which Xcode SDK is used and how the per-target build
//! directory is named on disk.

pub mod paths;
mod target;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use target::{BuildTarget, Configuration, TargetError, default_targets, resolve_target};

/// Platform identifier could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform '{0}' (expected one of: iphone, iphone-simulator, device, simulator)")]
pub struct UnknownPlatform(pub String);

/// Apple platform variants a target can be compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
  Device,
  Simulator,
}

impl Platform {
  /// Returns the identifier used in build directory names
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Device => "iphone",
      Self::Simulator => "iphone-simulator",
    }
  }

  /// Returns the SDK name understood by `xcrun -sdk` and used by Xcode in
  /// `<Configuration>-<sdk>` product directories
  pub fn sdk(&self) -> &'static str {
    match self {
      Self::Device => "iphoneos",
      Self::Simulator => "iphonesimulator",
    }
  }
}

impl FromStr for Platform {
  type Err = UnknownPlatform;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "iphone" | "device" => Ok(Self::Device),
      "iphone-simulator" | "simulator" => Ok(Self::Simulator),
      other => Err(UnknownPlatform(other.to_string())),
    }
  }
}

impl TryFrom<String> for Platform {
  type Error = UnknownPlatform;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Platform> for String {
  fn from(value: Platform) -> Self {
    value.as_str().to_string()
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
