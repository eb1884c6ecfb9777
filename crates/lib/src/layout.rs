//! Output layout resolution.
//!
//! Every location the pipeline reads or writes is a pure function of the root
//! directory, a target and a configuration. Nothing here touches the
//! filesystem.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── libwebsockets/                 # cloned source tree
//! │   └── lib/                       # header root
//! ├── OpenSSL-for-iPhone/
//! │   └── lib/libssl.a
//! └── out/
//!     ├── .keep
//!     ├── xcode-build/
//!     │   └── <platform>-<arch>/
//!     │       └── <Configuration>-<sdk>/libwebsockets.a
//!     ├── lib/libwebsockets.a        # universal library
//!     └── include/                   # staged public headers
//! ```

use std::path::{Path, PathBuf};

use crate::consts::{KEEP_FILE_NAME, LIB_NAME, LIBWEBSOCKETS_DIR_NAME, OPENSSL_DIR_NAME};
use crate::platform::{BuildTarget, Configuration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
  root: PathBuf,
}

impl OutputLayout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn libwebsockets_dir(&self) -> PathBuf {
    self.root.join(LIBWEBSOCKETS_DIR_NAME)
  }

  /// Directory whose headers are staged into `out/include`.
  pub fn header_source_dir(&self) -> PathBuf {
    self.libwebsockets_dir().join("lib")
  }

  pub fn openssl_dir(&self) -> PathBuf {
    self.root.join(OPENSSL_DIR_NAME)
  }

  pub fn openssl_lib(&self) -> PathBuf {
    self.openssl_dir().join("lib").join("libssl.a")
  }

  pub fn output_dir(&self) -> PathBuf {
    self.root.join("out")
  }

  pub fn keep_file(&self) -> PathBuf {
    self.output_dir().join(KEEP_FILE_NAME)
  }

  pub fn xcode_build_dir(&self) -> PathBuf {
    self.output_dir().join("xcode-build")
  }

  /// Per-target `SYMROOT` handed to xcodebuild.
  pub fn target_build_dir(&self, target: &BuildTarget) -> PathBuf {
    self.xcode_build_dir().join(target.dir_name())
  }

  /// Directory xcodebuild writes products into below `SYMROOT`.
  pub fn configured_target_build_dir(&self, target: &BuildTarget, configuration: Configuration) -> PathBuf {
    self
      .target_build_dir(target)
      .join(format!("{}-{}", configuration, target.platform.sdk()))
  }

  pub fn thin_lib(&self, target: &BuildTarget, configuration: Configuration) -> PathBuf {
    self.configured_target_build_dir(target, configuration).join(LIB_NAME)
  }

  pub fn lib_dir(&self) -> PathBuf {
    self.output_dir().join("lib")
  }

  pub fn fat_lib(&self) -> PathBuf {
    self.lib_dir().join(LIB_NAME)
  }

  pub fn include_dir(&self) -> PathBuf {
    self.output_dir().join("include")
  }
}
