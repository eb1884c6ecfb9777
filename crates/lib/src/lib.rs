//! lwsbuild-lib: Core logic for lwsbuild
//!
//! Builds a universal iOS libwebsockets static library:
//! - `fetch`: clones libwebsockets and OpenSSL-for-iPhone, builds libssl
//! - `build`: runs xcodebuild once per (platform, architecture) target
//! - `assemble`: merges the thin libraries with lipo
//! - `headers`: stages the public headers into `out/include`
//!
//! Every step is keyed on the existence of its output (see [`cache`]), so
//! repeated runs only redo what is missing. External tools are reached
//! through [`exec::CommandRunner`].

pub mod assemble;
pub mod build;
pub mod cache;
pub mod clean;
pub mod config;
pub mod consts;
pub mod exec;
pub mod fetch;
pub mod headers;
pub mod layout;
pub mod pipeline;
pub mod platform;
pub mod util;
