//! End-to-end tests running the lwsbuild binary against fake toolchains.

#![cfg(unix)]


mod build_tests;
mod clean_tests;
