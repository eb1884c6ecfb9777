//! Shared utilities.
//!
//! Shell quoting for log and error messages, plus test helpers.

pub mod shell;

#[cfg(test)]
pub mod testutil;
