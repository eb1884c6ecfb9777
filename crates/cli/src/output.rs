//! Terminal rendering for build, plan and clean summaries.
//!
//! Text mode prints one status line per event plus indented `label: value`
//! stats and artifact rows. JSON mode prints the library's report structs as-is.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream, Style};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Markers in front of status lines and artifact rows.
pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const INFO: &str = "•";
  /// Artifact will be (or was) produced.
  pub const ADD: &str = "+";
  /// Target rebuilt on every run.
  pub const REBUILD: &str = "~";
  /// Artifact reused from disk.
  pub const CACHED: &str = "=";
}

fn symbol_style(symbol: &str) -> Style {
  match symbol {
    symbols::SUCCESS | symbols::ADD => Style::new().green(),
    symbols::INFO => Style::new().blue(),
    symbols::REBUILD => Style::new().yellow(),
    _ => Style::new().dimmed(),
  }
}

fn styled(text: &str, style: Style) -> String {
  text.if_supports_color(Stream::Stdout, |t| t.style(style)).to_string()
}

/// Archive size with a binary unit, e.g. `3.2 MB` for a universal library.
pub fn format_bytes(bytes: u64) -> String {
  const UNITS: [&str; 3] = ["KB", "MB", "GB"];

  if bytes < 1024 {
    return format!("{bytes} B");
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit < UNITS.len() - 1 {
    value /= 1024.0;
    unit += 1;
  }
  format!("{value:.1} {}", UNITS[unit])
}

/// Wall-clock build time: milliseconds, seconds with centiseconds, or minutes.
pub fn format_duration(duration: Duration) -> String {
  match duration.as_secs() {
    0 => format!("{}ms", duration.subsec_millis()),
    secs @ 1..=59 => format!("{secs}.{:02}s", duration.subsec_millis() / 10),
    secs => format!("{}m {}s", secs / 60, secs % 60),
  }
}

fn print_status(symbol: &str, message: &str) {
  println!("{} {message}", styled(symbol, symbol_style(symbol)));
}

pub fn print_success(message: &str) {
  print_status(symbols::SUCCESS, message);
}

pub fn print_info(message: &str) {
  print_status(symbols::INFO, message);
}

pub fn print_stat(label: &str, value: &str) {
  println!("  {}: {value}", styled(label, Style::new().dimmed()));
}

/// One artifact row: status symbol, artifact name and its path.
pub fn print_item(symbol: &str, name: &str, path: &Path) {
  println!(
    "  {} {name} {}",
    styled(symbol, symbol_style(symbol)),
    styled(&format!("({})", path.display()), Style::new().dimmed())
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{json}");
  Ok(())
}
