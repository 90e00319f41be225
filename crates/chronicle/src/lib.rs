//! Chronicle - console and activity logging for Summarist
//!
//! Console helpers write one prefixed, coloured line per message line to
//! stderr. The [`activity`] module persists the same messages as JSONL so the
//! server can hand them back over HTTP.
//!
//! Standard helpers: `info()`, `warn()`, `error()`, `debug()`, `success()`,
//! each with a `format!`-style macro of the same name.

use colored::*;
use serde::{Deserialize, Serialize};

pub mod activity;

/// Severity attached to console lines and activity log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Debug,
  Info,
  Success,
  Warn,
  Error,
}

impl Level {
  /// Short tag printed inside the console prefix
  pub fn tag(self) -> &'static str {
    match self {
      Level::Debug => "debug",
      Level::Info => "info",
      Level::Success => "sccs",
      Level::Warn => "warn",
      Level::Error => "error",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Level::Debug => "debug",
      Level::Info => "info",
      Level::Success => "success",
      Level::Warn => "warn",
      Level::Error => "error",
    }
  }

  fn color(self) -> Color {
    match self {
      Level::Debug => Color::Magenta,
      Level::Info => Color::Blue,
      Level::Success => Color::Green,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
    }
  }
}

impl std::fmt::Display for Level {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Level {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "debug" => Ok(Level::Debug),
      "info" => Ok(Level::Info),
      "success" | "sccs" => Ok(Level::Success),
      "warn" | "warning" => Ok(Level::Warn),
      "error" => Ok(Level::Error),
      other => Err(format!("unknown log level '{other}'")),
    }
  }
}

/// Build the console lines for a message, one per input line.
///
/// Prefixes are padded so message text lines up regardless of tag width.
pub fn format_lines(level: Level, message: &str) -> Vec<String> {
  let tag = level.tag();
  let pad = " ".repeat(5usize.saturating_sub(tag.len()));
  let prefix = format!("[{}]{pad}", tag.color(level.color()).bold());

  message.lines().map(|line| format!("{prefix} {line}")).collect()
}

/// Write a message to stderr at the given level
pub fn emit(level: Level, message: &str) {
  for line in format_lines(level, message) {
    eprintln!("{line}");
  }
}

pub fn info(message: &str) {
  emit(Level::Info, message);
}

pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

pub fn error(message: &str) {
  emit(Level::Error, message);
}

pub fn debug(message: &str) {
  emit(Level::Debug, message);
}

pub fn success(message: &str) {
  emit(Level::Success, message);
}

#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => {
    $crate::info(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! warn {
  ($($arg:tt)*) => {
    $crate::warn(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => {
    $crate::error(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => {
    $crate::debug(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => {
    $crate::success(&format!($($arg)*)) // LCOV_EXCL_LINE
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_lines_splits_multiline_messages() {
    colored::control::set_override(false);
    let lines = format_lines(Level::Info, "first\nsecond");
    assert_eq!(lines, vec!["[info]  first".to_string(), "[info]  second".to_string()]);
  }

  #[test]
  fn test_format_lines_aligns_long_tags() {
    colored::control::set_override(false);
    let lines = format_lines(Level::Error, "boom");
    assert_eq!(lines, vec!["[error] boom".to_string()]);
  }

  #[test]
  fn test_level_round_trips_through_strings() {
    for level in [Level::Debug, Level::Info, Level::Success, Level::Warn, Level::Error] {
      assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
    }
    assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
    assert!("loud".parse::<Level>().is_err());
  }
}
