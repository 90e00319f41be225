//! Persistent activity log
//!
//! Entries are appended to a JSONL file, one object per line. Writers share
//! one log file path behind a tokio mutex so concurrent request handlers
//! never interleave partial lines. Each write is mirrored to the
//! console unless the log was opened silent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::Level;

/// Request metadata attached to an entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct LogContext {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub request_id: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub method: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_agent: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub status_code: Option<u16>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration_ms: Option<f64>,
}

/// One line of the activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct LogEntry {
  pub timestamp: DateTime<Utc>,
  pub level: Level,
  pub component: String,
  pub message: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub context: Option<LogContext>,
}

struct Sink {
  path: PathBuf,
  silent: bool,
}

impl Sink {
  fn open(path: &Path, silent: bool) -> io::Result<Self> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
      }
    }

    // Touch without truncating
    OpenOptions::new().create(true).append(true).open(path)?;

    Ok(Self { path: path.to_path_buf(), silent })
  }

  fn write(&mut self, entry: &LogEntry) -> io::Result<()> {
    let line = serde_json::to_string(entry)
      .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
    writeln!(file, "{line}")?;
    file.flush()
  }

  fn read(&self, limit: Option<usize>, level: Option<Level>) -> io::Result<Vec<LogEntry>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(&self.path)?);
    let mut entries = Vec::new();

    for line in reader.lines() {
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }

      // Malformed lines are skipped rather than failing the whole read
      let Ok(entry) = serde_json::from_str::<LogEntry>(&line) else {
        continue;
      };

      if level.is_none_or(|wanted| entry.level == wanted) {
        entries.push(entry);
      }
    }

    if let Some(limit) = limit {
      let skip = entries.len().saturating_sub(limit);
      entries.drain(..skip);
    }

    Ok(entries)
  }
}

/// Thread-safe JSONL activity log
#[derive(Clone)]
pub struct ActivityLog {
  sink: Arc<Mutex<Sink>>,
}

impl ActivityLog {
  /// Open (or create) the log at `path`, mirroring entries to the console
  pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
    Self::open_with_silent(path, false)
  }

  pub fn open_with_silent<P: AsRef<Path>>(path: P, silent: bool) -> io::Result<Self> {
    let sink = Sink::open(path.as_ref(), silent)?;
    Ok(Self { sink: Arc::new(Mutex::new(sink)) })
  }

  /// Append an entry, reporting I/O failures to the caller
  pub async fn record(
    &self,
    level: Level,
    message: &str,
    component: &str,
    context: Option<LogContext>,
  ) -> io::Result<()> {
    let entry = LogEntry {
      timestamp: Utc::now(),
      level,
      component: component.to_string(),
      message: message.to_string(),
      context,
    };

    let mut sink = self.sink.lock().await;
    sink.write(&entry)?;
    if !sink.silent {
      crate::emit(level, message);
    }
    Ok(())
  }

  /// Append an entry, ignoring I/O failures.
  ///
  /// Logging must never take down a request, so the convenience helpers
  /// below all go through here.
  pub async fn log(&self, level: Level, message: &str, component: &str, context: Option<LogContext>) {
    if let Err(e) = self.record(level, message, component, context).await {
      crate::warn!("activity log write failed: {e}");
    }
  }

  pub async fn info(&self, message: &str, component: &str) {
    self.log(Level::Info, message, component, None).await;
  }

  pub async fn success(&self, message: &str, component: &str) {
    self.log(Level::Success, message, component, None).await;
  }

  pub async fn warn(&self, message: &str, component: &str) {
    self.log(Level::Warn, message, component, None).await;
  }

  pub async fn error(&self, message: &str, component: &str) {
    self.log(Level::Error, message, component, None).await;
  }

  /// Read back entries in write order, keeping the newest `limit`
  pub async fn entries(&self, limit: Option<usize>, level: Option<Level>) -> io::Result<Vec<LogEntry>> {
    let sink = self.sink.lock().await;
    sink.read(limit, level)
  }

  pub async fn path(&self) -> PathBuf {
    self.sink.lock().await.path.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn temp_log() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("activity.jsonl");
    (dir, path)
  }

  #[tokio::test]
  async fn test_open_creates_parent_directories() {
    let (_dir, path) = temp_log();
    let log = ActivityLog::open_with_silent(&path, true).unwrap();
    assert!(path.exists());
    assert_eq!(log.path().await, path);
  }

  #[tokio::test]
  async fn test_entries_come_back_in_write_order() {
    let (_dir, path) = temp_log();
    let log = ActivityLog::open_with_silent(&path, true).unwrap();

    log.info("first", "test").await;
    log.warn("second", "test").await;
    log.error("third", "test").await;

    let entries = log.entries(None, None).await.unwrap();
    let messages: Vec<_> = entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
  }

  #[tokio::test]
  async fn test_limit_keeps_newest_entries() {
    let (_dir, path) = temp_log();
    let log = ActivityLog::open_with_silent(&path, true).unwrap();

    for i in 0..5 {
      log.info(&format!("entry {i}"), "test").await;
    }

    let entries = log.entries(Some(2), None).await.unwrap();
    let messages: Vec<_> = entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["entry 3", "entry 4"]);
  }

  #[tokio::test]
  async fn test_level_filter_and_malformed_lines() {
    let (_dir, path) = temp_log();
    let log = ActivityLog::open_with_silent(&path, true).unwrap();

    log.info("fine", "test").await;
    {
      let mut file = OpenOptions::new().append(true).open(&path).unwrap();
      writeln!(file, "not json at all").unwrap();
    }
    log.error("broken", "test").await;

    let errors = log.entries(None, Some(Level::Error)).await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "broken");

    let all = log.entries(None, None).await.unwrap();
    assert_eq!(all.len(), 2);
  }

  #[tokio::test]
  async fn test_context_is_persisted() {
    let (_dir, path) = temp_log();
    let log = ActivityLog::open_with_silent(&path, true).unwrap();

    let context = LogContext {
      request_id: Some("abc".to_string()),
      method: Some("POST".to_string()),
      path: Some("/summaries".to_string()),
      status_code: Some(200),
      ..Default::default()
    };
    log.log(Level::Info, "done", "http-request", Some(context.clone())).await;

    let entries = log.entries(None, None).await.unwrap();
    assert_eq!(entries[0].context.as_ref(), Some(&context));
  }

  #[tokio::test]
  async fn test_reopening_keeps_existing_entries() {
    let (_dir, path) = temp_log();
    {
      let log = ActivityLog::open_with_silent(&path, true).unwrap();
      log.success("kept", "test").await;
    }

    let log = ActivityLog::open_with_silent(&path, true).unwrap();
    let entries = log.entries(None, None).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, Level::Success);
  }
}
