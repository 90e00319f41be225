//! Append-only record store backed by a single CSV file
//!
//! The file is the only source of truth: every append reloads the whole
//! table, adds one row and rewrites the file through a temporary sibling
//! that is renamed into place, so a failed write never truncates the rows
//! already on disk. Appends within one process are serialized by a mutex;
//! writers in other processes are not coordinated.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

use crate::errors::StorageError;

/// Column names, in file order
pub const HEADER: [&str; 3] = ["Prompt", "Notes", "Generated Summary"];

/// One stored generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationRecord {
  #[serde(rename = "Prompt")]
  pub prompt: String,

  #[serde(rename = "Notes")]
  pub notes: String,

  #[serde(rename = "Generated Summary")]
  pub summary: String,
}

impl GenerationRecord {
  pub fn new(prompt: impl Into<String>, notes: impl Into<String>, summary: impl Into<String>) -> Self {
    Self { prompt: prompt.into(), notes: notes.into(), summary: summary.into() }
  }
}

/// CSV-backed table of [`GenerationRecord`]s
pub struct RecordStore {
  path: PathBuf,
  write_lock: Mutex<()>,
}

impl RecordStore {
  pub fn new<P: Into<PathBuf>>(path: P) -> Self {
    Self { path: path.into(), write_lock: Mutex::new(()) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Create a header-only file when none exists. Existing files are left alone.
  pub fn ensure_initialized(&self) -> Result<(), StorageError> {
    let _guard = self.lock();

    if self.path.exists() {
      return Ok(());
    }

    self.write_table(&[])
  }

  /// Append one row, keeping every existing row and the column order
  pub fn append(&self, record: &GenerationRecord) -> Result<(), StorageError> {
    let _guard = self.lock();

    let mut records = self.read_table()?;
    records.push(record.clone());
    self.write_table(&records)
  }

  /// Rows in append order
  pub fn records(&self) -> Result<Vec<GenerationRecord>, StorageError> {
    self.read_table()
  }

  /// Serialize the current table, header included
  pub fn export_all(&self) -> Result<Vec<u8>, StorageError> {
    let records = self.read_table()?;
    encode(&records)
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
    // A panic while holding the guard cannot leave the file half-written,
    // so a poisoned lock is still safe to reuse
    self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  fn read_table(&self) -> Result<Vec<GenerationRecord>, StorageError> {
    let bytes = match fs::read(&self.path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(StorageError::io(&self.path, e)),
    };

    if bytes.is_empty() {
      return Ok(Vec::new());
    }

    decode(&self.path, &bytes)
  }

  fn write_table(&self, records: &[GenerationRecord]) -> Result<(), StorageError> {
    let bytes = encode(records)?;

    let dir = match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;

    let mut staged = NamedTempFile::new_in(&dir).map_err(|e| StorageError::io(&dir, e))?;
    staged.write_all(&bytes).map_err(|e| StorageError::io(staged.path(), e))?;
    staged.as_file().sync_all().map_err(|e| StorageError::io(staged.path(), e))?;

    // The staging file is created owner-only; keep the table's existing mode
    match fs::metadata(&self.path) {
      Ok(existing) => {
        staged.as_file().set_permissions(existing.permissions()).map_err(|e| StorageError::io(staged.path(), e))?
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => return Err(StorageError::io(&self.path, e)),
    }
    staged.persist(&self.path).map_err(|e| StorageError::io(&self.path, e.error))?;

    Ok(())
  }
}

fn encode(records: &[GenerationRecord]) -> Result<Vec<u8>, StorageError> {
  let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());

  writer.write_record(HEADER).map_err(|e| StorageError::encode(e.to_string()))?;
  for record in records {
    writer.serialize(record).map_err(|e| StorageError::encode(e.to_string()))?;
  }

  writer.into_inner().map_err(|e| StorageError::encode(e.to_string()))
}

fn decode(path: &Path, bytes: &[u8]) -> Result<Vec<GenerationRecord>, StorageError> {
  let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);

  let headers = reader.headers().map_err(|e| StorageError::corrupt(path, e.to_string()))?;
  if headers.iter().ne(HEADER) {
    return Err(StorageError::corrupt(
      path,
      format!("expected header {:?}, found {:?}", HEADER, headers.iter().collect::<Vec<_>>()),
    ));
  }

  reader
    .deserialize::<GenerationRecord>()
    .map(|row| row.map_err(|e| StorageError::corrupt(path, e.to_string())))
    .collect()
}
