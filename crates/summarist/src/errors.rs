//! Error taxonomy
//!
//! Each failure class gets its own type so callers can tell a rejected form
//! apart from a failed model call or a failed save. [`Error`] wraps them for
//! the places that can hit more than one.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A required form field was left empty
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  #[error("Please enter the notes.")]
  MissingNotes,

  #[error("Please enter both the notes and your custom prompt.")]
  MissingInstruction,
}

/// The external text-generation call did not produce text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
  #[error("Generation service unreachable: {message}")]
  Network { message: String },

  #[error("Generation quota exhausted: {message}")]
  Quota { message: String },

  #[error("Generation service returned {status}: {message}")]
  Api { status: u16, message: String },

  #[error("Generation service returned a malformed response: {message}")]
  MalformedResponse { message: String },

  #[error("Generation service returned no text: {reason}")]
  EmptyResponse { reason: String },

  #[error("Generation service is not configured: {message}")]
  NotConfigured { message: String },
}

impl GenerationError {
  pub fn network(message: impl Into<String>) -> Self {
    Self::Network { message: message.into() }
  }

  pub fn quota(message: impl Into<String>) -> Self {
    Self::Quota { message: message.into() }
  }

  pub fn api(status: u16, message: impl Into<String>) -> Self {
    Self::Api { status, message: message.into() }
  }

  pub fn malformed(message: impl Into<String>) -> Self {
    Self::MalformedResponse { message: message.into() }
  }

  pub fn empty(reason: impl Into<String>) -> Self {
    Self::EmptyResponse { reason: reason.into() }
  }

  pub fn not_configured(message: impl Into<String>) -> Self {
    Self::NotConfigured { message: message.into() }
  }
}

/// The record store could not be read or written
#[derive(Error, Debug)]
pub enum StorageError {
  #[error("Record store I/O failed at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Record store at {path} is corrupt: {message}")]
  Corrupt { path: PathBuf, message: String },

  #[error("Failed to encode records: {message}")]
  Encode { message: String },
}

impl StorageError {
  pub fn io(path: &Path, source: std::io::Error) -> Self {
    Self::Io { path: path.to_path_buf(), source }
  }

  pub fn corrupt(path: &Path, message: impl Into<String>) -> Self {
    Self::Corrupt { path: path.to_path_buf(), message: message.into() }
  }

  pub fn encode(message: impl Into<String>) -> Self {
    Self::Encode { message: message.into() }
  }
}

/// The download access phrase was not accepted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
  #[error("Access denied: the access phrase is not recognised")]
  Denied,
}

/// Settings could not be loaded
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read config file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse config file {path}: {message}")]
  Parse { path: PathBuf, message: String },

  #[error("No API key configured; set SUMMARIST_API_KEY or generation.api_key")]
  MissingApiKey,

  #[error("Invalid value for {key}: {message}")]
  InvalidValue { key: String, message: String },
}

/// Any failure a summary or download flow can report
#[derive(Error, Debug)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Generation(#[from] GenerationError),

  #[error(transparent)]
  Storage(#[from] StorageError),

  #[error(transparent)]
  Authorization(#[from] AuthorizationError),

  #[error(transparent)]
  Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validation_messages_match_form_warnings() {
    assert_eq!(ValidationError::MissingNotes.to_string(), "Please enter the notes.");
    assert_eq!(
      ValidationError::MissingInstruction.to_string(),
      "Please enter both the notes and your custom prompt."
    );
  }

  #[test]
  fn test_storage_error_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err = StorageError::io(Path::new("/tmp/records.csv"), io);
    assert!(err.to_string().contains("/tmp/records.csv"));
    assert!(std::error::Error::source(&err).is_some());
  }

  #[test]
  fn test_umbrella_error_is_transparent() {
    let err: Error = GenerationError::api(500, "internal").into();
    assert_eq!(err.to_string(), "Generation service returned 500: internal");
    assert!(matches!(err, Error::Generation(GenerationError::Api { status: 500, .. })));
  }
}
