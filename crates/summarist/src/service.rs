//! Summary flows shared by the CLI and the HTTP server
//!
//! This is the caller boundary: it rejects empty input before the generator
//! is touched, appends the record only after a successful generation, and
//! keeps a failed save from hiding the generated text.

use std::sync::Arc;

use crate::access::AccessGate;
use crate::config::Settings;
use crate::errors::{Result, StorageError, ValidationError};
use crate::generation::gemini::{GeminiClient, GeminiConfig};
use crate::generation::GenerationInvoker;
use crate::prompt::SummaryKind;
use crate::store::{GenerationRecord, RecordStore};

/// One press of a form action
#[derive(Debug, Clone)]
pub struct SummaryRequest {
  pub kind: SummaryKind,
  pub notes: String,
  /// Only read for [`SummaryKind::Custom`]
  pub custom_instruction: Option<String>,
}

impl SummaryRequest {
  pub fn new(kind: SummaryKind, notes: impl Into<String>) -> Self {
    Self { kind, notes: notes.into(), custom_instruction: None }
  }

  pub fn custom(notes: impl Into<String>, instruction: impl Into<String>) -> Self {
    Self { kind: SummaryKind::Custom, notes: notes.into(), custom_instruction: Some(instruction.into()) }
  }

  /// Check required fields and resolve the instruction to send
  pub fn instruction(&self) -> std::result::Result<&str, ValidationError> {
    if self.notes.is_empty() {
      return match self.kind {
        SummaryKind::Custom => Err(ValidationError::MissingInstruction),
        _ => Err(ValidationError::MissingNotes),
      };
    }

    match self.kind.fixed_instruction() {
      Some(instruction) => Ok(instruction),
      None => self
        .custom_instruction
        .as_deref()
        .filter(|instruction| !instruction.is_empty())
        .ok_or(ValidationError::MissingInstruction),
    }
  }
}

/// Result of a successful generation
#[derive(Debug)]
pub struct SummaryOutcome {
  pub kind: SummaryKind,
  pub record: GenerationRecord,
  /// Set when the summary was generated but could not be stored
  pub save_error: Option<StorageError>,
}

impl SummaryOutcome {
  pub fn summary(&self) -> &str {
    &self.record.summary
  }

  pub fn heading(&self) -> &'static str {
    self.kind.heading()
  }

  pub fn saved(&self) -> bool {
    self.save_error.is_none()
  }
}

/// Generation, persistence and download gating behind one handle
#[derive(Clone)]
pub struct SummaryService {
  invoker: GenerationInvoker,
  store: Arc<RecordStore>,
  gate: AccessGate,
}

impl SummaryService {
  pub fn new(invoker: GenerationInvoker, store: Arc<RecordStore>, gate: AccessGate) -> Self {
    Self { invoker, store, gate }
  }

  /// Wire the Gemini client, record store and access gate from settings
  pub fn from_settings(settings: &Settings) -> Result<Self> {
    let client = GeminiClient::new(GeminiConfig::from_settings(settings)?)?;
    let invoker = GenerationInvoker::new(Arc::new(client), settings.generation.sampling);
    let store = Arc::new(RecordStore::new(&settings.store.path));
    let gate = AccessGate::new(settings.access.phrases.iter().cloned());
    Ok(Self::new(invoker, store, gate))
  }

  pub fn store(&self) -> &RecordStore {
    &self.store
  }

  /// Validate, generate, then append.
  ///
  /// Validation and generation failures are returned as errors and leave
  /// the store untouched. A storage failure after generation is reported in
  /// [`SummaryOutcome::save_error`] instead.
  pub async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryOutcome> {
    let instruction = request.instruction()?;

    let summary = self.invoker.generate(&request.notes, instruction).await?;

    let record = GenerationRecord::new(instruction, request.notes.clone(), summary);
    let store = Arc::clone(&self.store);
    let row = record.clone();
    let save_error = match tokio::task::spawn_blocking(move || store.append(&row)).await {
      Ok(result) => result.err(),
      Err(e) => Some(StorageError::io(self.store.path(), std::io::Error::other(e))),
    };

    if let Some(e) = &save_error {
      tracing::warn!(error = %e, "summary generated but not saved");
    }

    Ok(SummaryOutcome { kind: request.kind, record, save_error })
  }

  /// Release the exported table to a holder of an accepted phrase
  pub fn download(&self, access_phrase: &str) -> Result<Vec<u8>> {
    self.gate.authorize(access_phrase)?;
    Ok(self.store.export_all()?)
  }

  /// Whether any access phrase is configured
  pub fn downloads_enabled(&self) -> bool {
    self.gate.is_open()
  }

  pub fn record_count(&self) -> Result<usize> {
    Ok(self.store.records()?.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::errors::{AuthorizationError, Error, GenerationError};
  use crate::generation::{MockTextGenerator, SamplingConfig};
  use crate::prompt::MEDICAL_RECORD_INSTRUCTION;
  use tempfile::TempDir;

  fn service_with(generator: MockTextGenerator, dir: &TempDir, phrases: &[&str]) -> SummaryService {
    let invoker = GenerationInvoker::new(Arc::new(generator), SamplingConfig::default());
    let store = Arc::new(RecordStore::new(dir.path().join("records.csv")));
    store.ensure_initialized().unwrap();
    SummaryService::new(invoker, store, AccessGate::new(phrases.iter().copied()))
  }

  #[test]
  fn test_instruction_resolution() {
    let request = SummaryRequest::new(SummaryKind::MedicalRecord, "notes");
    assert_eq!(request.instruction().unwrap(), MEDICAL_RECORD_INSTRUCTION);

    let request = SummaryRequest::custom("notes", "Bullet points please");
    assert_eq!(request.instruction().unwrap(), "Bullet points please");

    let mut request = SummaryRequest::new(SummaryKind::Consultation, "notes");
    request.custom_instruction = Some("ignored".to_string());
    assert!(request.instruction().unwrap().ends_with("for consultation purpose."));
  }

  #[test]
  fn test_instruction_validation() {
    let request = SummaryRequest::new(SummaryKind::MedicalRecord, "");
    assert_eq!(request.instruction(), Err(ValidationError::MissingNotes));

    let request = SummaryRequest::new(SummaryKind::MedicalRecord, "  \n ");
    assert_eq!(request.instruction().unwrap(), MEDICAL_RECORD_INSTRUCTION);

    let request = SummaryRequest::custom("", "custom instr");
    assert_eq!(request.instruction(), Err(ValidationError::MissingInstruction));

    let request = SummaryRequest::custom("notes", "");
    assert_eq!(request.instruction(), Err(ValidationError::MissingInstruction));

    let request = SummaryRequest::custom("notes", "   ");
    assert_eq!(request.instruction().unwrap(), "   ");

    let request = SummaryRequest { kind: SummaryKind::Custom, notes: "notes".into(), custom_instruction: None };
    assert_eq!(request.instruction(), Err(ValidationError::MissingInstruction));
  }

  #[tokio::test]
  async fn test_validation_failure_never_calls_generator() {
    let dir = TempDir::new().unwrap();
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(0);
    let service = service_with(generator, &dir, &[]);

    let err = service.summarize(&SummaryRequest::custom("", "custom instr")).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::MissingInstruction)));
  }

  #[tokio::test]
  async fn test_whitespace_notes_are_sent_verbatim() {
    let dir = TempDir::new().unwrap();
    let mut generator = MockTextGenerator::new();
    generator
      .expect_generate()
      .withf(|prompt, _| prompt == format!("{MEDICAL_RECORD_INSTRUCTION}\n\nNotes:\n   "))
      .times(1)
      .returning(|_, _| Ok("Nothing to summarize.".to_string()));
    let service = service_with(generator, &dir, &[]);

    let outcome = service.summarize(&SummaryRequest::new(SummaryKind::MedicalRecord, "   ")).await.unwrap();

    assert!(outcome.saved());
    assert_eq!(service.store().records().unwrap()[0].notes, "   ");
  }

  #[tokio::test]
  async fn test_success_appends_instruction_notes_and_summary() {
    let dir = TempDir::new().unwrap();
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(1).returning(|_, _| Ok("Short summary.".to_string()));
    let service = service_with(generator, &dir, &[]);

    let outcome = service.summarize(&SummaryRequest::new(SummaryKind::MedicalRecord, "fever")).await.unwrap();

    assert!(outcome.saved());
    assert_eq!(outcome.summary(), "Short summary.");
    assert_eq!(outcome.heading(), "Generated Summary for Medical Record:");
    assert_eq!(
      service.store().records().unwrap(),
      vec![GenerationRecord::new(MEDICAL_RECORD_INSTRUCTION, "fever", "Short summary.")]
    );
  }

  #[tokio::test]
  async fn test_generation_failure_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().returning(|_, _| Err(GenerationError::network("reset by peer")));
    let service = service_with(generator, &dir, &[]);

    let err = service.summarize(&SummaryRequest::new(SummaryKind::Consultation, "notes")).await.unwrap_err();

    assert!(matches!(err, Error::Generation(GenerationError::Network { .. })));
    assert_eq!(service.record_count().unwrap(), 0);
  }

  #[tokio::test]
  async fn test_save_failure_still_returns_summary() {
    let dir = TempDir::new().unwrap();
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().returning(|_, _| Ok("Kept anyway.".to_string()));
    let service = service_with(generator, &dir, &[]);

    std::fs::write(service.store().path(), "not,the,right,header\n").unwrap();

    let outcome = service.summarize(&SummaryRequest::new(SummaryKind::MedicalRecord, "notes")).await.unwrap();
    assert!(!outcome.saved());
    assert_eq!(outcome.summary(), "Kept anyway.");
    assert!(matches!(outcome.save_error, Some(StorageError::Corrupt { .. })));
  }

  #[test]
  fn test_download_requires_known_phrase() {
    let dir = TempDir::new().unwrap();
    let service = service_with(MockTextGenerator::new(), &dir, &["letmein"]);

    let err = service.download("guess").unwrap_err();
    assert!(matches!(err, Error::Authorization(AuthorizationError::Denied)));

    let bytes = service.download("letmein").unwrap();
    assert_eq!(bytes, b"Prompt,Notes,Generated Summary\n");
  }
}
