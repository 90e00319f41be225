use anyhow::{Context, Result};
use colored::*;
use std::io::Write;
use std::path::Path;

use crate::access::AccessGate;
use crate::cli::display::display_outcome;
use crate::config::Settings;
use crate::prompt::SummaryKind;
use crate::service::{SummaryRequest, SummaryService};
use crate::store::RecordStore;

/// Where the notes for `generate` come from
pub enum NotesSource<'a> {
  Inline(&'a str),
  File(&'a Path),
}

impl NotesSource<'_> {
  fn read(&self) -> Result<String> {
    match self {
      NotesSource::Inline(text) => Ok(text.to_string()),
      NotesSource::File(path) => std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read notes from {}", path.display())),
    }
  }
}

/// Create the record store if it does not exist yet
pub fn init(settings: &Settings) -> Result<()> {
  let store = RecordStore::new(&settings.store.path);
  store.ensure_initialized()?;

  println!("{} Record store ready at {}", "✓".green(), store.path().display().to_string().cyan());
  Ok(())
}

/// Run one summary and print it
pub async fn generate(
  settings: &Settings,
  kind: SummaryKind,
  instruction: Option<&str>,
  notes: NotesSource<'_>,
) -> Result<()> {
  let request = SummaryRequest { kind, notes: notes.read()?, custom_instruction: instruction.map(str::to_string) };

  // Validate before the client is built so a missing key doesn't mask empty input
  request.instruction()?;

  let service = SummaryService::from_settings(settings)?;
  chronicle::info!("{}...", kind.action_label());

  let outcome = service.summarize(&request).await?;
  display_outcome(&outcome);
  Ok(())
}

/// Export the record table to `output`, or stdout when absent
pub fn export(settings: &Settings, phrase: &str, output: Option<&Path>) -> Result<()> {
  let gate = AccessGate::new(settings.access.phrases.iter().cloned());
  gate.authorize(phrase)?;

  let bytes = RecordStore::new(&settings.store.path).export_all()?;

  match output {
    Some(path) => {
      std::fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
      println!("{} Exported records to {}", "✓".green(), path.display().to_string().cyan());
    }
    None => {
      let mut stdout = std::io::stdout().lock();
      stdout.write_all(&bytes)?;
      stdout.flush()?;
    }
  }

  Ok(())
}
