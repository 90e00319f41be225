//! Summary kinds and prompt assembly

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed instruction for medical record summaries
pub const MEDICAL_RECORD_INSTRUCTION: &str = "Summarize the patient's medical history, including her symptoms, imaging findings, and the proposed treatment plan for medical record purpose.";

/// Fixed instruction for consultation summaries
pub const CONSULTATION_INSTRUCTION: &str = "Summarize the patient's medical history, including her symptoms, imaging findings, and the proposed treatment plan for consultation purpose.";

/// Separator placed between the instruction and the notes
pub const NOTES_SEPARATOR: &str = "\n\nNotes:\n";

/// Which of the three form actions produced a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryKind {
  MedicalRecord,
  Consultation,
  Custom,
}

impl SummaryKind {
  pub const ALL: [SummaryKind; 3] =
    [SummaryKind::MedicalRecord, SummaryKind::Consultation, SummaryKind::Custom];

  /// Built-in instruction, or `None` when the user supplies one
  pub fn fixed_instruction(self) -> Option<&'static str> {
    match self {
      SummaryKind::MedicalRecord => Some(MEDICAL_RECORD_INSTRUCTION),
      SummaryKind::Consultation => Some(CONSULTATION_INSTRUCTION),
      SummaryKind::Custom => None,
    }
  }

  /// Button label on the form
  pub fn action_label(self) -> &'static str {
    match self {
      SummaryKind::MedicalRecord => "Generate for Medical Record",
      SummaryKind::Consultation => "Generate for Consultation",
      SummaryKind::Custom => "Generate Custom Summary",
    }
  }

  /// Heading shown above the generated text
  pub fn heading(self) -> &'static str {
    match self {
      SummaryKind::MedicalRecord => "Generated Summary for Medical Record:",
      SummaryKind::Consultation => "Generated Summary for Consultation:",
      SummaryKind::Custom => "Generated Custom Summary:",
    }
  }

  pub fn slug(self) -> &'static str {
    match self {
      SummaryKind::MedicalRecord => "medical-record",
      SummaryKind::Consultation => "consultation",
      SummaryKind::Custom => "custom",
    }
  }
}

/// Join an instruction and the notes into the prompt sent to the model
pub fn build_prompt(instruction: &str, notes: &str) -> String {
  let mut prompt = String::with_capacity(instruction.len() + NOTES_SEPARATOR.len() + notes.len());
  prompt.push_str(instruction);
  prompt.push_str(NOTES_SEPARATOR);
  prompt.push_str(notes);
  prompt
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_build_prompt_is_exact() {
    let prompt = build_prompt("Summarize X", "patient has fever");
    assert_eq!(prompt, "Summarize X\n\nNotes:\npatient has fever");
  }

  #[test]
  fn test_build_prompt_keeps_whitespace_verbatim() {
    let prompt = build_prompt("  instr \n", "\tnotes  ");
    assert_eq!(prompt, format!("{}{}{}", "  instr \n", NOTES_SEPARATOR, "\tnotes  "));
  }

  #[test]
  fn test_fixed_instructions() {
    assert_eq!(SummaryKind::MedicalRecord.fixed_instruction(), Some(MEDICAL_RECORD_INSTRUCTION));
    assert_eq!(SummaryKind::Consultation.fixed_instruction(), Some(CONSULTATION_INSTRUCTION));
    assert_eq!(SummaryKind::Custom.fixed_instruction(), None);
  }

  #[test]
  fn test_kind_serializes_as_slug() {
    for kind in SummaryKind::ALL {
      let json = serde_json::to_string(&kind).unwrap();
      assert_eq!(json, format!("\"{}\"", kind.slug()));
    }
  }
}
