//! Generation invoker
//!
//! Builds the prompt for a request and hands it to a [`TextGenerator`] with
//! the configured sampling parameters. The invoker never persists anything;
//! saving the result is the caller's decision.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::GenerationError;
use crate::prompt::build_prompt;

pub mod gemini;

pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_TOP_P: f32 = 0.95;
pub const DEFAULT_TOP_K: Option<u32> = Some(34);

/// Decoding parameters sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
  pub max_output_tokens: u32,
  pub temperature: f32,
  pub top_p: f32,
  pub top_k: Option<u32>,
}

impl Default for SamplingConfig {
  fn default() -> Self {
    Self {
      max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
      temperature: DEFAULT_TEMPERATURE,
      top_p: DEFAULT_TOP_P,
      top_k: DEFAULT_TOP_K,
    }
  }
}

/// External text-generation service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
  async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String, GenerationError>;
}

/// Prompt assembly plus one call to the generation service
#[derive(Clone)]
pub struct GenerationInvoker {
  generator: Arc<dyn TextGenerator>,
  sampling: SamplingConfig,
}

impl GenerationInvoker {
  pub fn new(generator: Arc<dyn TextGenerator>, sampling: SamplingConfig) -> Self {
    Self { generator, sampling }
  }

  /// Generate text for `notes` under `instruction`.
  ///
  /// Returns the service output verbatim. Inputs are not checked here;
  /// the caller validates before invoking.
  pub async fn generate(&self, notes: &str, instruction: &str) -> Result<String, GenerationError> {
    let prompt = build_prompt(instruction, notes);
    tracing::debug!(prompt_len = prompt.len(), "invoking text generator");
    self.generator.generate(&prompt, &self.sampling).await
  }
}
