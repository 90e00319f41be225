//! Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{SamplingConfig, TextGenerator};
use crate::config::Settings;
use crate::errors::{ConfigError, GenerationError};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection details for the Gemini API
#[derive(Clone)]
pub struct GeminiConfig {
  /// Base URL, e.g. "https://generativelanguage.googleapis.com"
  pub endpoint: String,
  pub model: String,
  pub api_key: String,
  pub timeout_secs: u64,
}

impl GeminiConfig {
  pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
    Ok(Self {
      endpoint: settings.generation.endpoint.clone(),
      model: settings.generation.model.clone(),
      api_key: settings.api_key()?.to_string(),
      timeout_secs: settings.generation.timeout_secs,
    })
  }

  fn url(&self) -> String {
    let model = self.model.trim_start_matches("models/");
    format!("{}/v1beta/models/{model}:generateContent", self.endpoint.trim_end_matches('/'))
  }
}

/// HTTP client for the hosted Gemini models
pub struct GeminiClient {
  client: Client,
  config: GeminiConfig,
}

impl GeminiClient {
  pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| GenerationError::not_configured(format!("failed to build HTTP client: {e}")))?;

    Ok(Self { client, config })
  }
}

// Wire types
// ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
  contents: Vec<Content<'a>>,
  generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
  parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
  text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  max_output_tokens: u32,
  temperature: f32,
  top_p: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  top_k: Option<u32>,
}

impl From<&SamplingConfig> for GenerationConfig {
  fn from(sampling: &SamplingConfig) -> Self {
    Self {
      max_output_tokens: sampling.max_output_tokens,
      temperature: sampling.temperature,
      top_p: sampling.top_p,
      top_k: sampling.top_k,
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
  content: Option<CandidateContent>,
  finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
  block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  message: String,
}

/// Pull the human-readable message out of an error body, if there is one
fn error_message(status: StatusCode, body: &str) -> String {
  serde_json::from_str::<ErrorEnvelope>(body)
    .map(|envelope| envelope.error.message)
    .unwrap_or_else(|_| {
      let trimmed = body.trim();
      if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
      } else {
        trimmed.to_string()
      }
    })
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
  let Some(candidate) = response.candidates.into_iter().next() else {
    let reason = response
      .prompt_feedback
      .and_then(|feedback| feedback.block_reason)
      .map(|reason| format!("prompt blocked ({reason})"))
      .unwrap_or_else(|| "no candidates returned".to_string());
    return Err(GenerationError::empty(reason));
  };

  let text: String = candidate
    .content
    .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
    .unwrap_or_default();

  if text.is_empty() {
    let reason = candidate
      .finish_reason
      .map(|reason| format!("candidate finished with {reason}"))
      .unwrap_or_else(|| "candidate had no text".to_string());
    return Err(GenerationError::empty(reason));
  }

  Ok(text)
}

#[async_trait]
impl TextGenerator for GeminiClient {
  async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String, GenerationError> {
    let body = GenerateContentRequest {
      contents: vec![Content { parts: vec![RequestPart { text: prompt }] }],
      generation_config: sampling.into(),
    };

    tracing::debug!(model = %self.config.model, "sending generateContent request");

    let response = self
      .client
      .post(self.config.url())
      .header(API_KEY_HEADER, &self.config.api_key)
      .json(&body)
      .send()
      .await
      .map_err(|e| GenerationError::network(e.to_string()))?;

    let status = response.status();
    let text = response.text().await.map_err(|e| GenerationError::network(e.to_string()))?;

    if status == StatusCode::TOO_MANY_REQUESTS {
      return Err(GenerationError::quota(error_message(status, &text)));
    }
    if !status.is_success() {
      return Err(GenerationError::api(status.as_u16(), error_message(status, &text)));
    }

    let parsed: GenerateContentResponse =
      serde_json::from_str(&text).map_err(|e| GenerationError::malformed(e.to_string()))?;

    extract_text(parsed)
  }
}
