//! REST API types with schemars annotations for OpenAPI generation

use axum::{http::StatusCode, response::Json};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::prompt::SummaryKind;

// Base Response Structure
// ======================

/// Envelope for every JSON response
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BaseResponse<T> {
  /// Server version that produced the response
  pub version: String,

  /// Correlates the response with activity log entries
  pub transaction_id: Uuid,

  /// Errors and warnings; may be present on a successful response
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,

  #[serde(flatten)]
  pub data: T,
}

/// API error information
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
  /// Error key, unique to the error source
  pub key: String,

  /// Human readable error message
  pub message: String,
}

/// Error half of every handler's return type
pub type ApiFailure = (StatusCode, Json<BaseResponse<()>>);

impl<T> BaseResponse<T> {
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { version: env!("CARGO_PKG_VERSION").to_string(), transaction_id, errors: Vec::new(), data }
  }

  /// Successful response that still carries warnings
  pub fn with_warnings(data: T, warnings: Vec<ApiError>, transaction_id: Uuid) -> Self {
    Self { errors: warnings, ..Self::success(data, transaction_id) }
  }
}

impl BaseResponse<()> {
  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> Self {
    Self { errors, ..Self::success((), transaction_id) }
  }
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string() }
  }
}

/// Build the error tuple handlers return
pub fn failure(status: StatusCode, key: &str, message: &str, transaction_id: Uuid) -> ApiFailure {
  (status, Json(BaseResponse::error(vec![ApiError::new(key, message)], transaction_id)))
}

// Status/Version Endpoints
// =======================

/// Response for /status
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
  pub status: String,
  pub model: String,
  pub store_path: String,
  pub record_count: usize,
  /// False when no access phrase is configured
  pub downloads_enabled: bool,
}

/// Response for /version
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionResponse {
  pub version: String,
}

// Logs Endpoint
// =============

/// Query string for /logs
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct LogsQuery {
  /// Newest entries to return (default 100)
  pub limit: Option<usize>,

  /// Level filter; "all" or absent disables filtering
  pub level: Option<String>,
}

/// Response for /logs
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LogsResponse {
  pub logs: Vec<LogEntry>,
}

pub type LogEntry = chronicle::activity::LogEntry;

// Summary Endpoints
// =================

/// Request for POST /summaries
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SummaryRequestBody {
  pub kind: SummaryKind,

  #[serde(default)]
  pub notes: String,

  /// Instruction for the custom kind; ignored otherwise
  #[serde(default)]
  pub custom_prompt: Option<String>,
}

/// Response for POST /summaries
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SummaryResponse {
  pub kind: SummaryKind,

  /// Heading to show above the summary
  pub heading: String,

  /// Generated text, verbatim
  pub summary: String,

  /// Whether the record reached the spreadsheet
  pub saved: bool,
}

// Export Endpoint
// ===============

/// Request for POST /records/export
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExportRequest {
  #[serde(default)]
  pub access_phrase: String,
}
