//! Summary generation endpoint

use axum::{
  extract::{Extension, Json, State},
  http::StatusCode,
  response::Json as ResponseJson,
};

use crate::errors::Error;
use crate::server::middleware::RequestContext;
use crate::server::types::{
  failure, ApiError, ApiFailure, BaseResponse, SummaryRequestBody, SummaryResponse,
};
use crate::server::AppState;
use crate::service::SummaryRequest;

/// POST /summaries - Generate a summary and record it
pub async fn create_summary(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Json(body): Json<SummaryRequestBody>,
) -> Result<ResponseJson<BaseResponse<SummaryResponse>>, ApiFailure> {
  let transaction_id = context.request_id;
  let request = SummaryRequest { kind: body.kind, notes: body.notes, custom_instruction: body.custom_prompt };

  context.log_info(&format!("Generating {} summary", request.kind.slug()), "summaries-api").await;

  let outcome = match state.service.summarize(&request).await {
    Ok(outcome) => outcome,
    Err(Error::Validation(e)) => {
      context.log_warn(&format!("Rejected request: {e}"), "summaries-api").await;
      return Err(failure(StatusCode::BAD_REQUEST, "validation_failed", &e.to_string(), transaction_id));
    }
    Err(Error::Generation(e)) => {
      context.log_error(&format!("Generation failed: {e}"), "summaries-api").await;
      return Err(failure(StatusCode::BAD_GATEWAY, "generation_failed", &e.to_string(), transaction_id));
    }
    Err(e) => {
      context.log_error(&format!("Summary request failed: {e}"), "summaries-api").await;
      return Err(failure(StatusCode::INTERNAL_SERVER_ERROR, "summary_failed", &e.to_string(), transaction_id));
    }
  };

  let mut warnings = Vec::new();
  match &outcome.save_error {
    None => {
      context.log_success(&format!("Recorded {} summary", outcome.kind.slug()), "summaries-api").await;
    }
    Some(e) => {
      // The summary is still returned; the save failure travels as a warning
      context.log_warn(&format!("Summary generated but not saved: {e}"), "summaries-api").await;
      warnings.push(ApiError::new("record_save_failed", &format!("The summary could not be saved: {e}")));
    }
  }

  let response = SummaryResponse {
    kind: outcome.kind,
    heading: outcome.heading().to_string(),
    saved: outcome.saved(),
    summary: outcome.record.summary,
  };

  Ok(ResponseJson(BaseResponse::with_warnings(response, warnings, transaction_id)))
}
