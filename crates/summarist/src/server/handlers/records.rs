//! Gated spreadsheet download

use axum::{
  extract::{Extension, Json, State},
  http::{header, StatusCode},
  response::{IntoResponse, Response},
};

use crate::errors::Error;
use crate::server::middleware::RequestContext;
use crate::server::types::{failure, ApiFailure, ExportRequest};
use crate::server::AppState;

/// File name offered to the browser
pub const EXPORT_FILE_NAME: &str = "generation_records.csv";

/// POST /records/export - Release the full table as CSV to an accepted phrase
pub async fn export_records(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Json(request): Json<ExportRequest>,
) -> Result<Response, ApiFailure> {
  let transaction_id = context.request_id;

  match state.service.download(&request.access_phrase) {
    Ok(bytes) => {
      context.log_success(&format!("Exported records ({} bytes)", bytes.len()), "records-api").await;
      let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
      Ok(
        (
          [(header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()), (header::CONTENT_DISPOSITION, disposition)],
          bytes,
        )
          .into_response(),
      )
    }
    Err(Error::Authorization(e)) => {
      context.log_warn("Download denied: access phrase not recognised", "records-api").await;
      Err(failure(StatusCode::FORBIDDEN, "access_denied", &e.to_string(), transaction_id))
    }
    Err(e) => {
      context.log_error(&format!("Export failed: {e}"), "records-api").await;
      Err(failure(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", &e.to_string(), transaction_id))
    }
  }
}
