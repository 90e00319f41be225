//! Status and version endpoint handlers

use axum::{
  extract::{Extension, State},
  http::StatusCode,
  response::Json,
};
use uuid::Uuid;

use crate::server::middleware::RequestContext;
use crate::server::types::{failure, ApiFailure, BaseResponse, StatusResponse, VersionResponse};
use crate::server::AppState;

/// GET /status - Health check with store details
pub async fn status(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Result<Json<BaseResponse<StatusResponse>>, ApiFailure> {
  match state.service.record_count() {
    Ok(record_count) => {
      let response = StatusResponse {
        status: "healthy".to_string(),
        model: state.model.clone(),
        store_path: state.service.store().path().to_string_lossy().to_string(),
        record_count,
        downloads_enabled: state.service.downloads_enabled(),
      };
      Ok(Json(BaseResponse::success(response, context.request_id)))
    }
    Err(e) => {
      context.log_error(&format!("Status check could not read the store: {e}"), "status-api").await;
      Err(failure(StatusCode::INTERNAL_SERVER_ERROR, "store_unreadable", &e.to_string(), context.request_id))
    }
  }
}

/// GET /version - Returns current server version
pub async fn version() -> Json<BaseResponse<VersionResponse>> {
  let response = VersionResponse { version: env!("CARGO_PKG_VERSION").to_string() };
  Json(BaseResponse::success(response, Uuid::new_v4()))
}
