//! Logs endpoint handler

use axum::{
  extract::{Extension, Query},
  http::StatusCode,
  response::Json,
};
use chronicle::Level;

use crate::server::middleware::RequestContext;
use crate::server::types::{failure, ApiFailure, BaseResponse, LogsQuery, LogsResponse};

const DEFAULT_LIMIT: usize = 100;

/// GET /logs - Recent activity log entries
pub async fn get_logs(
  Extension(context): Extension<RequestContext>,
  Query(query): Query<LogsQuery>,
) -> Result<Json<BaseResponse<LogsResponse>>, ApiFailure> {
  let level = match query.level.as_deref() {
    None | Some("all") => None,
    Some(raw) => match raw.parse::<Level>() {
      Ok(level) => Some(level),
      Err(message) => {
        return Err(failure(StatusCode::BAD_REQUEST, "invalid_level", &message, context.request_id));
      }
    },
  };

  match context.logs.entries(Some(query.limit.unwrap_or(DEFAULT_LIMIT)), level).await {
    Ok(logs) => Ok(Json(BaseResponse::success(LogsResponse { logs }, context.request_id))),
    Err(e) => Err(failure(
      StatusCode::INTERNAL_SERVER_ERROR,
      "logs_read_failed",
      &format!("Failed to read logs: {e}"),
      context.request_id,
    )),
  }
}
