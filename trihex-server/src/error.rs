//! Mapping engine failures to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use trihex_core::SnapshotError;
use trihex_worker::WorkerError;

#[derive(Debug)]
pub struct ApiError(pub WorkerError);

impl From<WorkerError> for ApiError {
    fn from(err: WorkerError) -> Self {
        Self(err)
    }
}

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        Self(WorkerError::Snapshot(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            WorkerError::Snapshot(_) => StatusCode::BAD_REQUEST,
            WorkerError::Cancelled => StatusCode::CONFLICT,
            WorkerError::Stopped => StatusCode::SERVICE_UNAVAILABLE,
            WorkerError::Rule(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
