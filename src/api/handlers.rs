use axum::{http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type AppState<S> = Arc<S>;

/// Error payload shared by every failing response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

pub(crate) fn not_found(entity: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(&format!("{} not found", entity))),
    )
}

/// Creates report a fixed message; the store error only goes to the log.
pub(crate) fn create_failed(entity: &str, error: Option<anyhow::Error>) -> ApiError {
    match error {
        Some(e) => log::error!("Failed to create {}: {:#}", entity, e),
        None => log::error!("Failed to create {}: store returned no row", entity),
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(&format!("Failed to create {}", entity))),
    )
}

/// Same shape as `create_failed`: the full error chain is logged, the
/// response names only the action.
pub(crate) fn store_failure(action: &str, error: anyhow::Error) -> ApiError {
    log::error!("Failed to {}: {:#}", action, error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(&format!("Failed to {}", action))),
    )
}

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
