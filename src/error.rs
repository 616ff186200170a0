use crate::db::StoreError;
use crate::engine::SettlementError;
use crate::orchestration::OrchestrationError;
use crate::upi::UpiError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::BillNotFound(_) => AppError::NotFound(err.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<UpiError> for AppError {
    fn from(err: UpiError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<OrchestrationError> for AppError {
    fn from(err: OrchestrationError) -> Self {
        match err {
            OrchestrationError::Settlement(e) => e.into(),
            OrchestrationError::Upi(e) => e.into(),
            OrchestrationError::Store(e) => e.into(),
            OrchestrationError::ParticipantNotFound(_) => AppError::NotFound(err.to_string()),
            OrchestrationError::Validation(errors) => AppError::Validation(errors),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation failed", "errors": errors }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
