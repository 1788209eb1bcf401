use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::store::{StoreError, StoreOperation};
use crate::validation::ValidationError;

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Submitted data violated field constraints.
    Validation(ValidationError),
    /// The lead store failed to complete an operation.
    Store(StoreError),
    /// The request body exceeded the size limit.
    PayloadTooLarge,
    /// No route matched the request.
    NotFound(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "Validation error: {}", e),
            AppError::Store(e) => write!(f, "Store error: {}", e),
            AppError::PayloadTooLarge => write!(f, "Payload too large"),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Store failures are logged with their cause and answered with a
    /// generic message; the cause never reaches the client.
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(e) => {
                tracing::warn!("Rejected lead submission: {}", e);
                let body = Json(json!({
                    "error": "Dados inválidos",
                    "details": e.errors,
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            AppError::Store(e) => {
                let operation = e.operation();
                tracing::error!("Lead store {} failed: {}", operation, e);
                let message = match operation {
                    StoreOperation::Insert => "Erro interno do servidor",
                    StoreOperation::List => "Erro ao buscar leads",
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
            AppError::PayloadTooLarge => {
                tracing::warn!("Rejected oversized request body");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Json(json!({ "error": "Requisição muito grande" })),
                )
                    .into_response()
            }
            AppError::NotFound(path) => {
                tracing::debug!("No route for {}", path);
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" }))).into_response()
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}
