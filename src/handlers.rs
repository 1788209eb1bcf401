use crate::config::Config;
use crate::errors::AppError;
use crate::models::{Lead, LeadCreate, LeadResponse, RootResponse};
use crate::store::LeadStore;
use crate::validation::{validate_lead, ValidationError};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{StatusCode, Uri},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Lead persistence, shared by all requests.
    pub store: Arc<dyn LeadStore>,
    /// Application configuration.
    pub config: Config,
}

/// Health check endpoint.
///
/// Returns the service status and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse::default())
}

/// POST /api/leads
///
/// Validates the submission before anything is written; only a fully valid
/// lead reaches the store.
///
/// # Returns
///
/// * `Result<Json<LeadResponse>, AppError>` - The confirmation with the new lead id,
///   413 for bodies over [`crate::app::MAX_BODY_BYTES`], 422 for invalid input or
///   500 when the store fails.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LeadCreate>, JsonRejection>,
) -> Result<Json<LeadResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        // Bodies without Content-Length only hit the size limit while being read.
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            ValidationError::malformed_body(rejection.body_text()).into()
        }
    })?;

    let new_lead = validate_lead(payload)?;
    let lead = state.store.insert(new_lead).await?;

    tracing::info!("Lead {} created", lead.id);

    Ok(Json(LeadResponse::created(lead.id)))
}

/// GET /api/leads
///
/// Lists stored leads, capped at [`crate::store::LIST_LIMIT`].
pub async fn list_leads(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Lead>>, AppError> {
    let leads = state.store.list_all().await?;

    tracing::info!("Returning {} leads", leads.len());

    Ok(Json(leads))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
