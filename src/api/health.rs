//! Health check endpoint

use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

/// Health check response: service status plus the configured model
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.config.model.clone(),
    })
}
