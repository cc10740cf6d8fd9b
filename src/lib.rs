//! stemserve - audio stem separation service
//!
//! Accepts an uploaded audio file over HTTP, normalizes its format when
//! the separation engine cannot ingest it directly, runs Demucs as a
//! subprocess, and streams the resulting stems back as a zip archive.
//! Each request works inside its own ephemeral directory which is removed
//! on every exit path; nothing is persisted.

pub mod api;
pub mod binaries;
pub mod config;
pub mod error;
pub mod package;
pub mod pipeline;
pub mod separate;
pub mod transcode;

mod util;

pub use crate::config::Config;
pub use crate::error::{Error, Result};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted upload; full-length lossless tracks fit comfortably
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (model name, binary overrides)
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(api::health_check))
        .route(
            "/api/separate",
            post(api::separate_upload).options(api::separate_preflight),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
