//! Error types for stemserve
//!
//! Defines the pipeline error taxonomy using thiserror, with an
//! `IntoResponse` impl mapping each class to an HTTP status and a JSON
//! error body. Processing failures carry captured subprocess diagnostics
//! so callers can debug an external engine without server access.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Pipeline and API error type
#[derive(Debug, Error)]
pub enum Error {
    /// Caller fault: missing or unusable upload (400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Required external binary unresolvable, or transcoder missing when needed (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// ffmpeg transcode failed; message includes captured diagnostics (500)
    #[error("Transcode failed: {0}")]
    Transcode(String),

    /// Separation engine failed or produced no output directory (500)
    #[error("Separation failed: {0}")]
    Separation(String),

    /// Archive assembly failed, including the no-stems case (500)
    #[error("Packaging failed: {0}")]
    Packaging(String),

    /// File I/O errors from workspace handling
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Error::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION", msg),
            Error::Transcode(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "TRANSCODE_FAILED", msg),
            Error::Separation(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SEPARATION_FAILED", msg)
            }
            Error::Packaging(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "PACKAGING_FAILED", msg),
            Error::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Convenience Result type using the stemserve Error
pub type Result<T> = std::result::Result<T, Error>;
