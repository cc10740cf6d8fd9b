//! Upload-and-separate endpoint

use crate::binaries::BinaryResolver;
use crate::error::{Error, Result};
use crate::pipeline::SeparationPipeline;
use crate::AppState;
use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde_json::json;
use tracing::info;

/// POST /api/separate
///
/// Takes a multipart upload with a single file field, runs the separation
/// pipeline, and streams back the zip of produced stems.
pub async fn separate_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("malformed multipart body: {e}")))?
    {
        if let Some(filename) = field.file_name() {
            let filename = filename.to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::InvalidRequest(format!("failed to read upload: {e}")))?;
            upload = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = upload.ok_or_else(|| Error::InvalidRequest("file required".to_string()))?;
    info!(filename = filename.as_str(), bytes = data.len(), "received separation request");

    // Binaries are resolved fresh per request; nothing is cached between
    // requests.
    let resolver = BinaryResolver::from_config(&state.config);
    let pipeline = SeparationPipeline::new(state.config.model.clone(), resolver);
    let result = pipeline.handle(&filename, &data).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header("X-Model", &result.model)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", result.download_name),
        )
        .body(Body::from(result.archive))
        .map_err(|e| Error::Internal(format!("failed to build response: {e}")))
}

/// OPTIONS /api/separate
///
/// Trivial acknowledgment for CORS pre-flight; the CORS layer supplies
/// the actual headers.
pub async fn separate_preflight() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
