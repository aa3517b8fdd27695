use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::error::{RelayError, Result};
use crate::upload::Upload;

use super::state::AppState;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct StatusMessage {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrResponse {
    /// Extracted text, leading/trailing whitespace trimmed. Empty when the
    /// image contained no recognizable text.
    pub text: String,
}

/// `GET /`
#[utoipa::path(
    get,
    path = "/",
    tag = "relay",
    responses(
        (status = 200, description = "Service liveness message", body = StatusMessage),
    )
)]
pub async fn read_root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "OCR API is running".to_string(),
    })
}

/// Pull the `file` field out of the multipart body.
///
/// Exactly one upload exists per request; it is consumed by the engine and
/// never stored.
async fn read_file_field(multipart: &mut Multipart) -> Result<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| RelayError::Validation(format!("Failed to read file: {e}")))?;

        return Ok(Upload::new(bytes.to_vec(), content_type, file_name));
    }

    Err(RelayError::Validation("No file provided".to_string()))
}

/// `POST /api/ocr` — the relay surface.
///
/// Validates that the upload is image-typed, delegates to the configured
/// engine, and returns the trimmed text. Validation failures are 400s with a
/// `detail` body; engine and tooling failures are 500s.
#[utoipa::path(
    post,
    path = "/api/ocr",
    tag = "relay",
    responses(
        (status = 200, description = "Extracted text", body = OcrResponse),
        (status = 400, description = "Upload missing or not an image"),
        (status = 500, description = "Engine or tooling failure"),
    )
)]
pub async fn perform_ocr(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>> {
    let upload = read_file_field(&mut multipart).await?;
    upload.validate_image()?;

    tracing::debug!(
        bytes = upload.bytes.len(),
        file_name = upload.file_name.as_deref().unwrap_or("<none>"),
        "dispatching upload to OCR engine"
    );

    let text = state.extractor.extract(&upload.bytes).await?;

    Ok(Json(OcrResponse { text }))
}

/// `POST /ocr` — the engine surface.
///
/// Serves the downstream microservice contract with the local cli engine, so
/// a `service`-configured relay can point at another instance of this binary.
/// Mirrors that contract's wire format rather than the relay's `detail`
/// envelope, and performs no image validation.
#[utoipa::path(
    post,
    path = "/ocr",
    tag = "engine",
    responses(
        (status = 200, description = "Extracted text", body = OcrResponse),
        (status = 400, description = "No file provided"),
        (status = 500, description = "OCR failed"),
    )
)]
pub async fn engine_ocr(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = match read_file_field(&mut multipart).await {
        Ok(upload) => upload,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "No file provided" })),
            )
                .into_response();
        }
    };

    let budget = Duration::from_secs(state.config.ocr.timeout_secs);
    let result = tokio::time::timeout(budget, state.cli.extract(&upload.bytes)).await;

    match result {
        Ok(Ok(text)) => Json(OcrResponse { text }).into_response(),
        Ok(Err(err)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "OCR failed", "details": err.to_string() })),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "OCR failed",
                "details": format!(
                    "OCR operation timed out after {} seconds",
                    state.config.ocr.timeout_secs
                ),
            })),
        )
            .into_response(),
    }
}
