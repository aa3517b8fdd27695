use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::config::OcrConfig;
use crate::error::{RelayError, Result};

/// Strategy (b): forward the upload to a downstream OCR microservice.
///
/// The downstream contract is the one the relay itself serves on `POST /ocr`:
/// multipart field `file`, `200 {"text": ...}` on success, and an
/// `{"error": ..., "details": ...}` body on failure.
#[derive(Debug, Clone)]
pub struct ServiceEngine {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ServiceResponse {
    text: String,
}

impl ServiceEngine {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.service_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn extract(&self, image_bytes: &[u8]) -> Result<String> {
        let part = Part::bytes(image_bytes.to_vec())
            .file_name("upload.png")
            .mime_str("image/png")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/ocr", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: ServiceResponse = response
                .json()
                .await
                .map_err(|e| RelayError::Internal(format!("Invalid OCR service response: {e}")))?;
            return Ok(body.text.trim().to_string());
        }

        let body = response.text().await.unwrap_or_default();
        Err(RelayError::Engine(compose_downstream_error(
            status.as_u16(),
            &body,
        )))
    }
}

/// Build a diagnostic from whatever `error`/`details` fields the downstream
/// body carries, falling back to the bare status when the body is empty or
/// not JSON.
fn compose_downstream_error(status: u16, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    let error = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let details = parsed
        .as_ref()
        .and_then(|v| v.get("details"))
        .and_then(|v| v.as_str())
        .filter(|d| !d.trim().is_empty())
        .map(str::to_string);

    match (error, details) {
        (Some(error), Some(details)) => format!("OCR service error: {error}: {details}"),
        (Some(error), None) => format!("OCR service error: {error}"),
        _ => format!("OCR service returned status {status}"),
    }
}
