use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    DependencyMissing(String),

    /// The engine ran but reported failure (non-zero exit or non-200
    /// downstream status). The message carries the engine diagnostic.
    #[error("{0}")]
    Engine(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("Server Error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::DependencyMissing(_)
            | RelayError::Engine(_)
            | RelayError::Http(_)
            | RelayError::Io(_)
            | RelayError::Timeout(_)
            | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %detail, "request failed");
        }

        let body = Json(json!({ "detail": detail }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
