use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OCR Relay API",
        version = "1.0.0",
        description = "Thin relay that forwards image uploads to an external OCR engine and returns the extracted text.",
    ),
    paths(
        handlers::read_root,
        handlers::perform_ocr,
        handlers::engine_ocr,
    ),
    components(schemas(
        handlers::StatusMessage,
        handlers::OcrResponse,
    )),
    tags(
        (name = "relay", description = "Image upload and text extraction"),
        (name = "engine", description = "Downstream OCR microservice surface"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
