//! Thin HTTP relay in front of an external OCR engine.
//!
//! Accepts an image upload on `POST /api/ocr`, validates that it is
//! image-typed, hands the bytes to one of three interchangeable extraction
//! backends (containerized engine, downstream HTTP service, or local cli
//! tool), and returns the extracted text as `{"text": "..."}`. Nothing is
//! persisted; every entity is scoped to a single request.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod upload;
