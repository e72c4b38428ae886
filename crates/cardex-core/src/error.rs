//! Error types for the cardex-core library.
//!
//! Field extraction itself never fails; these errors only come from the
//! collaborators around it (OCR, generative model, files).

use thiserror::Error;

/// Main error type for the cardex library.
#[derive(Error, Debug)]
pub enum CardexError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Generative extraction error.
    #[error("generative extraction error: {0}")]
    Generative(#[from] GenerativeError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Input kind the line source cannot read.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
}

/// Errors from the generative extraction collaborator.
#[derive(Error, Debug)]
pub enum GenerativeError {
    /// The model could not be reached or refused the request.
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// The response was not valid JSON.
    #[error("invalid JSON in response: {0}")]
    InvalidJson(String),

    /// The response was JSON but not an object.
    #[error("response is not a JSON object")]
    NotAnObject,

    /// The response was an empty object.
    #[error("response object is empty")]
    EmptyObject,

    /// Required keys were absent.
    #[error("response is missing keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
}

/// Errors related to field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// An extractor panicked; the field falls back to the sentinel.
    #[error("extractor for {field} failed: {reason}")]
    ExtractorFailed { field: String, reason: String },
}

/// Result type for the cardex library.
pub type Result<T> = std::result::Result<T, CardexError>;
