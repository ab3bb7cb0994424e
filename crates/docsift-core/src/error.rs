//! Error types for the docsift-core library.

use thiserror::Error;

/// Main error type for the docsift library.
#[derive(Error, Debug)]
pub enum DocsiftError {
    /// Text extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Document classification error.
    #[error("classification error: {0}")]
    Classification(#[from] ClassificationError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the text-extraction adapters and the router.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// HTTP transport failure while calling the cloud engine.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The cloud engine answered with an error status or payload.
    #[error("cloud engine rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    /// The cloud engine answered 200 but the payload was not usable.
    #[error("unexpected engine response: {0}")]
    Response(String),

    /// The local engine process failed.
    #[error("engine failed: {0}")]
    Engine(String),

    /// The local engine binary or its language data is not installed.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The image buffer could not be decoded or measured.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// I/O failure while staging data for an engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the document classifier.
#[derive(Error, Debug)]
pub enum ClassificationError {
    /// The extraction result carries no text and no blocks to classify.
    #[error("extraction result has no text and no blocks")]
    MissingText,
}

/// Result type for the docsift library.
pub type Result<T> = std::result::Result<T, DocsiftError>;
