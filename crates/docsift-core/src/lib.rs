//! Core library for document text extraction and classification.
//!
//! This crate provides:
//! - Two interchangeable OCR adapters (cloud vision API, local Tesseract)
//! - Complexity-based routing between them
//! - Hebrew text detection and normalization
//! - Document classification (receipt / invoice / warranty) with vendor and
//!   metadata extraction, text quality, and layout analysis

pub mod classify;
pub mod error;
pub mod extract;
pub mod hebrew;
pub mod models;
pub mod pipeline;

pub use classify::DocumentClassifier;
pub use error::{ClassificationError, DocsiftError, ExtractionError, Result};
pub use extract::{
    CloudVisionExtractor, ComplexityAssessment, ComplexityAssessor, ExtractionRouter,
    HeuristicAssessor, TesseractExtractor, TextExtractor,
};
pub use models::{
    BoundingBox, ClassificationResult, DocsiftConfig, DocumentType, EngineKind, ExtractionOptions,
    ExtractionResult, TextBlock, VendorInfo,
};
pub use pipeline::DocumentPipeline;
