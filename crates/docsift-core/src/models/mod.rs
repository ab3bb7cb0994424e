//! Data models for extraction results, classification output, and configuration.

pub mod config;
pub mod document;

pub use config::{CloudConfig, DocsiftConfig, ExtractionOptions, LocalConfig, RoutingConfig};
pub use document::{
    BoundingBox, ClassificationResult, DocumentType, EngineKind, ExtractionResult, LayoutAnalysis,
    Orientation, Section, TextBlock, TextQuality, TypeCandidate, VendorInfo,
};
