//! Document data models shared across extraction and classification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Document categories the classifier can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Point-of-sale receipt.
    Receipt,
    /// Commercial invoice.
    Invoice,
    /// Warranty certificate.
    Warranty,
    /// Nothing matched.
    Unknown,
}

impl DocumentType {
    /// The classifiable types, in declaration order. Ties between equal
    /// scores resolve to the earlier entry.
    pub const CLASSIFIABLE: [DocumentType; 3] = [
        DocumentType::Receipt,
        DocumentType::Invoice,
        DocumentType::Warranty,
    ];
}

impl Default for DocumentType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DocumentType::Receipt => "receipt",
            DocumentType::Invoice => "invoice",
            DocumentType::Warranty => "warranty",
            DocumentType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Which extraction engine produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Cloud vision API.
    Cloud,
    /// Local Tesseract engine.
    Local,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Cloud => f.write_str("cloud"),
            EngineKind::Local => f.write_str("local"),
        }
    }
}

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl BoundingBox {
    pub fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Vertical midpoint, used for region queries.
    pub fn vertical_center(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// A box is well-formed when both extents are non-negative.
    pub fn is_valid(&self) -> bool {
        self.bottom >= self.top && self.right >= self.left
    }

    /// Taller than wide, which suggests rotated text.
    pub fn is_vertical(&self) -> bool {
        self.height() > self.width()
    }
}

/// One OCR-detected text region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    /// Recognized text content.
    pub text: String,

    /// Bounding box in pixel coordinates.
    pub bbox: BoundingBox,

    /// Recognition confidence (0.0 - 1.0), when the engine reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Result of one text-extraction call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Full recognized text.
    pub text: String,

    /// Overall engine confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Text regions in the engine's native reading order.
    pub blocks: Vec<TextBlock>,

    /// Normalized text, attached by the router when Hebrew is detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_text: Option<String>,

    /// Languages observed in the output.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub languages: Vec<String>,

    /// Engine that produced this result.
    pub engine: EngineKind,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Vendor information pulled from the document header and contact lines.
///
/// `confidence` is a sum of per-field contributions and is deliberately not
/// normalized; treat it as a relative score, not a probability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    pub confidence: f32,
}

/// A non-winning type that still met its own confidence threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCandidate {
    pub doc_type: DocumentType,
    pub confidence: f32,
}

/// OCR quality estimate over the extracted blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextQuality {
    /// Combined quality score (0.0 - 1.0).
    pub score: f32,

    /// Mean per-block recognition confidence.
    pub confidence: f32,

    /// Whether any block contains OCR error markers.
    pub has_errors: bool,
}

/// Page orientation inferred from block geometry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Orientation {
    /// Estimated rotation angle in degrees (0 or 90).
    pub angle: i32,

    /// Confidence in the estimate (0.0 - 1.0).
    pub confidence: f32,
}

/// A titled run of blocks beneath a header-shaped line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Header text that opened the section.
    pub title: String,

    /// Index of the header in the classifier's top-sorted block order.
    pub start_index: usize,

    /// Blocks belonging to this section, header excluded.
    pub blocks: Vec<TextBlock>,
}

/// Layout findings reported alongside the classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutAnalysis {
    /// Column centroids (x positions) detected from left-edge clusters.
    pub columns: Vec<f32>,

    /// Inferred page orientation.
    pub orientation: Orientation,

    /// Header-delimited sections.
    pub sections: Vec<Section>,
}

/// Result of classifying one extraction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning document type.
    pub doc_type: DocumentType,

    /// Winning type's score (0.0 when nothing matched).
    pub confidence: f32,

    /// Vendor details.
    pub vendor: VendorInfo,

    /// Extracted metadata fields, keyed by field name.
    pub metadata: BTreeMap<String, String>,

    /// Non-winning types that met their own threshold.
    pub possible_types: Vec<TypeCandidate>,

    /// OCR quality estimate.
    pub text_quality: TextQuality,

    /// Layout findings.
    pub layout: LayoutAnalysis,
}
