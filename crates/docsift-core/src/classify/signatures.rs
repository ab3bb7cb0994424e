//! Per-type signature tables and scoring weights.
//!
//! The tables are process-wide immutable configuration, built once at
//! startup. Tuning a type means editing data here, not control flow in the
//! classifier.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns;
use crate::models::DocumentType;

/// Keyword-match share of a type score.
pub const KEYWORD_WEIGHT: f32 = 0.5;
/// Pattern-match share of a type score.
pub const PATTERN_WEIGHT: f32 = 0.3;
/// Layout-structure share of a type score.
pub const STRUCTURE_WEIGHT: f32 = 0.2;

/// Structure sub-weights: vertical spacing, left alignment, block height.
pub const SPACING_WEIGHT: f32 = 0.3;
pub const ALIGNMENT_WEIGHT: f32 = 0.3;
pub const HEIGHT_WEIGHT: f32 = 0.4;

/// Relative tolerance for spacing and height consistency.
pub const CONSISTENCY_TOLERANCE: f32 = 0.2;
/// Pixel tolerance for left-alignment consistency and column clustering.
pub const ALIGNMENT_TOLERANCE_PX: f32 = 20.0;

/// Static signature describing one classifiable document type.
pub struct TypeSignature {
    pub doc_type: DocumentType,
    /// Lowercase keywords matched by containment against the full text.
    pub keywords: &'static [&'static str],
    /// Patterns matched against the full text.
    pub patterns: Vec<Regex>,
    /// Minimum score for metadata extraction and secondary candidacy.
    pub confidence_threshold: f32,
    /// Metadata fields extracted for this type.
    pub metadata_fields: &'static [&'static str],
}

// Hebrew keywords are written with final letters folded, matching the
// normalized text the classifier scores against.
const RECEIPT_KEYWORDS: &[&str] = &[
    "receipt",
    "total",
    "subtotal",
    "change",
    "cash",
    "visa",
    "mastercard",
    "thank you",
    "קבלה",
    "סהכ",
    "עודפ",
    "מזומנ",
];

const INVOICE_KEYWORDS: &[&str] = &[
    "invoice",
    "bill to",
    "due date",
    "payment terms",
    "invoice number",
    "purchase order",
    "net",
    "חשבונית",
    "לתשלומ עד",
];

const WARRANTY_KEYWORDS: &[&str] = &[
    "warranty",
    "guarantee",
    "serial number",
    "coverage",
    "valid until",
    "model",
    "אחריות",
];

lazy_static! {
    /// Signature table in declaration order; ties between equal scores
    /// resolve to the earlier entry.
    pub static ref SIGNATURES: Vec<TypeSignature> = vec![
        TypeSignature {
            doc_type: DocumentType::Receipt,
            keywords: RECEIPT_KEYWORDS,
            patterns: vec![
                patterns::TOTAL.clone(),
                patterns::CARD_ENDING.clone(),
                patterns::TENDER_LINE.clone(),
                patterns::DATE.clone(),
            ],
            confidence_threshold: 0.3,
            metadata_fields: &["date", "total", "payment_method"],
        },
        TypeSignature {
            doc_type: DocumentType::Invoice,
            keywords: INVOICE_KEYWORDS,
            patterns: vec![
                patterns::INVOICE_NUMBER.clone(),
                patterns::DUE_DATE.clone(),
                patterns::NET_TERMS.clone(),
                patterns::DATE.clone(),
            ],
            confidence_threshold: 0.3,
            metadata_fields: &["date", "total", "invoice_number", "due_date", "terms"],
        },
        TypeSignature {
            doc_type: DocumentType::Warranty,
            keywords: WARRANTY_KEYWORDS,
            patterns: vec![
                patterns::WARRANTY_TERM.clone(),
                patterns::SERIAL_NUMBER.clone(),
                patterns::WARRANTY_PERIOD.clone(),
                patterns::PRODUCT_MODEL.clone(),
            ],
            confidence_threshold: 0.3,
            metadata_fields: &["date", "serial_number", "warranty_period", "product_model"],
        },
    ];
}

/// Look up the signature for a classifiable type.
pub fn signature_for(doc_type: DocumentType) -> Option<&'static TypeSignature> {
    SIGNATURES.iter().find(|s| s.doc_type == doc_type)
}
