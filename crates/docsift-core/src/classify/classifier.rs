//! Document classifier: single-pass scoring over an extraction result.

use tracing::{debug, info, warn};

use super::layout;
use super::metadata;
use super::signatures::{
    self, ALIGNMENT_TOLERANCE_PX, ALIGNMENT_WEIGHT, CONSISTENCY_TOLERANCE, HEIGHT_WEIGHT,
    KEYWORD_WEIGHT, PATTERN_WEIGHT, SPACING_WEIGHT, STRUCTURE_WEIGHT, TypeSignature,
};
use super::patterns;
use super::spatial;
use super::vendor;
use crate::error::ClassificationError;
use crate::models::{
    ClassificationResult, DocumentType, ExtractionResult, TextBlock, TextQuality, TypeCandidate,
};

/// Share of the text-quality score carried by block confidence.
const QUALITY_CONFIDENCE_WEIGHT: f32 = 0.7;
/// Bonus when no block contains an OCR error marker.
const QUALITY_CLEAN_BONUS: f32 = 0.3;

/// Stateless classifier over extraction results.
#[derive(Debug, Clone, Default)]
pub struct DocumentClassifier;

impl DocumentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify one extraction result.
    ///
    /// Never errors for "nothing matched" - that degrades to
    /// `(Unknown, 0.0)` so downstream flows always get a storable result.
    /// Errors only when the input carries no text and no blocks at all.
    pub fn classify(
        &self,
        extraction: &ExtractionResult,
    ) -> Result<ClassificationResult, ClassificationError> {
        if extraction.text.trim().is_empty() && extraction.blocks.is_empty() {
            warn!(
                engine = %extraction.engine,
                "refusing to classify extraction result with no text and no blocks"
            );
            return Err(ClassificationError::MissingText);
        }

        // Scoring matches against normalized text so Hebrew keywords survive
        // final-letter folding; callers that skipped the router still get
        // the same folding here. Field extraction reads the raw text to
        // preserve original values.
        let base = extraction
            .normalized_text
            .as_deref()
            .unwrap_or(&extraction.text);
        let match_text = if crate::hebrew::detect(base) {
            crate::hebrew::normalize(base).to_lowercase()
        } else {
            base.to_lowercase()
        };

        let blocks = spatial::well_formed(&extraction.blocks);
        let structure = structure_score(&spatial::sorted_by_top(&blocks));

        let mut scores: Vec<(DocumentType, f32)> = Vec::with_capacity(signatures::SIGNATURES.len());
        for signature in signatures::SIGNATURES.iter() {
            let score = type_score(signature, &match_text, structure);
            debug!(doc_type = %signature.doc_type, score, "scored signature");
            scores.push((signature.doc_type, score));
        }

        // Strict `>` keeps the earlier-declared type on ties and leaves
        // Unknown in place when every score is zero.
        let (winner, winner_score) = scores
            .iter()
            .fold((DocumentType::Unknown, 0.0f32), |best, &(t, s)| {
                if s > best.1 { (t, s) } else { best }
            });

        let possible_types: Vec<TypeCandidate> = scores
            .iter()
            .filter(|(t, s)| {
                *t != winner
                    && signatures::signature_for(*t)
                        .is_some_and(|sig| *s >= sig.confidence_threshold)
            })
            .map(|&(doc_type, confidence)| TypeCandidate {
                doc_type,
                confidence,
            })
            .collect();

        // Metadata only when the winner clears its own threshold.
        let metadata = signatures::signature_for(winner)
            .filter(|sig| winner_score > sig.confidence_threshold)
            .map(|sig| metadata::extract_metadata(sig, &blocks, &extraction.text))
            .unwrap_or_default();

        let result = ClassificationResult {
            doc_type: winner,
            confidence: winner_score,
            vendor: vendor::extract_vendor(&blocks, &extraction.text),
            metadata,
            possible_types,
            text_quality: text_quality(extraction, &blocks),
            layout: layout::analyze_layout(&blocks),
        };

        info!(
            doc_type = %result.doc_type,
            confidence = result.confidence,
            metadata_fields = result.metadata.len(),
            "classification finished"
        );

        Ok(result)
    }
}

/// Weighted sum of keyword, pattern, and structure evidence for one type.
fn type_score(signature: &TypeSignature, match_text: &str, structure: f32) -> f32 {
    let matched_keywords = signature
        .keywords
        .iter()
        .filter(|k| match_text.contains(*k))
        .count();
    let keyword_ratio = if signature.keywords.is_empty() {
        0.0
    } else {
        matched_keywords as f32 / signature.keywords.len() as f32
    };

    let matched_patterns = signature
        .patterns
        .iter()
        .filter(|p| p.is_match(match_text))
        .count();
    let pattern_ratio = if signature.patterns.is_empty() {
        0.0
    } else {
        matched_patterns as f32 / signature.patterns.len() as f32
    };

    KEYWORD_WEIGHT * keyword_ratio + PATTERN_WEIGHT * pattern_ratio + STRUCTURE_WEIGHT * structure
}

/// Reward regular layout: consistent line spacing, left alignment, and
/// uniform block height. Each criterion contributes its fixed weight when
/// satisfied; too few blocks satisfy nothing.
fn structure_score(sorted: &[&TextBlock]) -> f32 {
    let mut score = 0.0;

    // Inter-line spacing within tolerance of the mean gap (needs 3 blocks).
    if sorted.len() >= 3 {
        let gaps: Vec<f32> = sorted
            .windows(2)
            .map(|pair| pair[1].bbox.top - pair[0].bbox.top)
            .collect();
        let mean = gaps.iter().sum::<f32>() / gaps.len() as f32;
        if mean > 0.0
            && gaps
                .iter()
                .all(|g| (g - mean).abs() <= CONSISTENCY_TOLERANCE * mean)
        {
            score += SPACING_WEIGHT;
        }
    }

    if sorted.len() >= 2 {
        // Left alignment within pixel tolerance of the mean edge.
        let mean_left = sorted.iter().map(|b| b.bbox.left).sum::<f32>() / sorted.len() as f32;
        if sorted
            .iter()
            .all(|b| (b.bbox.left - mean_left).abs() <= ALIGNMENT_TOLERANCE_PX)
        {
            score += ALIGNMENT_WEIGHT;
        }

        // Uniform block height within tolerance of the mean.
        let mean_height = sorted.iter().map(|b| b.bbox.height()).sum::<f32>() / sorted.len() as f32;
        if mean_height > 0.0
            && sorted
                .iter()
                .all(|b| (b.bbox.height() - mean_height).abs() <= CONSISTENCY_TOLERANCE * mean_height)
        {
            score += HEIGHT_WEIGHT;
        }
    }

    score
}

/// Mean block confidence scaled down, with a bonus for marker-free text.
fn text_quality(extraction: &ExtractionResult, blocks: &[&TextBlock]) -> TextQuality {
    let confidences: Vec<f32> = blocks.iter().filter_map(|b| b.confidence).collect();
    let confidence = if confidences.is_empty() {
        extraction.confidence
    } else {
        confidences.iter().sum::<f32>() / confidences.len() as f32
    };

    let has_errors = blocks
        .iter()
        .any(|b| patterns::OCR_ERROR_MARKER.is_match(&b.text));

    let score = confidence * QUALITY_CONFIDENCE_WEIGHT
        + if has_errors { 0.0 } else { QUALITY_CLEAN_BONUS };

    TextQuality {
        score: score.clamp(0.0, 1.0),
        confidence,
        has_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoundingBox, EngineKind};
    use pretty_assertions::assert_eq;

    fn uniform_blocks(lines: &[&str]) -> Vec<TextBlock> {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                TextBlock::new(*line, BoundingBox::new(i as f32 * 40.0, 10.0, i as f32 * 40.0 + 20.0, 310.0))
                    .with_confidence(0.9)
            })
            .collect()
    }

    fn extraction(text: &str, blocks: Vec<TextBlock>) -> ExtractionResult {
        ExtractionResult {
            text: text.to_string(),
            confidence: 0.9,
            blocks,
            normalized_text: None,
            languages: vec!["en".to_string()],
            engine: EngineKind::Local,
            processing_time_ms: 12,
        }
    }

    #[test]
    fn receipt_scenario() {
        let lines = ["TOTAL: $42.99", "01/15/2024", "VISA ending 1234"];
        let input = extraction(&lines.join("\n"), uniform_blocks(&lines));

        let result = DocumentClassifier::new().classify(&input).unwrap();
        assert_eq!(result.doc_type, DocumentType::Receipt);
        assert!(result.confidence > 0.3);
        assert_eq!(result.metadata.get("total").map(String::as_str), Some("42.99"));
        assert_eq!(result.metadata.get("date").map(String::as_str), Some("01/15/2024"));
    }

    #[test]
    fn invoice_scenario() {
        let lines = ["INVOICE #12345", "Due Date: 02/01/2024", "Payment Terms: Net 30"];
        let input = extraction(&lines.join("\n"), uniform_blocks(&lines));

        let result = DocumentClassifier::new().classify(&input).unwrap();
        assert_eq!(result.doc_type, DocumentType::Invoice);
        assert_eq!(
            result.metadata.get("invoice_number").map(String::as_str),
            Some("12345")
        );
    }

    #[test]
    fn garbage_degrades_to_unknown_without_error() {
        let input = extraction("lorem ipsum dolor sit amet", Vec::new());

        let result = DocumentClassifier::new().classify(&input).unwrap();
        assert_eq!(result.doc_type, DocumentType::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.metadata.is_empty());
        assert!(result.possible_types.is_empty());
    }

    #[test]
    fn empty_input_is_an_error() {
        let input = extraction("   ", Vec::new());
        let err = DocumentClassifier::new().classify(&input).unwrap_err();
        assert!(matches!(err, ClassificationError::MissingText));
    }

    #[test]
    fn empty_blocks_with_text_is_valid() {
        let input = extraction("TOTAL: $42.99\n01/15/2024\nVISA ending 1234", Vec::new());

        let result = DocumentClassifier::new().classify(&input).unwrap();
        assert_eq!(result.doc_type, DocumentType::Receipt);
        assert!(result.layout.columns.is_empty());
        assert_eq!(result.layout.orientation.confidence, 0.0);
    }

    #[test]
    fn possible_types_exclude_winner_and_subthreshold() {
        // Text carrying strong receipt and invoice evidence at once.
        let lines = [
            "INVOICE #55",
            "Due Date: 02/01/2024",
            "Payment Terms: Net 30",
            "TOTAL: $99.00",
            "Paid by visa, change 0.00, cash receipt",
        ];
        let input = extraction(&lines.join("\n"), uniform_blocks(&lines));

        let result = DocumentClassifier::new().classify(&input).unwrap();
        for candidate in &result.possible_types {
            assert_ne!(candidate.doc_type, result.doc_type);
            let threshold = signatures::signature_for(candidate.doc_type)
                .unwrap()
                .confidence_threshold;
            assert!(candidate.confidence >= threshold);
        }
        assert!(!result.possible_types.is_empty());
    }

    #[test]
    fn score_monotonic_in_keyword_matches() {
        let signature = signatures::signature_for(DocumentType::Receipt).unwrap();
        let one = type_score(signature, "receipt", 0.5);
        let two = type_score(signature, "receipt total", 0.5);
        let three = type_score(signature, "receipt total cash", 0.5);
        assert!(two > one);
        assert!(three > two);
    }

    #[test]
    fn score_monotonic_in_pattern_matches() {
        // "amount due" and "tendered" hit receipt patterns without touching
        // any receipt keyword, isolating the pattern term.
        let signature = signatures::signature_for(DocumentType::Receipt).unwrap();
        let none = type_score(signature, "x", 0.5);
        let one = type_score(signature, "x amount due 5.00", 0.5);
        let two = type_score(signature, "x amount due 5.00 tendered 3.00", 0.5);
        assert!(one > none);
        assert!(two > one);
    }

    #[test]
    fn malformed_blocks_are_ignored_for_structure() {
        let mut blocks = uniform_blocks(&["TOTAL: $5.00", "01/15/2024", "CASH 5.00"]);
        // Inverted geometry must be filtered, not trusted.
        blocks.push(TextBlock::new(
            "ghost",
            BoundingBox::new(100.0, 50.0, 20.0, 10.0),
        ));
        let input = extraction("TOTAL: $5.00\n01/15/2024\nCASH 5.00", blocks);

        let result = DocumentClassifier::new().classify(&input).unwrap();
        assert_eq!(result.doc_type, DocumentType::Receipt);
    }

    #[test]
    fn text_quality_rewards_clean_blocks() {
        let lines = ["TOTAL: $42.99", "01/15/2024", "VISA ending 1234"];
        let input = extraction(&lines.join("\n"), uniform_blocks(&lines));
        let result = DocumentClassifier::new().classify(&input).unwrap();

        assert!(!result.text_quality.has_errors);
        assert!((result.text_quality.confidence - 0.9).abs() < 1e-5);
        assert!((result.text_quality.score - (0.9 * 0.7 + 0.3)).abs() < 1e-5);
    }

    #[test]
    fn text_quality_flags_error_markers() {
        let mut blocks = uniform_blocks(&["TOTAL: $4?.99", "01/15/2024", "CASH 5.00"]);
        blocks[0].confidence = Some(0.4);
        let input = extraction("TOTAL: $4?.99\n01/15/2024\nCASH 5.00", blocks);

        let result = DocumentClassifier::new().classify(&input).unwrap();
        assert!(result.text_quality.has_errors);
        assert!(result.text_quality.score < 0.7);
    }

    #[test]
    fn classification_is_pure() {
        let lines = ["TOTAL: $42.99", "01/15/2024", "VISA ending 1234"];
        let input = extraction(&lines.join("\n"), uniform_blocks(&lines));
        let classifier = DocumentClassifier::new();

        let first = classifier.classify(&input).unwrap();
        let second = classifier.classify(&input).unwrap();
        assert_eq!(first.metadata, second.metadata);
        assert_eq!(first.doc_type, second.doc_type);
        assert_eq!(first.confidence, second.confidence);
    }

    #[test]
    fn uniform_layout_scores_full_structure() {
        let blocks = uniform_blocks(&["a", "b", "c"]);
        let refs: Vec<&TextBlock> = blocks.iter().collect();
        let score = structure_score(&spatial::sorted_by_top(&refs));
        assert!((score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn sparse_layout_scores_zero_structure() {
        let blocks = vec![TextBlock::new(
            "only",
            BoundingBox::new(0.0, 0.0, 20.0, 100.0),
        )];
        let refs: Vec<&TextBlock> = blocks.iter().collect();
        assert_eq!(structure_score(&spatial::sorted_by_top(&refs)), 0.0);
    }
}
