//! Layout analysis: column detection, orientation, and section grouping.

use super::patterns;
use super::signatures::ALIGNMENT_TOLERANCE_PX;
use super::spatial;
use crate::models::{LayoutAnalysis, Orientation, Section, TextBlock};

/// Maximum character length for a header-shaped block.
const HEADER_MAX_LEN: usize = 30;

/// Analyze the spatial layout of the blocks.
pub fn analyze_layout(blocks: &[&TextBlock]) -> LayoutAnalysis {
    let sorted = spatial::sorted_by_top(blocks);
    LayoutAnalysis {
        columns: detect_columns(&sorted),
        orientation: detect_orientation(&sorted),
        sections: detect_sections(&sorted),
    }
}

/// Cluster left edges within the alignment tolerance and report centroids.
fn detect_columns(blocks: &[&TextBlock]) -> Vec<f32> {
    let mut lefts: Vec<f32> = blocks.iter().map(|b| b.bbox.left).collect();
    lefts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut columns = Vec::new();
    let mut cluster: Vec<f32> = Vec::new();

    for left in lefts {
        match cluster.last() {
            Some(_) => {
                let centroid = cluster.iter().sum::<f32>() / cluster.len() as f32;
                if (left - centroid).abs() <= ALIGNMENT_TOLERANCE_PX {
                    cluster.push(left);
                } else {
                    columns.push(centroid);
                    cluster = vec![left];
                }
            }
            None => cluster.push(left),
        }
    }
    if !cluster.is_empty() {
        columns.push(cluster.iter().sum::<f32>() / cluster.len() as f32);
    }

    columns
}

/// Infer page orientation from the share of taller-than-wide blocks.
///
/// An empty block list reports angle 0 with zero confidence; nothing here
/// divides by the block count without that guard.
fn detect_orientation(blocks: &[&TextBlock]) -> Orientation {
    if blocks.is_empty() {
        return Orientation::default();
    }

    let total = blocks.len() as i64;
    let vertical = blocks.iter().filter(|b| b.bbox.is_vertical()).count() as i64;

    let angle = if vertical * 2 > total { 90 } else { 0 };
    let confidence = (total - 2 * vertical).abs() as f32 / total as f32;

    Orientation { angle, confidence }
}

/// A header-shaped block: short, all-caps (Hebrew counts, having no case),
/// no currency symbol, and not starting with a digit.
fn is_header(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() > HEADER_MAX_LEN {
        return false;
    }
    if trimmed.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }
    if patterns::CURRENCY_SYMBOL.is_match(trimmed) {
        return false;
    }
    if !trimmed.chars().any(char::is_alphabetic) {
        return false;
    }
    trimmed == trimmed.to_uppercase()
}

/// Walk blocks top to bottom, opening a section at each header.
///
/// Blocks above the first header belong to no section.
fn detect_sections(blocks: &[&TextBlock]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        if is_header(&block.text) {
            sections.push(Section {
                title: block.text.trim().to_string(),
                start_index: index,
                blocks: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.blocks.push((*block).clone());
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingBox;

    fn block(text: &str, top: f32, left: f32) -> TextBlock {
        TextBlock::new(text, BoundingBox::new(top, left, top + 20.0, left + 100.0))
    }

    fn tall_block(text: &str, top: f32) -> TextBlock {
        TextBlock::new(text, BoundingBox::new(top, 0.0, top + 100.0, 20.0))
    }

    #[test]
    fn clusters_left_edges_into_columns() {
        let blocks = vec![
            block("a", 0.0, 10.0),
            block("b", 30.0, 14.0),
            block("c", 60.0, 200.0),
            block("d", 90.0, 205.0),
        ];
        let refs: Vec<&TextBlock> = blocks.iter().collect();

        let columns = detect_columns(&spatial::sorted_by_top(&refs));
        assert_eq!(columns.len(), 2);
        assert!((columns[0] - 12.0).abs() < 1e-3);
        assert!((columns[1] - 202.5).abs() < 1e-3);
    }

    #[test]
    fn empty_blocks_yield_empty_layout() {
        let layout = analyze_layout(&[]);
        assert!(layout.columns.is_empty());
        assert_eq!(layout.orientation.angle, 0);
        assert_eq!(layout.orientation.confidence, 0.0);
        assert!(layout.sections.is_empty());
    }

    #[test]
    fn vertical_majority_means_rotated() {
        let blocks = vec![
            tall_block("a", 0.0),
            tall_block("b", 120.0),
            block("c", 240.0, 0.0),
        ];
        let refs: Vec<&TextBlock> = blocks.iter().collect();

        let orientation = detect_orientation(&refs);
        assert_eq!(orientation.angle, 90);
        assert!((orientation.confidence - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn horizontal_blocks_mean_upright() {
        let blocks = vec![block("a", 0.0, 0.0), block("b", 30.0, 0.0)];
        let refs: Vec<&TextBlock> = blocks.iter().collect();

        let orientation = detect_orientation(&refs);
        assert_eq!(orientation.angle, 0);
        assert_eq!(orientation.confidence, 1.0);
    }

    #[test]
    fn headers_open_sections() {
        let blocks = vec![
            block("GROCERIES", 0.0, 0.0),
            block("Milk 4.50", 30.0, 0.0),
            block("Bread 3.20", 60.0, 0.0),
            block("HOUSEHOLD", 90.0, 0.0),
            block("Soap 6.10", 120.0, 0.0),
        ];
        let refs: Vec<&TextBlock> = blocks.iter().collect();

        let sections = detect_sections(&spatial::sorted_by_top(&refs));
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "GROCERIES");
        assert_eq!(sections[0].start_index, 0);
        assert_eq!(sections[0].blocks.len(), 2);
        assert_eq!(sections[1].title, "HOUSEHOLD");
        assert_eq!(sections[1].start_index, 3);
        assert_eq!(sections[1].blocks.len(), 1);
    }

    #[test]
    fn price_and_numeric_lines_are_not_headers() {
        assert!(is_header("PAYMENT"));
        assert!(is_header("סהכ ביניים"));
        assert!(!is_header("TOTAL: $42.99"));
        assert!(!is_header("123 MAIN ST"));
        assert!(!is_header("Groceries"));
        assert!(!is_header("A VERY LONG HEADER LINE THAT KEEPS GOING ON"));
        assert!(!is_header("----"));
    }
}
