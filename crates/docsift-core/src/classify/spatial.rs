//! Spatial queries over text blocks.
//!
//! Vendor extraction, metadata extraction, and section detection all reason
//! about where a block sits on the page; the threshold logic lives here once.

use crate::models::TextBlock;

/// Vertical page regions, as thirds of the block extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalRegion {
    Top,
    Middle,
    Bottom,
}

/// Drop blocks with malformed bounding boxes. Engines occasionally emit
/// inverted geometry; it is filtered rather than trusted.
pub fn well_formed(blocks: &[TextBlock]) -> Vec<&TextBlock> {
    blocks.iter().filter(|b| b.bbox.is_valid()).collect()
}

/// Blocks sorted by vertical position, top of page first.
pub fn sorted_by_top<'a>(blocks: &[&'a TextBlock]) -> Vec<&'a TextBlock> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by(|a, b| {
        a.bbox
            .top
            .partial_cmp(&b.bbox.top)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted
}

/// Vertical extent (min top, max bottom) of a block set.
pub fn vertical_extent(blocks: &[&TextBlock]) -> Option<(f32, f32)> {
    let top = blocks
        .iter()
        .map(|b| b.bbox.top)
        .fold(f32::INFINITY, f32::min);
    let bottom = blocks
        .iter()
        .map(|b| b.bbox.bottom)
        .fold(f32::NEG_INFINITY, f32::max);

    if blocks.is_empty() { None } else { Some((top, bottom)) }
}

/// Blocks whose vertical center falls in the given third of the extent.
pub fn in_region<'a>(blocks: &[&'a TextBlock], region: VerticalRegion) -> Vec<&'a TextBlock> {
    let Some((top, bottom)) = vertical_extent(blocks) else {
        return Vec::new();
    };
    let span = bottom - top;
    if span <= 0.0 {
        // Degenerate extent: every block is everywhere.
        return blocks.to_vec();
    }

    let (lo, hi) = match region {
        VerticalRegion::Top => (0.0, 1.0 / 3.0),
        VerticalRegion::Middle => (1.0 / 3.0, 2.0 / 3.0),
        VerticalRegion::Bottom => (2.0 / 3.0, 1.0),
    };

    blocks
        .iter()
        .filter(|b| {
            let fraction = (b.bbox.vertical_center() - top) / span;
            fraction >= lo && fraction <= hi
        })
        .copied()
        .collect()
}
