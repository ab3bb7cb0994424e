//! Vendor extraction from document headers and contact lines.

use tracing::debug;

use super::{patterns, spatial};
use crate::models::{TextBlock, VendorInfo};

/// Confidence contribution of a header-shaped vendor name.
const NAME_WEIGHT: f32 = 0.4;
/// Confidence contribution of each matched contact field.
const CONTACT_WEIGHT: f32 = 0.2;
/// Full-text fallback matches count at half weight.
const FALLBACK_FACTOR: f32 = 0.5;

/// Extract vendor details from the blocks, falling back to the full text.
///
/// Blocks are scanned top to bottom: the first header-shaped line becomes
/// the vendor name and each block is probed for website/phone/address. The
/// scan stops early once a name plus at least one contact field is known;
/// fields still missing afterwards are searched in the full text at half
/// confidence weight.
pub fn extract_vendor(blocks: &[&TextBlock], full_text: &str) -> VendorInfo {
    let mut vendor = VendorInfo::default();

    for block in spatial::sorted_by_top(blocks) {
        let line = block.text.trim();

        if vendor.name.is_none() && patterns::VENDOR_NAME.is_match(line) {
            vendor.name = Some(line.to_string());
            vendor.confidence += NAME_WEIGHT;
        }

        if vendor.website.is_none() {
            if let Some(m) = patterns::WEBSITE.find(line) {
                vendor.website = Some(m.as_str().to_string());
                vendor.confidence += CONTACT_WEIGHT;
            }
        }
        if vendor.phone.is_none() {
            if let Some(m) = patterns::PHONE.find(line) {
                vendor.phone = Some(m.as_str().to_string());
                vendor.confidence += CONTACT_WEIGHT;
            }
        }
        if vendor.address.is_none() {
            if let Some(m) = patterns::ADDRESS.find(line) {
                vendor.address = Some(m.as_str().to_string());
                vendor.confidence += CONTACT_WEIGHT;
            }
        }

        let has_contact =
            vendor.website.is_some() || vendor.phone.is_some() || vendor.address.is_some();
        if vendor.name.is_some() && has_contact {
            break;
        }
    }

    // Whatever the block scan missed gets one pass over the full text at
    // half weight.
    if vendor.website.is_none() {
        if let Some(m) = patterns::WEBSITE.find(full_text) {
            vendor.website = Some(m.as_str().to_string());
            vendor.confidence += CONTACT_WEIGHT * FALLBACK_FACTOR;
        }
    }
    if vendor.phone.is_none() {
        if let Some(m) = patterns::PHONE.find(full_text) {
            vendor.phone = Some(m.as_str().to_string());
            vendor.confidence += CONTACT_WEIGHT * FALLBACK_FACTOR;
        }
    }
    if vendor.address.is_none() {
        if let Some(m) = patterns::ADDRESS.find(full_text) {
            vendor.address = Some(m.as_str().to_string());
            vendor.confidence += CONTACT_WEIGHT * FALLBACK_FACTOR;
        }
    }
    if vendor.name.is_none() {
        if let Some(line) = full_text
            .lines()
            .map(str::trim)
            .find(|l| patterns::VENDOR_NAME.is_match(l))
        {
            vendor.name = Some(line.to_string());
            vendor.confidence += NAME_WEIGHT * FALLBACK_FACTOR;
        }
    }

    debug!(
        name = vendor.name.as_deref(),
        confidence = vendor.confidence,
        "vendor extraction finished"
    );

    vendor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingBox;

    fn block(text: &str, top: f32) -> TextBlock {
        TextBlock::new(text, BoundingBox::new(top, 0.0, top + 20.0, 300.0))
    }

    #[test]
    fn header_name_and_contact_from_blocks() {
        let blocks = vec![
            block("Super-Pharm Ltd.", 0.0),
            block("www.super-pharm.co.il", 30.0),
            block("TOTAL: $42.99", 200.0),
        ];
        let refs: Vec<&TextBlock> = blocks.iter().collect();
        let text = "Super-Pharm Ltd.\nwww.super-pharm.co.il\nTOTAL: $42.99";

        let vendor = extract_vendor(&refs, text);
        assert_eq!(vendor.name.as_deref(), Some("Super-Pharm Ltd."));
        assert_eq!(vendor.website.as_deref(), Some("www.super-pharm.co.il"));
        assert!((vendor.confidence - 0.6).abs() < 1e-5);
    }

    #[test]
    fn stops_before_lower_blocks_once_satisfied() {
        let blocks = vec![
            block("Mega Sport", 0.0),
            block("03-624-9955", 30.0),
            // A second phone further down must not override the first.
            block("09-999-9999", 300.0),
        ];
        let refs: Vec<&TextBlock> = blocks.iter().collect();

        let vendor = extract_vendor(&refs, "Mega Sport\n03-624-9955\n09-999-9999");
        assert_eq!(vendor.phone.as_deref(), Some("03-624-9955"));
    }

    #[test]
    fn full_text_fallback_at_half_weight() {
        // Phone hides in a block with an invalid box equivalent: pass no
        // blocks at all, so everything comes from the fallback scan.
        let vendor = extract_vendor(&[], "Mega Sport\n03-624-9955");
        assert_eq!(vendor.name.as_deref(), Some("Mega Sport"));
        assert_eq!(vendor.phone.as_deref(), Some("03-624-9955"));
        assert!((vendor.confidence - (0.4 * 0.5 + 0.2 * 0.5)).abs() < 1e-5);
    }

    #[test]
    fn no_vendor_yields_zero_confidence() {
        let vendor = extract_vendor(&[], "12345\n$9.99");
        assert!(vendor.name.is_none());
        assert_eq!(vendor.confidence, 0.0);
    }
}
