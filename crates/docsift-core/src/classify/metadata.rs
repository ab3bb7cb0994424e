//! Type-specific metadata field extraction.
//!
//! Each field has a regex and, for date-like fields and totals, a preferred
//! vertical region: dates cluster at the top of receipts, totals at the
//! bottom. A field that finds nothing in its preferred blocks falls back to
//! the full text, so block geometry only ever improves precision.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::signatures::TypeSignature;
use super::spatial::{self, VerticalRegion};
use super::patterns;
use crate::models::TextBlock;

/// Extract every metadata field the signature declares.
///
/// Pure over its inputs: the same text and blocks always produce the same
/// map.
pub fn extract_metadata(
    signature: &TypeSignature,
    blocks: &[&TextBlock],
    full_text: &str,
) -> BTreeMap<String, String> {
    let sorted = spatial::sorted_by_top(blocks);
    let mut metadata = BTreeMap::new();

    for field in signature.metadata_fields {
        if let Some(value) = extract_field(field, &sorted, full_text) {
            metadata.insert((*field).to_string(), value);
        }
    }

    debug!(
        doc_type = %signature.doc_type,
        fields = metadata.len(),
        "metadata extraction finished"
    );

    metadata
}

fn extract_field(field: &str, blocks: &[&TextBlock], full_text: &str) -> Option<String> {
    match field {
        "date" => extract_date(blocks, full_text),
        "due_date" => in_region_then_full(blocks, full_text, Some(VerticalRegion::Top), |text| {
            patterns::DUE_DATE
                .captures(text)
                .map(|c| c[1].to_string())
                .filter(|d| is_plausible_date(d))
        }),
        "total" => extract_total(blocks, full_text),
        "payment_method" => in_region_then_full(blocks, full_text, None, |text| {
            patterns::PAYMENT_METHOD.captures(text).map(|c| c[1].to_string())
        }),
        "invoice_number" => in_region_then_full(blocks, full_text, None, |text| {
            patterns::INVOICE_NUMBER.captures(text).map(|c| c[1].to_string())
        }),
        "terms" => in_region_then_full(blocks, full_text, None, |text| {
            patterns::TERMS.captures(text).map(|c| c[1].trim().to_string())
        }),
        "serial_number" => in_region_then_full(blocks, full_text, None, |text| {
            patterns::SERIAL_NUMBER.captures(text).map(|c| c[1].to_string())
        }),
        "warranty_period" => in_region_then_full(blocks, full_text, None, |text| {
            patterns::WARRANTY_PERIOD
                .captures(text)
                .or_else(|| patterns::WARRANTY_PERIOD_INVERTED.captures(text))
                .map(|c| c[1].to_string())
        }),
        "product_model" => in_region_then_full(blocks, full_text, None, |text| {
            patterns::PRODUCT_MODEL.captures(text).map(|c| c[1].to_string())
        }),
        other => {
            debug!(field = other, "no extractor for metadata field");
            None
        }
    }
}

/// Run an extractor over the preferred region's blocks, then over the full
/// text when no qualifying block matched.
fn in_region_then_full<F>(
    blocks: &[&TextBlock],
    full_text: &str,
    region: Option<VerticalRegion>,
    extract: F,
) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let candidates = match region {
        Some(region) => spatial::in_region(blocks, region),
        None => blocks.to_vec(),
    };

    candidates
        .iter()
        .find_map(|b| extract(&b.text))
        .or_else(|| extract(full_text))
}

fn extract_date(blocks: &[&TextBlock], full_text: &str) -> Option<String> {
    in_region_then_full(blocks, full_text, Some(VerticalRegion::Top), |text| {
        patterns::DATE
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .find(|d| is_plausible_date(d))
    })
}

fn extract_total(blocks: &[&TextBlock], full_text: &str) -> Option<String> {
    let labeled = in_region_then_full(blocks, full_text, Some(VerticalRegion::Bottom), |text| {
        patterns::TOTAL
            .captures(text)
            .map(|c| c[1].to_string())
            .filter(|v| parse_amount(v).is_some())
    });
    if labeled.is_some() {
        return labeled;
    }

    // No labeled total anywhere: fall back to the largest standalone amount.
    patterns::AMOUNT
        .captures_iter(full_text)
        .filter_map(|c| {
            let raw = c.get(1).or_else(|| c.get(2))?.as_str();
            parse_amount(raw).map(|value| (value, raw.to_string()))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, raw)| raw)
}

/// Parse an amount the way it appears on paper ("1,234.56", "42,99").
fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = if raw.contains('.') {
        raw.replace(',', "")
    } else {
        raw.replace(',', ".")
    };
    cleaned.parse().ok()
}

/// A date candidate is kept only if it parses in some supported layout.
fn is_plausible_date(raw: &str) -> bool {
    let unified = raw.replace(['.', '-'], "/");
    const FORMATS: [&str; 5] = ["%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m/%d/%y", "%d/%m/%y"];
    FORMATS
        .iter()
        .any(|f| NaiveDate::parse_from_str(&unified, f).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoundingBox, DocumentType};
    use crate::classify::signatures::signature_for;

    fn block(text: &str, top: f32) -> TextBlock {
        TextBlock::new(text, BoundingBox::new(top, 0.0, top + 20.0, 300.0))
    }

    #[test]
    fn receipt_fields_from_flat_text() {
        let signature = signature_for(DocumentType::Receipt).unwrap();
        let text = "TOTAL: $42.99\n01/15/2024\nVISA ending 1234";
        let metadata = extract_metadata(signature, &[], text);

        assert_eq!(metadata.get("total").map(String::as_str), Some("42.99"));
        assert_eq!(metadata.get("date").map(String::as_str), Some("01/15/2024"));
        assert_eq!(metadata.get("payment_method").map(String::as_str), Some("VISA"));
    }

    #[test]
    fn invoice_fields_from_flat_text() {
        let signature = signature_for(DocumentType::Invoice).unwrap();
        let text = "INVOICE #12345\nDue Date: 02/01/2024\nPayment Terms: Net 30";
        let metadata = extract_metadata(signature, &[], text);

        assert_eq!(metadata.get("invoice_number").map(String::as_str), Some("12345"));
        assert_eq!(metadata.get("due_date").map(String::as_str), Some("02/01/2024"));
        assert_eq!(metadata.get("terms").map(String::as_str), Some("Net 30"));
    }

    #[test]
    fn warranty_fields() {
        let signature = signature_for(DocumentType::Warranty).unwrap();
        let text = "WARRANTY CERTIFICATE\nModel: KX-450\nSerial Number: SN-998877\n2 year limited warranty\n03/10/2024";
        let metadata = extract_metadata(signature, &[], text);

        assert_eq!(metadata.get("product_model").map(String::as_str), Some("KX-450"));
        assert_eq!(metadata.get("serial_number").map(String::as_str), Some("SN-998877"));
        assert_eq!(metadata.get("warranty_period").map(String::as_str), Some("2 year"));
    }

    #[test]
    fn total_prefers_bottom_blocks() {
        let signature = signature_for(DocumentType::Receipt).unwrap();
        // Two labeled totals; the one in the bottom third wins.
        let blocks = vec![
            block("Subtotal: 10.00", 0.0),
            block("filler", 150.0),
            block("TOTAL: 12.50", 280.0),
        ];
        let refs: Vec<&TextBlock> = blocks.iter().collect();
        let text = "Subtotal: 10.00\nfiller\nTOTAL: 12.50";

        let metadata = extract_metadata(signature, &refs, text);
        assert_eq!(metadata.get("total").map(String::as_str), Some("12.50"));
    }

    #[test]
    fn total_falls_back_to_largest_amount() {
        let signature = signature_for(DocumentType::Receipt).unwrap();
        let text = "Milk 4.50\nBread 12.90\nEggs 8.20";
        let metadata = extract_metadata(signature, &[], text);
        assert_eq!(metadata.get("total").map(String::as_str), Some("12.90"));
    }

    #[test]
    fn implausible_dates_rejected() {
        assert!(is_plausible_date("01/15/2024"));
        assert!(is_plausible_date("15.01.2024"));
        assert!(is_plausible_date("2024-01-15"));
        assert!(!is_plausible_date("99/99/9999"));
    }

    #[test]
    fn extraction_is_deterministic() {
        let signature = signature_for(DocumentType::Receipt).unwrap();
        let text = "TOTAL: $42.99\n01/15/2024\nVISA ending 1234";
        let first = extract_metadata(signature, &[], text);
        let second = extract_metadata(signature, &[], text);
        assert_eq!(first, second);
    }
}
