//! Regex tables for classification and field extraction.
//!
//! Documents are bilingual (English/Hebrew). Hebrew labels are matched in
//! both raw and normalized spellings: scoring runs over the router's
//! normalized text (finals folded), while field extraction reads the raw
//! block text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date primitives: 01/15/2024, 15.01.2024, 2024-01-15
    pub static ref DATE: Regex = Regex::new(
        r"\b(\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}|\d{4}[/.\-]\d{1,2}[/.\-]\d{1,2})\b"
    ).unwrap();

    // Standalone monetary amount with or without a currency symbol.
    pub static ref AMOUNT: Regex = Regex::new(
        r"[$₪€£]\s*(\d{1,6}(?:[.,]\d{2})?)|(\d{1,6}[.,]\d{2})\b"
    ).unwrap();

    // Labeled totals
    pub static ref TOTAL: Regex = Regex::new(
        r#"(?i)(?:grand\s+total|total|amount\s+due|balance\s+due|סה"?כ|לתשלו[מם])[\s:]*[$₪€£]?\s*(\d{1,6}(?:[.,]\d{2})?)"#
    ).unwrap();

    pub static ref PAYMENT_METHOD: Regex = Regex::new(
        r"(?i)\b(visa|mastercard|amex|american\s+express|isracard|cash|credit|debit|cheque|check|מזומ[נן]|אשראי)\b"
    ).unwrap();

    // Card tail lines: "VISA ending 1234", "Mastercard **** 5678"
    pub static ref CARD_ENDING: Regex = Regex::new(
        r"(?i)(?:visa|mastercard|amex|isracard|card)[^\n]*?(?:ending(?:\s+in)?|x{2,}|\*{2,})\s*\d{4}"
    ).unwrap();

    // Change/cash tender lines on receipts
    pub static ref TENDER_LINE: Regex = Regex::new(
        r"(?i)(?:change|cash|tendered|עוד[פף]|מזומ[נן])[\s:]*[$₪€£]?\s*\d{1,6}(?:[.,]\d{2})?"
    ).unwrap();

    // Invoice fields
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:invoice|חשבונית(?:\s+מס)?)\s*(?:no\.?|number|num\.?)?\s*[#:']*\s*([A-Za-z0-9][A-Za-z0-9/\-]*)"
    ).unwrap();

    pub static ref DUE_DATE: Regex = Regex::new(
        r"(?i)(?:due\s+date|payment\s+due|לתשלו[מם]\s+עד)[\s:]*(\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}|\d{4}[/.\-]\d{1,2}[/.\-]\d{1,2})"
    ).unwrap();

    pub static ref TERMS: Regex = Regex::new(
        r"(?i)(?:payment\s+)?terms[\s:]*([^\n]+)"
    ).unwrap();

    pub static ref NET_TERMS: Regex = Regex::new(
        r"(?i)\bnet\s*\d{1,3}\b"
    ).unwrap();

    // Warranty fields
    pub static ref SERIAL_NUMBER: Regex = Regex::new(
        r"(?i)(?:serial\s*(?:no\.?|number)?|s/n|מספר\s+סידורי)[\s:#]*([A-Za-z0-9][A-Za-z0-9\-]*)"
    ).unwrap();

    pub static ref WARRANTY_PERIOD: Regex = Regex::new(
        r"(?i)(?:warranty|guarantee|אחריות)\s*(?:period)?\s*(?:of)?[\s:]*(\d{1,3}\s*(?:years?|months?|days?|שני[מם]|חודשי[מם]))"
    ).unwrap();

    pub static ref WARRANTY_PERIOD_INVERTED: Regex = Regex::new(
        r"(?i)(\d{1,3}[\s\-]*(?:years?|months?|שנות|חודשי))\s*(?:limited\s+)?(?:warranty|guarantee|אחריות)"
    ).unwrap();

    pub static ref PRODUCT_MODEL: Regex = Regex::new(
        r"(?i)model\s*(?:no\.?|number)?[\s:#]*([A-Za-z0-9][A-Za-z0-9\-]*)"
    ).unwrap();

    pub static ref WARRANTY_TERM: Regex = Regex::new(
        r"(?i)\b(?:warranty|guarantee)\b|אחריות"
    ).unwrap();

    // Vendor header lines: capitalized business name, no digits, no
    // punctuation beyond the usual company characters. Hebrew has no case,
    // so a Hebrew-letter start qualifies as well.
    pub static ref VENDOR_NAME: Regex = Regex::new(
        r"^[A-Zא-ת][A-Za-zא-ת'&.,\- ]{1,40}$"
    ).unwrap();

    pub static ref WEBSITE: Regex = Regex::new(
        r"(?i)\b(?:https?://)?(?:www\.)?[a-z0-9][a-z0-9\-]*(?:\.[a-z0-9\-]+)*\.(?:com|net|org|io|co\.il|org\.il)\b"
    ).unwrap();

    // US formats plus Israeli landline/mobile formats.
    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+?972[\-\s]?|0)(?:[23489]|5\d|77)[\-\s]?\d{3}[\-\s]?\d{4}|\(?\d{3}\)?[\-.\s]\d{3}[\-.\s]\d{4}"
    ).unwrap();

    pub static ref ADDRESS: Regex = Regex::new(
        r"(?i)\d{1,5}\s+[A-Za-z][A-Za-z ]+\s+(?:st|street|ave|avenue|rd|road|blvd|boulevard|ln|lane|dr|drive)\.?\b|(?:רחוב|רח'|שד')\s+[א-ת ]+\s*\d{0,4}"
    ).unwrap();

    // OCR error markers: stray question marks and the UTF-8 replacement
    // character that mojibake decodes into.
    pub static ref OCR_ERROR_MARKER: Regex = Regex::new(
        r"[?\u{FFFD}]"
    ).unwrap();

    pub static ref CURRENCY_SYMBOL: Regex = Regex::new(
        r"[$₪€£]"
    ).unwrap();
}
