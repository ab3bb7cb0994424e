//! Hebrew text detection and normalization.
//!
//! Receipts photographed in Israel routinely mix Hebrew and English. OCR
//! output for the Hebrew parts carries niqqud and final-letter forms that
//! break keyword and pattern matching downstream, so the router normalizes
//! the text before classification.

/// True iff the text contains at least one Hebrew code point.
///
/// Covers the Hebrew block (U+0590-U+05FF) and the alphabetic presentation
/// forms used for Hebrew ligatures (U+FB1D-U+FB4F).
pub fn detect(text: &str) -> bool {
    text.chars().any(is_hebrew)
}

fn is_hebrew(c: char) -> bool {
    matches!(c, '\u{0590}'..='\u{05FF}' | '\u{FB1D}'..='\u{FB4F}')
}

/// Niqqud and cantillation marks (U+0591-U+05C7).
fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{0591}'..='\u{05C7}')
}

/// Map the five final letter forms to their medial equivalents.
fn fold_final(c: char) -> char {
    match c {
        'ך' => 'כ',
        'ם' => 'מ',
        'ן' => 'נ',
        'ף' => 'פ',
        'ץ' => 'צ',
        other => other,
    }
}

/// Normalize Hebrew text for matching.
///
/// Strips diacritics, folds final letters, and collapses whitespace runs to
/// a single space with the ends trimmed. Idempotent: the three transforms
/// operate on disjoint character sets and whitespace collapse is stable.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !is_diacritic(*c))
        .map(fold_final)
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_hebrew_word() {
        assert!(detect("קבלה"));
        assert!(detect("total: 42 ₪ סהכ"));
    }

    #[test]
    fn detect_ignores_latin_only() {
        assert!(!detect("TOTAL: $42.99"));
        assert!(!detect(""));
    }

    #[test]
    fn detect_presentation_forms() {
        // U+FB4B is vav with holam from the presentation block.
        assert!(detect("\u{FB4B}"));
    }

    #[test]
    fn strips_niqqud() {
        // שָׁלוֹם with vowel points reduces to the bare consonants.
        assert_eq!(normalize("שָׁלוֹם"), "שלומ");
    }

    #[test]
    fn folds_every_final_letter() {
        for (final_form, medial) in [('ך', 'כ'), ('ם', 'מ'), ('ן', 'נ'), ('ף', 'פ'), ('ץ', 'צ')] {
            let normalized = normalize(&final_form.to_string());
            assert_eq!(normalized, medial.to_string());
            // Folding never reintroduces a final form.
            assert!(!normalized.contains(final_form));
        }
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  קבלה \t מס  \n 123  "), "קבלה מס 123");
    }

    #[test]
    fn idempotent() {
        let samples = ["שָׁלוֹם עוֹלָם", "סך הכל: 42.00 ₪", "  חשבונית   מס  ", "כיסופים"];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn leaves_latin_untouched() {
        assert_eq!(normalize("TOTAL: $42.99"), "TOTAL: $42.99");
    }
}
