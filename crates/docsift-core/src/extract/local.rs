//! Local Tesseract text-extraction adapter.
//!
//! Drives the system `tesseract` binary with TSV output, which carries
//! per-word boxes and confidences. Words are reassembled into line-level
//! blocks so the classifier sees the same shape of data the cloud adapter
//! produces.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, warn};

use super::TextExtractor;
use crate::error::ExtractionError;
use crate::hebrew;
use crate::models::{
    BoundingBox, EngineKind, ExtractionOptions, ExtractionResult, LocalConfig, TextBlock,
};

/// Adapter for the local Tesseract engine.
pub struct TesseractExtractor {
    config: LocalConfig,
    started: AtomicBool,
}

impl TesseractExtractor {
    pub fn new(config: &LocalConfig) -> Self {
        Self {
            config: config.clone(),
            started: AtomicBool::new(false),
        }
    }

    /// Combined language specifier, primary language first ("eng+heb").
    fn language_spec(&self, options: &ExtractionOptions) -> String {
        let primary = tesseract_lang(&options.language);
        if options.enable_hebrew && primary != "heb" {
            format!("{primary}+heb")
        } else {
            primary.to_string()
        }
    }

    fn probe(&self) -> Result<(), ExtractionError> {
        which::which(&self.config.binary).map_err(|_| {
            ExtractionError::EngineUnavailable(format!(
                "{} not found (install tesseract-ocr)",
                self.config.binary.display()
            ))
        })?;
        Ok(())
    }

    fn ensure_started(&self) -> Result<(), ExtractionError> {
        if self.started.load(Ordering::Acquire) {
            return Ok(());
        }
        self.probe()?;
        self.started.store(true, Ordering::Release);
        Ok(())
    }
}

/// Map short codes to Tesseract language data names.
fn tesseract_lang(language: &str) -> &str {
    match language {
        "en" => "eng",
        "he" => "heb",
        other => other,
    }
}

#[async_trait::async_trait]
impl TextExtractor for TesseractExtractor {
    fn engine(&self) -> EngineKind {
        EngineKind::Local
    }

    /// Probe the binary once; repeated calls are no-ops.
    async fn start(&self) -> Result<(), ExtractionError> {
        self.ensure_started()
    }

    /// Clear the cached probe. Safe to call repeatedly.
    async fn stop(&self) -> Result<(), ExtractionError> {
        self.started.store(false, Ordering::Release);
        Ok(())
    }

    async fn extract(
        &self,
        image: &[u8],
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult, ExtractionError> {
        self.ensure_started()?;
        let start = Instant::now();

        // Tesseract reads from disk; stage the buffer in a temp file.
        let mut staged = tempfile::NamedTempFile::new()?;
        staged.write_all(image)?;
        staged.flush()?;

        let languages = self.language_spec(options);
        let mut command = Command::new(&self.config.binary);
        command
            .arg(staged.path())
            .arg("stdout")
            .args(["-l", &languages])
            .args(["--psm", &self.config.page_seg_mode.to_string()]);
        if self.config.preserve_interword_spaces {
            command.args(["-c", "preserve_interword_spaces=1"]);
        }
        command.arg("tsv");

        let output = match command.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ExtractionError::EngineUnavailable(format!(
                    "{} not found (install tesseract-ocr)",
                    self.config.binary.display()
                )));
            }
            Err(e) => return Err(ExtractionError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Engine(format!(
                "tesseract failed: {}",
                stderr.trim()
            )));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let mut result = parse_tsv(&tsv);
        result.languages = detect_languages(&result.text, &languages);
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            blocks = result.blocks.len(),
            confidence = result.confidence,
            languages = %languages,
            "local extraction complete"
        );

        Ok(result)
    }
}

/// Languages actually present in the output, from the requested set.
fn detect_languages(text: &str, requested: &str) -> Vec<String> {
    requested
        .split('+')
        .filter(|lang| match *lang {
            "heb" => hebrew::detect(text),
            _ => text.chars().any(|c| c.is_ascii_alphabetic()),
        })
        .map(str::to_string)
        .collect()
}

/// One word row from the TSV output.
struct TsvWord {
    block: u32,
    paragraph: u32,
    line: u32,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    conf: f32,
    text: String,
}

fn parse_word(line: &str) -> Option<TsvWord> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 12 {
        return None;
    }
    // Word rows are level 5; structural rows carry no text.
    if fields[0] != "5" {
        return None;
    }

    let text = fields[11].trim();
    if text.is_empty() {
        return None;
    }

    Some(TsvWord {
        block: fields[2].parse().ok()?,
        paragraph: fields[3].parse().ok()?,
        line: fields[4].parse().ok()?,
        left: fields[6].parse().ok()?,
        top: fields[7].parse().ok()?,
        width: fields[8].parse().ok()?,
        height: fields[9].parse().ok()?,
        conf: fields[10].parse().ok()?,
        text: text.to_string(),
    })
}

/// Reassemble word rows into line-level blocks.
///
/// Words with the engine's confidence sentinel (-1) are kept in the text but
/// excluded from the confidence aggregate. A wide horizontal gap between
/// neighboring words becomes a double space so column separation survives
/// into the full text.
fn parse_tsv(tsv: &str) -> ExtractionResult {
    let words: Vec<TsvWord> = tsv.lines().filter_map(parse_word).collect();

    let mut blocks: Vec<TextBlock> = Vec::new();
    let mut conf_sum = 0.0f32;
    let mut conf_count = 0u32;

    let mut current_key: Option<(u32, u32, u32)> = None;
    let mut line_text = String::new();
    let mut line_bbox = BoundingBox::default();
    let mut line_conf_sum = 0.0f32;
    let mut line_conf_count = 0u32;
    let mut prev_right = 0.0f32;

    let mut flush = |text: &mut String,
                     bbox: &mut BoundingBox,
                     conf_sum: &mut f32,
                     conf_count: &mut u32,
                     blocks: &mut Vec<TextBlock>| {
        if text.is_empty() {
            return;
        }
        let mut block = TextBlock::new(std::mem::take(text), *bbox);
        if *conf_count > 0 {
            block.confidence = Some((*conf_sum / *conf_count as f32 / 100.0).clamp(0.0, 1.0));
        }
        blocks.push(block);
        *bbox = BoundingBox::default();
        *conf_sum = 0.0;
        *conf_count = 0;
    };

    for word in &words {
        let key = (word.block, word.paragraph, word.line);
        let word_box = BoundingBox::new(
            word.top,
            word.left,
            word.top + word.height,
            word.left + word.width,
        );

        if current_key != Some(key) {
            flush(
                &mut line_text,
                &mut line_bbox,
                &mut line_conf_sum,
                &mut line_conf_count,
                &mut blocks,
            );
            current_key = Some(key);
            line_bbox = word_box;
        } else {
            let gap = word.left - prev_right;
            line_text.push(' ');
            if gap > 2.0 * word.height {
                line_text.push(' ');
            }
            line_bbox.top = line_bbox.top.min(word_box.top);
            line_bbox.left = line_bbox.left.min(word_box.left);
            line_bbox.bottom = line_bbox.bottom.max(word_box.bottom);
            line_bbox.right = line_bbox.right.max(word_box.right);
        }

        line_text.push_str(&word.text);
        prev_right = word_box.right;

        if word.conf >= 0.0 {
            line_conf_sum += word.conf;
            line_conf_count += 1;
            conf_sum += word.conf;
            conf_count += 1;
        }
    }
    flush(
        &mut line_text,
        &mut line_bbox,
        &mut line_conf_sum,
        &mut line_conf_count,
        &mut blocks,
    );

    if blocks.is_empty() {
        warn!("tesseract produced no word rows");
    }

    let text = blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let confidence = if conf_count > 0 {
        (conf_sum / conf_count as f32 / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };

    ExtractionResult {
        text,
        confidence,
        blocks,
        normalized_text: None,
        languages: Vec::new(),
        engine: EngineKind::Local,
        processing_time_ms: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word_row(
        block: u32,
        line: u32,
        word: u32,
        left: u32,
        top: u32,
        width: u32,
        conf: i32,
        text: &str,
    ) -> String {
        format!("5\t1\t{block}\t1\t{line}\t{word}\t{left}\t{top}\t{width}\t20\t{conf}\t{text}")
    }

    #[test]
    fn groups_words_into_line_blocks() {
        let tsv = [
            HEADER.to_string(),
            "4\t1\t1\t1\t1\t0\t10\t10\t200\t20\t-1\t".to_string(),
            word_row(1, 1, 1, 10, 10, 60, 95, "TOTAL:"),
            word_row(1, 1, 2, 80, 10, 60, 91, "$42.99"),
            word_row(1, 2, 1, 10, 40, 90, 88, "01/15/2024"),
        ]
        .join("\n");

        let result = parse_tsv(&tsv);
        assert_eq!(result.blocks.len(), 2);
        assert_eq!(result.blocks[0].text, "TOTAL: $42.99");
        assert_eq!(result.blocks[1].text, "01/15/2024");
        assert_eq!(result.text, "TOTAL: $42.99\n01/15/2024");
    }

    #[test]
    fn line_bbox_unions_word_boxes() {
        let tsv = [
            HEADER.to_string(),
            word_row(1, 1, 1, 10, 10, 60, 95, "TOTAL:"),
            word_row(1, 1, 2, 80, 12, 60, 91, "$42.99"),
        ]
        .join("\n");

        let bbox = parse_tsv(&tsv).blocks[0].bbox;
        assert_eq!(bbox.left, 10.0);
        assert_eq!(bbox.top, 10.0);
        assert_eq!(bbox.right, 140.0);
        assert_eq!(bbox.bottom, 32.0);
    }

    #[test]
    fn confidence_scales_to_unit_range() {
        let tsv = [
            HEADER.to_string(),
            word_row(1, 1, 1, 10, 10, 60, 80, "a"),
            word_row(1, 1, 2, 80, 10, 60, 100, "b"),
        ]
        .join("\n");

        let result = parse_tsv(&tsv);
        assert!((result.confidence - 0.9).abs() < 1e-5);
        assert!((result.blocks[0].confidence.unwrap() - 0.9).abs() < 1e-5);
    }

    #[test]
    fn sentinel_confidence_excluded_from_aggregate() {
        let tsv = [
            HEADER.to_string(),
            word_row(1, 1, 1, 10, 10, 60, -1, "smudge"),
            word_row(1, 1, 2, 80, 10, 60, 90, "clear"),
        ]
        .join("\n");

        let result = parse_tsv(&tsv);
        assert_eq!(result.blocks[0].text, "smudge clear");
        assert!((result.confidence - 0.9).abs() < 1e-5);
    }

    #[test]
    fn wide_gaps_become_double_spaces() {
        let tsv = [
            HEADER.to_string(),
            word_row(1, 1, 1, 10, 10, 40, 95, "Item"),
            // Gap of 150px against a 20px line height.
            word_row(1, 1, 2, 200, 10, 50, 92, "9.99"),
        ]
        .join("\n");

        assert_eq!(parse_tsv(&tsv).blocks[0].text, "Item  9.99");
    }

    #[test]
    fn empty_tsv_yields_empty_result() {
        let result = parse_tsv(HEADER);
        assert!(result.text.is_empty());
        assert!(result.blocks.is_empty());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn language_spec_combines_hebrew() {
        let extractor = TesseractExtractor::new(&LocalConfig::default());

        let options = ExtractionOptions {
            language: "en".to_string(),
            enable_hebrew: true,
        };
        assert_eq!(extractor.language_spec(&options), "eng+heb");

        let options = ExtractionOptions {
            language: "eng".to_string(),
            enable_hebrew: false,
        };
        assert_eq!(extractor.language_spec(&options), "eng");

        let options = ExtractionOptions {
            language: "he".to_string(),
            enable_hebrew: true,
        };
        assert_eq!(extractor.language_spec(&options), "heb");
    }

    #[test]
    fn detected_languages_filtered_by_script() {
        assert_eq!(
            detect_languages("TOTAL קבלה", "eng+heb"),
            vec!["eng".to_string(), "heb".to_string()]
        );
        assert_eq!(detect_languages("TOTAL 42", "eng+heb"), vec!["eng".to_string()]);
        assert_eq!(detect_languages("קבלה", "eng+heb"), vec!["heb".to_string()]);
    }
}
