//! Image complexity assessment used to route between extraction engines.
//!
//! Clean printed documents go to the cheap local engine; skewed, handwritten,
//! or low-contrast captures go to the cloud engine. The heuristics here are
//! deliberately cheap: sampled pixel statistics, no model inference.

use image::GenericImageView;
use tracing::debug;

use crate::error::ExtractionError;

/// Sample stride for pixel statistics. Keeps the cost flat for phone photos.
const SAMPLE_STEP: usize = 10;

/// Gradient magnitude above which a sampled pixel counts as an edge.
const EDGE_THRESHOLD: f32 = 30.0;

/// Per-image qualities that feed the complexity score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComplexityFactors {
    /// Dense low-contrast strokes, typical of handwriting.
    pub has_handwriting: bool,
    /// Bright, uniform background, typical of a flatbed scan.
    pub is_scanned: bool,
    /// Contrast too low for reliable local recognition.
    pub low_contrast: bool,
    /// Landscape capture of a portrait document.
    pub skewed_aspect: bool,
}

/// Output of a complexity assessment.
#[derive(Debug, Clone, Copy)]
pub struct ComplexityAssessment {
    /// Complexity score (0.0 simple - 1.0 complex).
    pub score: f32,
    /// The individual factors behind the score.
    pub factors: ComplexityFactors,
}

/// Strategy for judging how hard an image will be to OCR.
///
/// The router only depends on the output contract, so alternative strategies
/// (for example a learned quality model) can slot in without touching it.
pub trait ComplexityAssessor: Send + Sync {
    fn assess(&self, image: &[u8]) -> Result<ComplexityAssessment, ExtractionError>;
}

/// Default assessor built on sampled grayscale statistics.
#[derive(Debug, Clone, Default)]
pub struct HeuristicAssessor;

impl HeuristicAssessor {
    pub fn new() -> Self {
        Self
    }
}

impl ComplexityAssessor for HeuristicAssessor {
    fn assess(&self, image: &[u8]) -> Result<ComplexityAssessment, ExtractionError> {
        let decoded = image::load_from_memory(image)
            .map_err(|e| ExtractionError::InvalidImage(e.to_string()))?;
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(ExtractionError::InvalidImage(
                "image has zero dimensions".to_string(),
            ));
        }

        let gray = decoded.to_luma8();
        let stats = sample_stats(&gray);

        // Contrast as normalized standard deviation of brightness.
        let contrast = stats.variance.sqrt() / 255.0;
        let contrast_term = ((0.25 - contrast) / 0.25).clamp(0.0, 1.0);
        let edge_term = ((stats.edge_density - 0.08) / 0.25).clamp(0.0, 1.0);

        let factors = ComplexityFactors {
            has_handwriting: edge_term > 0.6 && contrast < 0.3,
            is_scanned: stats.brightness > 190.0 && stats.edge_density < 0.12,
            low_contrast: contrast < 0.15,
            skewed_aspect: width > height,
        };

        let aspect_term = if factors.skewed_aspect { 1.0 } else { 0.0 };

        let mut score = 0.4 * contrast_term + 0.35 * edge_term + 0.25 * aspect_term;
        if factors.is_scanned {
            score *= 0.5;
        }
        let score = score.clamp(0.0, 1.0);

        debug!(
            score,
            contrast,
            edge_density = stats.edge_density,
            brightness = stats.brightness,
            "assessed image complexity"
        );

        Ok(ComplexityAssessment { score, factors })
    }
}

struct SampleStats {
    brightness: f32,
    variance: f32,
    edge_density: f32,
}

/// Sampled brightness mean/variance and gradient edge density.
fn sample_stats(gray: &image::GrayImage) -> SampleStats {
    let (width, height) = gray.dimensions();

    let mut sum = 0u64;
    let mut count = 0u32;
    for y in (0..height).step_by(SAMPLE_STEP) {
        for x in (0..width).step_by(SAMPLE_STEP) {
            sum += gray.get_pixel(x, y)[0] as u64;
            count += 1;
        }
    }
    let brightness = if count > 0 {
        sum as f32 / count as f32
    } else {
        128.0
    };

    let mut variance_sum = 0.0f32;
    let mut edges = 0u32;
    let mut edge_samples = 0u32;
    for y in (0..height).step_by(SAMPLE_STEP) {
        for x in (0..width).step_by(SAMPLE_STEP) {
            let value = gray.get_pixel(x, y)[0] as f32;
            let diff = value - brightness;
            variance_sum += diff * diff;

            if x + 1 < width && y + 1 < height {
                let dx = gray.get_pixel(x + 1, y)[0] as f32 - value;
                let dy = gray.get_pixel(x, y + 1)[0] as f32 - value;
                if (dx * dx + dy * dy).sqrt() > EDGE_THRESHOLD {
                    edges += 1;
                }
                edge_samples += 1;
            }
        }
    }

    SampleStats {
        brightness,
        variance: if count > 0 {
            variance_sum / count as f32
        } else {
            0.0
        },
        edge_density: if edge_samples > 0 {
            edges as f32 / edge_samples as f32
        } else {
            0.0
        },
    }
}
