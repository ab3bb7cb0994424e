//! Cloud vision text-extraction adapter.
//!
//! Sends the full image as base64 to an images:annotate endpoint and maps
//! the annotation list back into an [`ExtractionResult`]. The first
//! annotation is the engine's assembled full text; the remaining word-level
//! annotations supply per-block geometry and the confidence aggregate.

use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TextExtractor;
use crate::error::ExtractionError;
use crate::models::{
    BoundingBox, CloudConfig, EngineKind, ExtractionOptions, ExtractionResult, TextBlock,
};

/// Adapter for the cloud vision OCR engine.
pub struct CloudVisionExtractor {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CloudVisionExtractor {
    /// Build an adapter from configuration.
    pub fn new(config: &CloudConfig) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.resolve_api_key(),
        })
    }

    fn request_body(image: &[u8], options: &ExtractionOptions) -> AnnotateRequest {
        let mut hints = vec![normalize_hint(&options.language)];
        if options.enable_hebrew && !hints.contains(&"he".to_string()) {
            hints.push("he".to_string());
        }

        AnnotateRequest {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: BASE64.encode(image),
                },
                features: vec![Feature {
                    feature_type: "TEXT_DETECTION".to_string(),
                    max_results: 200,
                }],
                image_context: ImageContext {
                    language_hints: hints,
                },
            }],
        }
    }
}

/// Map Tesseract-style codes to the BCP-47 hints the cloud engine expects.
fn normalize_hint(language: &str) -> String {
    match language {
        "eng" => "en".to_string(),
        "heb" => "he".to_string(),
        other => other.to_string(),
    }
}

#[async_trait::async_trait]
impl TextExtractor for CloudVisionExtractor {
    fn engine(&self) -> EngineKind {
        EngineKind::Cloud
    }

    async fn extract(
        &self,
        image: &[u8],
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult, ExtractionError> {
        let start = Instant::now();

        let mut request = self.client.post(&self.endpoint);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .json(&Self::request_body(image, options))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: AnnotateResponse = response.json().await?;
        let mut result = parse_annotate_response(body)?;
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            blocks = result.blocks.len(),
            confidence = result.confidence,
            "cloud extraction complete"
        );

        Ok(result)
    }
}

/// Turn a deserialized annotate response into an extraction result.
///
/// Factored out of the HTTP call so the wire format can be tested from
/// canned JSON.
fn parse_annotate_response(body: AnnotateResponse) -> Result<ExtractionResult, ExtractionError> {
    let response = body
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| ExtractionError::Response("empty response list".to_string()))?;

    if let Some(error) = response.error {
        return Err(ExtractionError::Api {
            status: error.code,
            message: error.message,
        });
    }

    let mut annotations = response.text_annotations.into_iter();

    // The first annotation is the engine's own full-text assembly; without
    // it the image contained no text.
    let Some(full) = annotations.next() else {
        return Ok(ExtractionResult {
            text: String::new(),
            confidence: 0.0,
            blocks: Vec::new(),
            normalized_text: None,
            languages: Vec::new(),
            engine: EngineKind::Cloud,
            processing_time_ms: 0,
        });
    };

    let mut languages = Vec::new();
    if let Some(locale) = &full.locale {
        languages.push(locale.clone());
    }

    let mut blocks = Vec::new();
    let mut confidence_sum = 0.0f32;
    let mut confidence_count = 0u32;

    for annotation in annotations {
        if let Some(locale) = &annotation.locale {
            if !languages.contains(locale) {
                languages.push(locale.clone());
            }
        }
        if let Some(c) = annotation.confidence {
            confidence_sum += c;
            confidence_count += 1;
        }

        let Some(bbox) = annotation.bounding_poly.as_ref().and_then(poly_to_bbox) else {
            continue;
        };

        let mut block = TextBlock::new(annotation.description, bbox);
        block.confidence = annotation.confidence;
        blocks.push(block);
    }

    // Aggregate over the word annotations that report a confidence. A
    // response carrying none reports 0 and leaves triage to the caller.
    let confidence = if confidence_count > 0 {
        (confidence_sum / confidence_count as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Ok(ExtractionResult {
        text: full.description,
        confidence,
        blocks,
        normalized_text: None,
        languages,
        engine: EngineKind::Cloud,
        processing_time_ms: 0,
    })
}

/// Axis-align a bounding polygon. Vertices may omit coordinates at the
/// image border, which the wire format encodes as missing fields.
fn poly_to_bbox(poly: &BoundingPoly) -> Option<BoundingBox> {
    if poly.vertices.is_empty() {
        return None;
    }

    let xs = poly.vertices.iter().map(|v| v.x.unwrap_or(0) as f32);
    let ys = poly.vertices.iter().map(|v| v.y.unwrap_or(0) as f32);

    let left = xs.clone().fold(f32::INFINITY, f32::min);
    let right = xs.fold(f32::NEG_INFINITY, f32::max);
    let top = ys.clone().fold(f32::INFINITY, f32::min);
    let bottom = ys.fold(f32::NEG_INFINITY, f32::max);

    Some(BoundingBox::new(top, left, bottom, right))
}

// Wire format mirror types.

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
    #[serde(rename = "imageContext")]
    image_context: ImageContext,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: String,
    #[serde(rename = "maxResults")]
    max_results: u32,
}

#[derive(Debug, Serialize)]
struct ImageContext {
    #[serde(rename = "languageHints")]
    language_hints: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(rename = "textAnnotations", default)]
    text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    description: String,
    #[serde(default)]
    locale: Option<String>,
    #[serde(rename = "boundingPoly", default)]
    bounding_poly: Option<BoundingPoly>,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

#[derive(Debug, Deserialize)]
struct Vertex {
    #[serde(default)]
    x: Option<i32>,
    #[serde(default)]
    y: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    message: String,
}
