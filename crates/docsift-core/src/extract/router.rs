//! Extraction orchestrator: complexity-based engine routing plus Hebrew
//! normalization of the result.

use tracing::{debug, info};

use super::{
    CloudVisionExtractor, ComplexityAssessor, HeuristicAssessor, TesseractExtractor, TextExtractor,
};
use crate::error::ExtractionError;
use crate::hebrew;
use crate::models::{DocsiftConfig, EngineKind, ExtractionOptions, ExtractionResult, RoutingConfig};

/// Routes each request to one extraction adapter.
///
/// Routing is deterministic: one assessment, one adapter call. A failing
/// adapter is not retried against the other engine; callers wanting
/// resilience layer their own fallback on top.
pub struct ExtractionRouter<A = HeuristicAssessor> {
    assessor: A,
    cloud: CloudVisionExtractor,
    local: TesseractExtractor,
    routing: RoutingConfig,
}

impl ExtractionRouter<HeuristicAssessor> {
    /// Build a router with the default heuristic assessor.
    pub fn new(config: &DocsiftConfig) -> Result<Self, ExtractionError> {
        Self::with_assessor(config, HeuristicAssessor::new())
    }
}

impl<A: ComplexityAssessor> ExtractionRouter<A> {
    /// Build a router with a custom complexity strategy.
    pub fn with_assessor(config: &DocsiftConfig, assessor: A) -> Result<Self, ExtractionError> {
        Ok(Self {
            assessor,
            cloud: CloudVisionExtractor::new(&config.cloud)?,
            local: TesseractExtractor::new(&config.local),
            routing: config.routing.clone(),
        })
    }

    /// Initialize adapter-side state (the local engine probe).
    pub async fn start(&self) -> Result<(), ExtractionError> {
        self.local.start().await
    }

    /// Tear down adapter-side state. Idempotent.
    pub async fn stop(&self) -> Result<(), ExtractionError> {
        self.local.stop().await
    }

    /// Extract text from an image, routing by complexity.
    ///
    /// Complex images (score above the threshold) go to the cloud engine,
    /// which copes better with skew, handwriting, and poor contrast; clean
    /// captures stay on the cheaper local engine. When the result contains
    /// Hebrew, the normalized form is attached.
    pub async fn extract_text(
        &self,
        image: &[u8],
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult, ExtractionError> {
        let assessment = self.assessor.assess(image)?;

        let adapter: &dyn TextExtractor = if assessment.score > self.routing.complexity_threshold {
            &self.cloud
        } else {
            &self.local
        };

        debug!(
            score = assessment.score,
            threshold = self.routing.complexity_threshold,
            engine = %adapter.engine(),
            factors = ?assessment.factors,
            "routing extraction"
        );

        let mut result = adapter.extract(image, options).await?;
        attach_hebrew(&mut result);

        info!(
            engine = %result.engine,
            blocks = result.blocks.len(),
            hebrew = result.normalized_text.is_some(),
            elapsed_ms = result.processing_time_ms,
            "extraction finished"
        );

        Ok(result)
    }

    /// Which engine a given complexity score routes to.
    pub fn engine_for_score(&self, score: f32) -> EngineKind {
        if score > self.routing.complexity_threshold {
            EngineKind::Cloud
        } else {
            EngineKind::Local
        }
    }
}

/// Attach the normalized form when the extracted text contains Hebrew.
fn attach_hebrew(result: &mut ExtractionResult) {
    if hebrew::detect(&result.text) {
        result.normalized_text = Some(hebrew::normalize(&result.text));
        if !result.languages.iter().any(|l| l == "he" || l == "heb") {
            result.languages.push("he".to_string());
        }
    }
}
