//! End-to-end document pipeline: extraction routing plus classification.

use tracing::info;

use crate::classify::DocumentClassifier;
use crate::error::Result;
use crate::extract::{ComplexityAssessor, ExtractionRouter, HeuristicAssessor};
use crate::models::{ClassificationResult, DocsiftConfig, ExtractionOptions, ExtractionResult};

/// Composes the extraction router and the classifier into the single call
/// the upload flow awaits.
pub struct DocumentPipeline<A = HeuristicAssessor> {
    router: ExtractionRouter<A>,
    classifier: DocumentClassifier,
}

impl DocumentPipeline<HeuristicAssessor> {
    /// Build a pipeline with the default heuristic complexity assessor.
    pub fn new(config: &DocsiftConfig) -> Result<Self> {
        Ok(Self {
            router: ExtractionRouter::new(config)?,
            classifier: DocumentClassifier::new(),
        })
    }
}

impl<A: ComplexityAssessor> DocumentPipeline<A> {
    /// Build a pipeline with a custom complexity strategy.
    pub fn with_assessor(config: &DocsiftConfig, assessor: A) -> Result<Self> {
        Ok(Self {
            router: ExtractionRouter::with_assessor(config, assessor)?,
            classifier: DocumentClassifier::new(),
        })
    }

    /// Initialize adapter-side state.
    pub async fn start(&self) -> Result<()> {
        self.router.start().await?;
        Ok(())
    }

    /// Tear down adapter-side state. Idempotent.
    pub async fn stop(&self) -> Result<()> {
        self.router.stop().await?;
        Ok(())
    }

    /// Extract text from an image without classifying it.
    pub async fn extract(
        &self,
        image: &[u8],
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult> {
        Ok(self.router.extract_text(image, options).await?)
    }

    /// Run the full pipeline over one image buffer.
    pub async fn process(
        &self,
        image: &[u8],
        options: &ExtractionOptions,
    ) -> Result<ClassificationResult> {
        let extraction = self.router.extract_text(image, options).await?;
        let classification = self.classifier.classify(&extraction)?;

        info!(
            doc_type = %classification.doc_type,
            confidence = classification.confidence,
            engine = %extraction.engine,
            "pipeline finished"
        );

        Ok(classification)
    }

    /// Classify an extraction result obtained elsewhere.
    pub fn classify(&self, extraction: &ExtractionResult) -> Result<ClassificationResult> {
        Ok(self.classifier.classify(extraction)?)
    }
}
