//! Text extraction: interchangeable OCR adapters, complexity assessment,
//! and the router that picks between them.

mod cloud;
mod complexity;
mod local;
mod router;

pub use cloud::CloudVisionExtractor;
pub use complexity::{ComplexityAssessment, ComplexityAssessor, ComplexityFactors, HeuristicAssessor};
pub use local::TesseractExtractor;
pub use router::ExtractionRouter;

use async_trait::async_trait;

use crate::error::ExtractionError;
use crate::models::{EngineKind, ExtractionOptions, ExtractionResult};

/// Contract shared by the two OCR engines.
///
/// Adapters turn an image buffer into raw text, per-block layout data, and a
/// confidence score. Engine failures propagate as [`ExtractionError`]; the
/// router decides what to do with them. Adapters hold no cache and perform no
/// side effects beyond the engine call itself.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Which engine this adapter drives.
    fn engine(&self) -> EngineKind;

    /// Extract text and layout from an image buffer.
    async fn extract(
        &self,
        image: &[u8],
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult, ExtractionError>;

    /// Initialize any engine-side state. Called once before first use;
    /// stateless adapters keep the default no-op.
    async fn start(&self) -> Result<(), ExtractionError> {
        Ok(())
    }

    /// Release engine-side state. Must be idempotent.
    async fn stop(&self) -> Result<(), ExtractionError> {
        Ok(())
    }
}
