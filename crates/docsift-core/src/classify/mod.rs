//! Document classification: type scoring, metadata and vendor extraction,
//! text quality, and layout analysis.

mod classifier;
mod layout;
mod metadata;
mod patterns;
mod signatures;
mod spatial;
mod vendor;

pub use classifier::DocumentClassifier;
pub use signatures::{SIGNATURES, TypeSignature, signature_for};
pub use spatial::VerticalRegion;
