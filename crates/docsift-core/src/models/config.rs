//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the docsift pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsiftConfig {
    /// Per-request extraction options.
    pub extraction: ExtractionOptions,

    /// Adapter routing configuration.
    pub routing: RoutingConfig,

    /// Cloud vision adapter configuration.
    pub cloud: CloudConfig,

    /// Local Tesseract adapter configuration.
    pub local: LocalConfig,
}

impl Default for DocsiftConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionOptions::default(),
            routing: RoutingConfig::default(),
            cloud: CloudConfig::default(),
            local: LocalConfig::default(),
        }
    }
}

/// Options recognized by both extraction adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    /// Base language ("en" or a Tesseract code such as "eng").
    pub language: String,

    /// Request Hebrew alongside the base language.
    pub enable_hebrew: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            enable_hebrew: true,
        }
    }
}

/// Adapter routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Complexity score above which the cloud adapter is used.
    pub complexity_threshold: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            complexity_threshold: 0.7,
        }
    }
}

/// Cloud vision adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Annotation endpoint URL.
    pub endpoint: String,

    /// API key. Falls back to the DOCSIFT_API_KEY environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl CloudConfig {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("DOCSIFT_API_KEY").ok())
    }
}

/// Local Tesseract adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Tesseract binary path or name resolved via PATH.
    pub binary: PathBuf,

    /// Page segmentation mode passed as --psm.
    pub page_seg_mode: u8,

    /// Keep engine-reported inter-word spacing in the output.
    pub preserve_interword_spaces: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            page_seg_mode: 3,
            preserve_interword_spaces: true,
        }
    }
}

impl DocsiftConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
