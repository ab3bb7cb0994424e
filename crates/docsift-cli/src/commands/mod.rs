//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use docsift_core::DocsiftConfig;

/// Load the pipeline configuration, falling back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocsiftConfig> {
    match config_path {
        Some(path) => Ok(DocsiftConfig::from_file(Path::new(path))?),
        None => Ok(DocsiftConfig::default()),
    }
}

/// Supported input image extensions.
pub fn is_supported_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "tiff" | "bmp" | "webp")
}
