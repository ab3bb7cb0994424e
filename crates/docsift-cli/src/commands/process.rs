//! Process command - classify a single document image.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use docsift_core::models::ClassificationResult;
use docsift_core::{DocumentPipeline, DocumentType};

use super::{is_supported_image, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input image file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Base OCR language
    #[arg(short, long)]
    language: Option<String>,

    /// Disable Hebrew recognition and normalization
    #[arg(long)]
    no_hebrew: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    if let Some(language) = &args.language {
        config.extraction.language = language.clone();
    }
    if args.no_hebrew {
        config.extraction.enable_hebrew = false;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_supported_image(&args.input) {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message("Extracting text...");

    let image = fs::read(&args.input)?;
    let pipeline = DocumentPipeline::new(&config)?;
    pipeline.start().await?;

    let result = pipeline.process(&image, &config.extraction).await;
    pipeline.stop().await?;
    let result = result?;

    pb.finish_with_message("Done");

    let output = format_result(&result, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Wrote result to {}",
            style("ok").green(),
            output_path.display()
        );
    } else {
        println!("{output}");
    }

    info!("Processed in {}ms", start.elapsed().as_millis());
    Ok(())
}

/// Render a classification result in the requested format.
pub fn format_result(
    result: &ClassificationResult,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Text => Ok(text_summary(result)),
    }
}

fn text_summary(result: &ClassificationResult) -> String {
    let mut lines = Vec::new();

    let type_line = match result.doc_type {
        DocumentType::Unknown => {
            "Type:       unknown (could not auto-categorize, please confirm manually)".to_string()
        }
        other => format!("Type:       {} ({:.0}%)", other, result.confidence * 100.0),
    };
    lines.push(type_line);

    if let Some(name) = &result.vendor.name {
        lines.push(format!("Vendor:     {name}"));
    }
    for (field, value) in &result.metadata {
        lines.push(format!("{:<11} {value}", format!("{field}:")));
    }
    if !result.possible_types.is_empty() {
        let alternatives: Vec<String> = result
            .possible_types
            .iter()
            .map(|c| format!("{} ({:.0}%)", c.doc_type, c.confidence * 100.0))
            .collect();
        lines.push(format!("Also fits:  {}", alternatives.join(", ")));
    }
    lines.push(format!(
        "Quality:    {:.0}%{}",
        result.text_quality.score * 100.0,
        if result.text_quality.has_errors {
            " (OCR errors detected)"
        } else {
            ""
        }
    ));

    lines.join("\n")
}
