//! Batch processing command for multiple document images.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use docsift_core::{DocumentPipeline, DocumentType};

use super::{is_supported_image, load_config, process::OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_image(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No image files match: {}", args.input);
    }

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
    }

    let pipeline = DocumentPipeline::new(&config)?;
    pipeline.start().await?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut processed = 0usize;
    let mut failed = 0usize;
    let mut unknown = 0usize;

    for file in &files {
        pb.set_message(file.display().to_string());

        let outcome = async {
            let image = fs::read(file)?;
            let result = pipeline.process(&image, &config.extraction).await?;
            anyhow::Ok(result)
        }
        .await;

        match outcome {
            Ok(result) => {
                processed += 1;
                if result.doc_type == DocumentType::Unknown {
                    unknown += 1;
                    warn!("{}: could not auto-categorize", file.display());
                }

                if let Some(dir) = &args.output_dir {
                    let name = file
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("result");
                    let target = dir.join(format!("{name}.json"));
                    fs::write(&target, super::process::format_result(&result, args.format)?)?;
                } else {
                    println!(
                        "{}: {} ({:.0}%)",
                        file.display(),
                        result.doc_type,
                        result.confidence * 100.0
                    );
                }
            }
            Err(e) => {
                failed += 1;
                error!("{}: {e}", file.display());
                if !args.continue_on_error {
                    pipeline.stop().await?;
                    return Err(e);
                }
            }
        }

        pb.inc(1);
    }

    pipeline.stop().await?;
    pb.finish_and_clear();

    println!(
        "{} {processed} processed, {failed} failed, {unknown} need manual review in {:.1}s",
        style("done:").green(),
        start.elapsed().as_secs_f32()
    );

    Ok(())
}
