//! Batch processing command for multiple card or ID files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use cardex_core::{ExtractionMode, InputKind, MobilePolicy, PipelineResult};

use super::output::{format_result, OutputFormat};
use super::{build_pipeline, load_config, needs_images};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Document kind of every file
    #[arg(long, value_enum, default_value = "card")]
    mode: BatchMode,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue when a file yields no lines
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Use only the rule-based extractors
    #[arg(long)]
    no_generative: bool,

    /// Only accept mobile numbers carrying the +91 country code
    #[arg(long)]
    strict_mobile: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum BatchMode {
    /// Business cards
    Card,
    /// Identity documents
    Id,
}

impl From<BatchMode> for ExtractionMode {
    fn from(mode: BatchMode) -> Self {
        match mode {
            BatchMode::Card => ExtractionMode::Card,
            BatchMode::Id => ExtractionMode::Identity,
        }
    }
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<PipelineResult>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }
    if args.strict_mobile {
        config.extraction.mobile_policy = MobilePolicy::Strict;
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| InputKind::from_path(p).is_some())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(output_dir) = &args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pipeline = Arc::new(build_pipeline(
        &config,
        needs_images(&files),
        !args.no_generative,
    )?);
    let mode = ExtractionMode::from(args.mode);

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.iter().cloned().enumerate() {
        let pipeline = Arc::clone(&pipeline);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let result = tokio::task::spawn_blocking(move || {
                let result = pipeline.process_file(&path, mode, None);
                (path, result)
            })
            .await?;
            Ok::<_, anyhow::Error>((index, result))
        });
    }

    let mut slots: Vec<Option<ProcessResult>> = files.iter().map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        let (index, (path, result)) = joined??;
        overall_pb.inc(1);

        // An input that produced no lines only holds sentinels.
        if result.lines.is_empty() {
            let error_msg = result
                .warnings
                .first()
                .cloned()
                .unwrap_or_else(|| "no text lines".to_string());
            if args.continue_on_error {
                warn!("Failed to process {}: {}", path.display(), error_msg);
                slots[index] = Some(ProcessResult {
                    path,
                    result: None,
                    error: Some(error_msg),
                });
                continue;
            }
            error!("Failed to process {}: {}", path.display(), error_msg);
            overall_pb.abandon();
            anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
        }

        slots[index] = Some(ProcessResult {
            path,
            result: Some(result),
            error: None,
        });
    }

    overall_pb.finish_with_message("Complete");

    let results: Vec<ProcessResult> = slots.into_iter().flatten().collect();
    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for item in &successful {
            if let Some(result) = &item.result {
                let output_name = item
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_result(result, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for item in &failed {
            println!(
                "  - {}: {}",
                item.path.display(),
                item.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// One row per file: status, the output fields, and timing.
///
/// Columns come from the first successful result; every row of a batch
/// shares the same mode, so later rows carry the same keys.
fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let columns: Vec<String> = results
        .iter()
        .find_map(|r| r.result.as_ref())
        .map(|r| r.output.entries().into_iter().map(|(k, _)| k).collect())
        .unwrap_or_default();

    let mut header = vec!["filename".to_string(), "status".to_string(), "source".to_string()];
    header.extend(columns.iter().cloned());
    header.extend(["processing_time_ms".to_string(), "error".to_string()]);
    wtr.write_record(&header)?;

    for item in results {
        let filename = item
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut row = vec![filename];
        match &item.result {
            Some(result) => {
                let entries = result.output.entries();
                row.push("success".to_string());
                row.push(format!("{:?}", result.source).to_lowercase());
                for column in &columns {
                    let value = entries
                        .iter()
                        .find(|(k, _)| k == column)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default();
                    row.push(value);
                }
                row.push(result.processing_time_ms.to_string());
                row.push(String::new());
            }
            None => {
                row.push("error".to_string());
                row.push(String::new());
                row.extend(columns.iter().map(|_| String::new()));
                row.push(String::new());
                row.push(item.error.clone().unwrap_or_default());
            }
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
