//! Subcommands and the helpers they share.

pub mod batch;
pub mod card;
pub mod config;
pub mod id;
pub mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use cardex_core::{
    CardexConfig, ExtractionMode, FileLineSource, ImageLineSource, InputKind, Pipeline,
};

use crate::gemini::GeminiExtractor;
use output::{format_result, OutputFormat};

/// Arguments shared by the single-file extraction commands.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (.txt, .json or an image)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    pub model_dir: Option<PathBuf>,

    /// Use only the rule-based extractors
    #[arg(long)]
    pub no_generative: bool,

    /// Print extraction warnings to stderr
    #[arg(long)]
    pub show_warnings: bool,
}

/// Load the config file given on the command line, else the user's
/// config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CardexConfig> {
    if let Some(path) = config_path {
        return Ok(CardexConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(CardexConfig::from_file(&default_path)?)
    } else {
        Ok(CardexConfig::default())
    }
}

/// Build the pipeline for a run.
///
/// Image recognition models are only loaded when `with_images` is set, and
/// a missing model is an error then.
pub fn build_pipeline(
    config: &CardexConfig,
    with_images: bool,
    use_generative: bool,
) -> anyhow::Result<Pipeline> {
    let mut source = FileLineSource::new();
    if with_images {
        let recognizer = ImageLineSource::from_config(config.ocr.clone()).map_err(|e| {
            anyhow::anyhow!(
                "{}.\n\nPlace the OCR models in {} or pass --model-dir.",
                e,
                config.ocr.model_dir.display()
            )
        })?;
        source = source.with_recognizer(Box::new(recognizer));
    }

    let mut pipeline = Pipeline::from_config(Box::new(source), config);

    if use_generative && config.generative.enabled {
        if let Some(extractor) = GeminiExtractor::from_config(&config.generative)? {
            pipeline = pipeline.with_generative(Box::new(extractor));
        }
    }

    Ok(pipeline)
}

/// Whether any of the inputs needs image recognition.
pub fn needs_images<'a>(inputs: impl IntoIterator<Item = &'a PathBuf>) -> bool {
    inputs
        .into_iter()
        .any(|p| InputKind::from_path(p) == Some(InputKind::Image))
}

/// Run one file through the pipeline and write the formatted output.
pub async fn run_extraction(
    args: ExtractArgs,
    mode: ExtractionMode,
    instruction: Option<String>,
    mut config: CardexConfig,
) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if InputKind::from_path(&args.input).is_none() {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    }

    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    info!("Processing file: {}", args.input.display());

    let pipeline = build_pipeline(&config, needs_images([&args.input]), !args.no_generative)?;

    let input = args.input.clone();
    let result = tokio::task::spawn_blocking(move || {
        pipeline.process_file(&input, mode, instruction.as_deref())
    })
    .await?;

    if args.show_warnings {
        for warning in &result.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
