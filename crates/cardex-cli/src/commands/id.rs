//! Id command - classify an identity document and extract its numbers.

use clap::Args;

use cardex_core::ExtractionMode;

use super::{load_config, run_extraction, ExtractArgs};

/// Arguments for the id command.
#[derive(Args)]
pub struct IdArgs {
    #[command(flatten)]
    extract: ExtractArgs,

    /// Number of normalized lines echoed in the record
    #[arg(long)]
    text_limit: Option<usize>,
}

pub async fn run(args: IdArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(limit) = args.text_limit {
        config.extraction.extracted_text_limit = limit;
    }

    run_extraction(args.extract, ExtractionMode::Identity, None, config).await
}
