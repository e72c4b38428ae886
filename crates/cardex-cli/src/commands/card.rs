//! Card command - extract contact fields from a single business card.

use clap::Args;

use cardex_core::{ExtractionMode, MobilePolicy};

use super::{load_config, run_extraction, ExtractArgs};

/// Arguments for the card command.
#[derive(Args)]
pub struct CardArgs {
    #[command(flatten)]
    extract: ExtractArgs,

    /// Free-text instruction naming the fields to return
    #[arg(short, long)]
    prompt: Option<String>,

    /// Only accept mobile numbers carrying the +91 country code
    #[arg(long)]
    strict_mobile: bool,
}

pub async fn run(args: CardArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if args.strict_mobile {
        config.extraction.mobile_policy = MobilePolicy::Strict;
    }

    run_extraction(args.extract, ExtractionMode::Card, args.prompt, config).await
}
