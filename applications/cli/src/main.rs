//! retag binary entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("retag_core=info,retag_tagfile=info,retag_cli=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = retag_cli::Args::parse();
    let config = retag_cli::RetagConfig::load()?;
    retag_cli::run(&args, &config)
}
