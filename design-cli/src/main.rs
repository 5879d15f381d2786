//! # Design CLI
//!
//! Replays editor scripts and prints the resulting state.

use clap::Parser;
use design_cli::CliArgs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the snapshot
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "design_cli=info,design_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    tracing::info!("Starting design-cli {}", design_core::VERSION);
    if let Some(ref script) = args.script {
        tracing::info!("Script: {}", script.display());
    }

    let snapshot = design_cli::run(&args).await?;
    println!("{snapshot}");
    Ok(())
}
