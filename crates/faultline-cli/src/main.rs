//! # fln — faultline CLI
//!
//! Single-target chaos execution agent: injects a transient network fault
//! into one running container's network namespace, holds it for a bounded
//! duration, and guarantees removal on every exit path.

mod commands;

use clap::Parser;

use crate::commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    commands::execute(cli).await
}
