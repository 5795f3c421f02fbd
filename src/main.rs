use std::{fs::File, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use lightshafts::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal is the preview's canvas, so logs only go to a file.
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    lightshafts::run(cli).await
}
