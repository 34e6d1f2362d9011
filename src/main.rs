use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use medaccess::{
    AccessConfig, AppState, DataSnapshot, GeoJsonFiles, SnapshotHandle, VERSION, telemetry, web,
};

/// Accessibility of medical facilities from sports facilities
#[derive(Debug, Parser)]
#[command(name = "medaccess", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => AccessConfig::load_from_path(Some(path))?,
        None => AccessConfig::load()?,
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    telemetry::init(&config.logging, cli.verbose)?;
    info!("medaccess {} starting", VERSION);

    let source = Arc::new(GeoJsonFiles::from_config(&config.data));
    let index = config.classifier.index;
    let snapshot = {
        let source = Arc::clone(&source);
        tokio::task::spawn_blocking(move || DataSnapshot::load(source.as_ref(), index))
            .await
            .context("Dataset loading task failed")?
            .context("Failed to load datasets")?
    };

    let state = AppState::new(
        SnapshotHandle::new(snapshot),
        config.classifier(),
        source,
        index,
    );

    web::run(&config.server, state).await
}
