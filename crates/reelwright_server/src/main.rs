//! Reelwright server binary.

use clap::Parser;
use reelwright_interface::ProviderRegistry;
use reelwright_pipeline::{InMemoryJobQueue, InMemoryStore};
use reelwright_server::{AppState, ServerConfig, init_logging, router};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Video generation and publishing orchestrator.
#[derive(Debug, Parser)]
#[command(name = "reelwright-server", version, about)]
struct Cli {
    /// Configuration file (defaults to ./reelwright.toml when present)
    #[arg(short, long, env = "REELWRIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    init_logging(&config)?;

    let state = AppState::from_config(
        &config,
        Arc::new(InMemoryStore::new()),
        Arc::new(InMemoryJobQueue::new()),
        ProviderRegistry::new(),
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, media_root = %config.media_root.display(), "Reelwright server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
