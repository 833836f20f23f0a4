//! Upload service that turns PowerPoint speaker notes into Word documents.

use anyhow::{Context, Result};
use clap::Parser;
use notes_server::{router, AppState, ServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    // Initialize logging
    if config.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let app = router(AppState::from_config(&config), config.max_upload_bytes);

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;

    log::info!(
        "Listening on {} (empty notes: {}, downloads kept {}s)",
        config.addr,
        config.empty_notes,
        config.download_ttl_secs
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
