pub mod config;
pub mod downloader;
pub mod logging;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use config::ServiceConfig;
use downloader::{Downloader, VideoExtractor, YtDlpExtractor};
use server::AppState;

/// Build the yt-dlp backed service and serve it until the process is stopped.
pub async fn run(config: ServiceConfig) -> Result<()> {
    let extractor = match &config.ytdlp_path {
        Some(path) => YtDlpExtractor::with_path(path.clone()),
        None => YtDlpExtractor::new(),
    };
    info!("Using yt-dlp at {}", extractor.path());

    let extractor: Arc<dyn VideoExtractor> = Arc::new(extractor);
    let downloader = Downloader::new(extractor, config.extractor.clone(), config.location.clone());
    info!(
        "Extractor: {}, bot-detection bypass: {}",
        downloader.extractor_name(),
        config.extractor.bypass_bot_detection
    );

    let app = server::router(AppState::new(downloader));

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app).await.context("HTTP server error")
}
