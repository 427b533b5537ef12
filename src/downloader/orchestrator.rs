// Downloader - one request, start to finish
//
// validate -> resolve target -> extract -> select -> name -> transfer
//
// Every step returns a Result; the first failure ends the request.
// Nothing is retried.

use std::sync::Arc;

use tracing::info;

use super::errors::DownloadError;
use super::extractors::{ExtractorConfig, VideoExtractor};
use super::format_selector::FormatSelector;
use super::models::{CompletedDownload, DownloadOutcome, DownloadRequest};
use super::progress::ProgressEmitter;
use super::target::DownloadLocation;
use super::utils::build_filename;

pub struct Downloader {
    extractor: Arc<dyn VideoExtractor>,
    config: ExtractorConfig,
    location: DownloadLocation,
}

impl Downloader {
    pub fn new(
        extractor: Arc<dyn VideoExtractor>,
        config: ExtractorConfig,
        location: DownloadLocation,
    ) -> Self {
        Self {
            extractor,
            config,
            location,
        }
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    pub async fn handle(&self, request: &DownloadRequest) -> DownloadOutcome {
        let url = request.url()?;
        let method = request.method();

        let target = self.location.resolve()?;

        info!(
            "[Downloader] Resolving {} via {} (method: {})",
            url,
            self.extractor.name(),
            method
        );
        let video = self.extractor.resolve(url, &self.config).await?;

        let stream = FormatSelector::select(&video, method)?;

        let path = target
            .directory_path
            .join(build_filename(&video.title, request.count()));

        info!(
            "[Downloader] Downloading '{}' (itag {}) to {}",
            video.title,
            stream.itag,
            path.display()
        );
        let progress = ProgressEmitter::new(video.title.clone());
        self.extractor
            .transfer(&video, stream, &path, &self.config, &progress)
            .await?;

        info!("[Downloader] ✓ Saved {}", path.display());
        Ok(CompletedDownload {
            itag: stream.itag,
            title: video.title,
            path,
        })
    }
}
