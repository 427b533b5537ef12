// Deterministic in-memory extractor for tests

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::traits::{ExtractedVideo, ExtractorConfig, StreamVariant, VideoExtractor};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::DownloadProgress;
use crate::downloader::progress::ProgressEmitter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Resolve { url: String, bypass_bot_detection: bool },
    Transfer { itag: u32, dest: PathBuf },
}

pub struct FakeExtractor {
    pub title: String,
    pub streams: Vec<StreamVariant>,
    pub resolve_error: Option<String>,
    pub transfer_error: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeExtractor {
    /// A video offering 360p progressive (18), 720p progressive (22),
    /// 1080p video-only (137) and m4a audio (140).
    pub fn new(title: &str) -> Self {
        let stream = |itag: u32, ext: &str, height: Option<u32>, vcodec: &str, acodec: &str| {
            StreamVariant {
                itag,
                ext: ext.to_string(),
                height,
                vcodec: Some(vcodec.to_string()),
                acodec: Some(acodec.to_string()),
            }
        };
        Self {
            title: title.to_string(),
            streams: vec![
                stream(18, "mp4", Some(360), "avc1.42001E", "mp4a.40.2"),
                stream(22, "mp4", Some(720), "avc1.64001F", "mp4a.40.2"),
                stream(137, "mp4", Some(1080), "avc1.640028", "none"),
                stream(140, "m4a", None, "none", "mp4a.40.2"),
            ],
            resolve_error: None,
            transfer_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_streams(mut self, streams: Vec<StreamVariant>) -> Self {
        self.streams = streams;
        self
    }

    pub fn failing_resolve(mut self, message: &str) -> Self {
        self.resolve_error = Some(message.to_string());
        self
    }

    pub fn failing_transfer(mut self, message: &str) -> Self {
        self.transfer_error = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VideoExtractor for FakeExtractor {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn resolve(
        &self,
        url: &str,
        config: &ExtractorConfig,
    ) -> Result<ExtractedVideo, DownloadError> {
        self.record(Call::Resolve {
            url: url.to_string(),
            bypass_bot_detection: config.bypass_bot_detection,
        });
        if let Some(message) = &self.resolve_error {
            return Err(DownloadError::Extraction(message.clone()));
        }
        Ok(ExtractedVideo {
            url: url.to_string(),
            title: self.title.clone(),
            streams: self.streams.clone(),
        })
    }

    async fn transfer(
        &self,
        _video: &ExtractedVideo,
        stream: &StreamVariant,
        dest: &Path,
        _config: &ExtractorConfig,
        progress: &ProgressEmitter,
    ) -> Result<(), DownloadError> {
        self.record(Call::Transfer {
            itag: stream.itag,
            dest: dest.to_path_buf(),
        });
        if let Some(message) = &self.transfer_error {
            return Err(DownloadError::Transfer(message.clone()));
        }
        std::fs::write(dest, format!("itag {}", stream.itag))
            .map_err(|e| DownloadError::Transfer(e.to_string()))?;
        progress.emit(&DownloadProgress {
            percent: 100.0,
            status: "done".to_string(),
        });
        Ok(())
    }
}
