// VideoExtractor trait and common types

use async_trait::async_trait;
use std::path::Path;

use crate::downloader::errors::DownloadError;
use crate::downloader::progress::ProgressEmitter;

/// Player clients that get past YouTube's bot checks most often without cookies
pub const DEFAULT_PLAYER_CLIENTS: &str = "web,web_safari,ios";

/// Configuration for extraction and transfer
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Ask the extractor to work around bot detection where it can
    pub bypass_bot_detection: bool,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Path to cookies.txt file
    pub cookies_path: Option<String>,
    /// Proof-of-Origin token handed to YouTube
    pub po_token: Option<String>,
    /// YouTube player clients (comma separated)
    pub player_client: String,
    /// Info extraction timeout in seconds; transfers are unbounded
    pub timeout_seconds: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            bypass_bot_detection: true,
            proxy: None,
            cookies_path: None,
            po_token: None,
            player_client: DEFAULT_PLAYER_CLIENTS.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl ExtractorConfig {
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_cookies_path(mut self, path: Option<String>) -> Self {
        self.cookies_path = path;
        self
    }

    pub fn with_po_token(mut self, token: Option<String>) -> Self {
        self.po_token = token;
        self
    }

    pub fn with_bot_bypass(mut self, enabled: bool) -> Self {
        self.bypass_bot_detection = enabled;
        self
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_player_client(mut self, client: Option<String>) -> Self {
        if let Some(client) = client {
            self.player_client = client;
        }
        self
    }
}

/// One downloadable encoding of a video, keyed by YouTube itag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamVariant {
    pub itag: u32,
    /// Container extension (mp4, webm, m4a)
    pub ext: String,
    /// Video height in pixels, absent for audio-only streams
    pub height: Option<u32>,
    /// Video codec (avc1, vp9, av01, none)
    pub vcodec: Option<String>,
    /// Audio codec (mp4a, opus, none)
    pub acodec: Option<String>,
}

impl StreamVariant {
    pub fn has_video(&self) -> bool {
        self.vcodec
            .as_deref()
            .map_or(false, |v| v != "none" && !v.is_empty())
    }

    pub fn has_audio(&self) -> bool {
        self.acodec
            .as_deref()
            .map_or(false, |a| a != "none" && !a.is_empty())
    }

    /// Video and audio muxed in one file
    pub fn is_progressive(&self) -> bool {
        self.has_video() && self.has_audio()
    }

    pub fn is_audio_only(&self) -> bool {
        self.has_audio() && !self.has_video()
    }
}

/// A resolved video page: title plus the streams it offers
#[derive(Debug, Clone)]
pub struct ExtractedVideo {
    /// URL the video was resolved from
    pub url: String,
    pub title: String,
    pub streams: Vec<StreamVariant>,
}

impl ExtractedVideo {
    pub fn get_by_itag(&self, itag: u32) -> Option<&StreamVariant> {
        self.streams.iter().find(|s| s.itag == itag)
    }

    /// Highest-resolution progressive mp4; adaptive streams would need a merge step.
    pub fn get_highest_resolution(&self) -> Option<&StreamVariant> {
        self.streams
            .iter()
            .filter(|s| s.is_progressive() && s.ext == "mp4")
            .max_by_key(|s| s.height.unwrap_or(0))
    }
}

/// Trait for video extractors
#[async_trait]
pub trait VideoExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Resolve a page URL into its title and stream variants
    async fn resolve(
        &self,
        url: &str,
        config: &ExtractorConfig,
    ) -> Result<ExtractedVideo, DownloadError>;

    /// Write one stream of `video` to `dest`, replacing any existing file
    async fn transfer(
        &self,
        video: &ExtractedVideo,
        stream: &StreamVariant,
        dest: &Path,
        config: &ExtractorConfig,
        progress: &ProgressEmitter,
    ) -> Result<(), DownloadError>;
}
