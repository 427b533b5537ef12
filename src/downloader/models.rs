// Common data models for the download pipeline

use serde::Deserialize;
use std::path::PathBuf;

use super::errors::DownloadError;

/// Method token used when the request does not name one.
///
/// It is also the token a "stream not found" error names for such a request,
/// so the message reads `'highest'` rather than a null placeholder.
pub const DEFAULT_METHOD: &str = "highest";

/// Body of `POST /download`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub count: Option<i64>,
}

impl DownloadRequest {
    /// The URL to fetch; absent and empty are both rejected.
    pub fn url(&self) -> Result<&str, DownloadError> {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(DownloadError::MissingUrl),
        }
    }

    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_METHOD)
    }

    pub fn count(&self) -> i64 {
        self.count.unwrap_or(1)
    }
}

/// Downloads directory for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub directory_path: PathBuf,
    /// Whether the directory was already there before resolution
    pub exists: bool,
}

/// A finished transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedDownload {
    /// Title as reported by the site, before sanitization
    pub title: String,
    pub path: PathBuf,
    pub itag: u32,
}

impl CompletedDownload {
    pub fn message(&self) -> String {
        format!("'{}' downloaded successfully!", self.title)
    }
}

/// Terminal value of a download request
pub type DownloadOutcome = Result<CompletedDownload, DownloadError>;

/// Download progress information
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub percent: f32,
    pub status: String,
}
