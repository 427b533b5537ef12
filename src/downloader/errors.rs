// Error types for the download pipeline

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    /// Request carried no `url`, or an empty one
    MissingUrl,

    /// Request body is not a JSON object of the expected shape
    InvalidBody(String),

    /// No stream variant matched the requested method token
    StreamNotFound { method: String },

    /// Downloads directory could not be determined or created
    Environment(String),

    /// yt-dlp failed to resolve the URL (network, bot check, bad URL, ...)
    Extraction(String),

    /// yt-dlp failed while writing the selected stream to disk
    Transfer(String),
}

impl DownloadError {
    /// Caller-side problems; everything else is on the server or the remote site.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingUrl | Self::InvalidBody(_) | Self::StreamNotFound { .. }
        )
    }
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUrl => write!(f, "URL is required"),
            Self::InvalidBody(msg) => write!(f, "Invalid JSON body: {}", msg),
            Self::StreamNotFound { method } => {
                write!(f, "Stream with method '{}' not found.", method)
            }
            // Pass-through: the underlying text is what the caller sees.
            Self::Environment(msg) | Self::Extraction(msg) | Self::Transfer(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for DownloadError {}
