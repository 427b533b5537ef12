// FormatSelector - maps a request's method token to exactly one stream
//
//   "itag_18"  -> itag 18  (360p mp4, video + audio)
//   "itag_128" -> itag 140 (m4a audio). The token name is historical and
//                 clients rely on it; it does not mean itag 128.
//   anything else -> highest-resolution progressive mp4
//
// Selection is a pure function of the token and the offered streams.

use super::errors::DownloadError;
use super::extractors::{ExtractedVideo, StreamVariant};

/// 360p H.264 + AAC, playable nearly everywhere
pub const ITAG_360P_MP4: u32 = 18;
/// 128 kbps AAC audio in m4a
pub const ITAG_AUDIO_M4A: u32 = 140;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSelection {
    Itag(u32),
    HighestResolution,
}

impl StreamSelection {
    pub fn from_method(method: &str) -> Self {
        match method {
            "itag_18" => Self::Itag(ITAG_360P_MP4),
            "itag_128" => Self::Itag(ITAG_AUDIO_M4A),
            _ => Self::HighestResolution,
        }
    }
}

pub struct FormatSelector;

impl FormatSelector {
    /// Pick the stream for `method`, or fail with the method named in the error.
    pub fn select<'a>(
        video: &'a ExtractedVideo,
        method: &str,
    ) -> Result<&'a StreamVariant, DownloadError> {
        let found = match StreamSelection::from_method(method) {
            StreamSelection::Itag(itag) => video.get_by_itag(itag),
            StreamSelection::HighestResolution => video.get_highest_resolution(),
        };

        found.ok_or_else(|| DownloadError::StreamNotFound {
            method: method.to_string(),
        })
    }
}
