// Video extractors
//
// - yt-dlp: the native binary, used in production
// - fake:   scripted in-memory extractor for tests

mod cli;
mod diagnostics;
#[cfg(test)]
mod fake;
mod traits;

pub use cli::YtDlpExtractor;
pub use diagnostics::{diagnose_error, BlockingReason};
#[cfg(test)]
pub use fake::{Call, FakeExtractor};
pub use traits::{
    ExtractedVideo, ExtractorConfig, StreamVariant, VideoExtractor, DEFAULT_PLAYER_CLIENTS,
};
