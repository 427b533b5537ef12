// Downloader module - request policy on top of an external extractor

pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod target;
pub mod utils;

pub use errors::DownloadError;
pub use extractors::{ExtractorConfig, VideoExtractor, YtDlpExtractor};
pub use models::{CompletedDownload, DownloadOutcome, DownloadRequest, ResolvedTarget};
pub use orchestrator::Downloader;
pub use target::DownloadLocation;
