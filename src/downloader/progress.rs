// Transfer progress - parsed from yt-dlp output, logged to the console only

use std::sync::atomic::{AtomicI32, Ordering};

use regex::Regex;
use tracing::{debug, info};

use super::models::DownloadProgress;

/// Parse yt-dlp progress line like:
/// [download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32 (frag 29/454)
pub fn parse_ytdlp_progress(line: &str) -> Option<DownloadProgress> {
    lazy_static::lazy_static! {
        static ref PROGRESS_RE: Regex = Regex::new(
            r"\[download\]\s+(\d+\.?\d*)%\s+of\s+~?\s*(\d+\.?\d*\s*\w+)(?:\s+at\s+(\S+/s))?(?:\s+ETA\s+(\S+))?(?:\s+\(frag\s+(\d+)/(\d+)\))?"
        ).unwrap();
        static ref DEST_RE: Regex = Regex::new(r"\[download\]\s+Destination:\s+(.+)").unwrap();
        static ref MERGE_RE: Regex = Regex::new(r"\[Merger?\]\s+Merging").unwrap();
        static ref ALREADY_RE: Regex = Regex::new(r"has already been downloaded").unwrap();
    }

    if let Some(caps) = PROGRESS_RE.captures(line) {
        let percent: f32 = caps.get(1)?.as_str().parse().ok()?;
        let size = caps.get(2).map(|m| m.as_str()).unwrap_or("?");
        let speed = caps.get(3).map(|m| m.as_str());
        let eta = caps.get(4).map(|m| m.as_str());
        let frag = caps
            .get(5)
            .zip(caps.get(6))
            .map(|(cur, total)| format!(" (frag {}/{})", cur.as_str(), total.as_str()));

        let mut status = format!("{:.1}% of {}", percent, size);
        if let Some(speed) = speed {
            status.push_str(&format!(" @ {}", speed));
        }
        if let Some(eta) = eta {
            status.push_str(&format!(" ETA {}", eta));
        }
        if let Some(frag) = frag {
            status.push_str(&frag);
        }

        return Some(DownloadProgress { percent, status });
    }

    if let Some(caps) = DEST_RE.captures(line) {
        let filename = caps.get(1).map(|m| m.as_str()).unwrap_or("file");
        let short_name = filename
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(filename);
        return Some(DownloadProgress {
            percent: 0.0,
            status: format!("Starting: {}", short_name),
        });
    }

    if MERGE_RE.is_match(line) {
        return Some(DownloadProgress {
            percent: 99.0,
            status: "Merging video and audio".to_string(),
        });
    }

    if ALREADY_RE.is_match(line) {
        return Some(DownloadProgress {
            percent: 100.0,
            status: "File already downloaded".to_string(),
        });
    }

    None
}

/// Console progress hook for one transfer.
///
/// Logs at most once per 10% step so a long download doesn't flood the log.
pub struct ProgressEmitter {
    label: String,
    last_bucket: AtomicI32,
}

impl ProgressEmitter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            last_bucket: AtomicI32::new(-1),
        }
    }

    /// Returns true when the update was logged.
    pub fn emit(&self, progress: &DownloadProgress) -> bool {
        let bucket = (progress.percent / 10.0).floor() as i32;
        let previous = self.last_bucket.fetch_max(bucket, Ordering::Relaxed);
        if bucket > previous {
            info!(target: "progress", "[{}] {}", self.label, progress.status);
            true
        } else {
            debug!(target: "progress", "[{}] {}", self.label, progress.status);
            false
        }
    }

    /// Feed one raw yt-dlp output line.
    pub fn emit_line(&self, line: &str) -> Option<DownloadProgress> {
        let progress = parse_ytdlp_progress(line)?;
        self.emit(&progress);
        Some(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_line() {
        let line = "[download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32 (frag 29/454)";
        let p = parse_ytdlp_progress(line).unwrap();
        assert!((p.percent - 6.2).abs() < f32::EPSILON);
        assert_eq!(p.status, "6.2% of 343.72MiB @ 420.30KiB/s ETA 12:32 (frag 29/454)");
    }

    #[test]
    fn test_parse_finished_line() {
        let p = parse_ytdlp_progress("[download] 100% of   10.00MiB in 00:00:03 at 3.10MiB/s").unwrap();
        assert_eq!(p.percent, 100.0);
        assert!(p.status.starts_with("100.0% of 10.00MiB"));
    }

    #[test]
    fn test_parse_destination_and_merge() {
        let p = parse_ytdlp_progress("[download] Destination: /home/u/Downloads/Song(1).mp4").unwrap();
        assert_eq!(p.percent, 0.0);
        assert_eq!(p.status, "Starting: Song(1).mp4");

        let p = parse_ytdlp_progress("[Merger] Merging formats into \"x.mp4\"").unwrap();
        assert_eq!(p.percent, 99.0);

        let p = parse_ytdlp_progress("[download] x.mp4 has already been downloaded").unwrap();
        assert_eq!(p.percent, 100.0);
    }

    #[test]
    fn test_unrelated_line_ignored() {
        assert!(parse_ytdlp_progress("[youtube] abc: Downloading webpage").is_none());
    }

    #[test]
    fn test_emitter_logs_once_per_bucket() {
        let emitter = ProgressEmitter::new("Song");
        let at = |percent: f32| DownloadProgress {
            percent,
            status: format!("{}%", percent),
        };
        assert!(emitter.emit(&at(0.0)));
        assert!(!emitter.emit(&at(4.0)));
        assert!(emitter.emit(&at(12.5)));
        assert!(!emitter.emit(&at(19.9)));
        assert!(emitter.emit(&at(100.0)));
        assert!(!emitter.emit(&at(50.0)));
    }
}
