// yt-dlp extractor - drives the native `yt-dlp` binary
//
// resolve:  yt-dlp --dump-json        -> title + numeric formats (itags)
// transfer: yt-dlp -f <itag> -o <dest> -> file on disk, progress on stdout

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tracing::{debug, info, warn};

use super::diagnostics::diagnose_error;
use super::traits::{ExtractedVideo, ExtractorConfig, StreamVariant, VideoExtractor};
use crate::downloader::errors::DownloadError;
use crate::downloader::progress::ProgressEmitter;
use crate::downloader::utils::{escape_output_template, run_output_with_timeout, summarize_stderr};

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    #[serde(default)]
    formats: Vec<YtDlpFormat>,
}

#[derive(Debug, Deserialize)]
struct YtDlpFormat {
    format_id: String,
    ext: Option<String>,
    height: Option<u32>,
    vcodec: Option<String>,
    acodec: Option<String>,
}

/// Extractor backed by the yt-dlp binary
pub struct YtDlpExtractor {
    ytdlp_path: String,
}

impl YtDlpExtractor {
    pub fn new() -> Self {
        Self {
            ytdlp_path: Self::find_ytdlp(),
        }
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            ytdlp_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.ytdlp_path
    }

    /// Find yt-dlp binary
    fn find_ytdlp() -> String {
        let common_paths = [
            "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
            "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac
            "/usr/bin/yt-dlp",          // System installation
        ];

        for path in common_paths {
            if Path::new(path).exists() {
                return path.to_string();
            }
        }

        let locator = if cfg!(windows) { "where" } else { "which" };
        if let Ok(output) = StdCommand::new(locator).arg("yt-dlp").output() {
            if output.status.success() {
                if let Ok(path) = String::from_utf8(output.stdout) {
                    if let Some(first) = path.lines().map(str::trim).find(|l| !l.is_empty()) {
                        return first.to_string();
                    }
                }
            }
        }

        "yt-dlp".to_string()
    }

    fn is_youtube(url: &str) -> bool {
        let lower = url.to_lowercase();
        lower.contains("youtube.com") || lower.contains("youtu.be")
    }

    /// Flags shared by resolve and transfer: bot bypass, cookies, proxy
    fn common_args(&self, url: &str, config: &ExtractorConfig) -> Vec<String> {
        let mut args = Vec::new();

        if config.bypass_bot_detection && Self::is_youtube(url) {
            let mut extractor_args = format!("youtube:player_client={}", config.player_client);
            if let Some(token) = &config.po_token {
                extractor_args.push_str(&format!(";po_token={}", token));
            }
            args.push("--extractor-args".to_string());
            args.push(extractor_args);
        }

        if let Some(path) = &config.cookies_path {
            args.push("--cookies".to_string());
            args.push(path.clone());
        }

        if let Some(proxy) = &config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args
    }

    fn build_info_args(&self, url: &str, config: &ExtractorConfig) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            config.timeout_seconds.to_string(),
        ];
        args.extend(self.common_args(url, config));
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    fn build_transfer_args(
        &self,
        url: &str,
        itag: u32,
        dest: &Path,
        config: &ExtractorConfig,
    ) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            itag.to_string(),
            "--no-playlist".to_string(),
            "--newline".to_string(),
            "--force-overwrites".to_string(),
            "-o".to_string(),
            escape_output_template(&dest.to_string_lossy()),
        ];
        args.extend(self.common_args(url, config));
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Map yt-dlp's JSON dump to an extraction context.
    ///
    /// Only numeric format ids are itags; storyboards, DRC and
    /// language-suffixed variants are skipped.
    fn parse_info(url: &str, stdout: &[u8]) -> Result<ExtractedVideo, DownloadError> {
        let info: YtDlpInfo = serde_json::from_slice(stdout)
            .map_err(|e| DownloadError::Extraction(format!("Invalid yt-dlp JSON: {}", e)))?;

        let streams = info
            .formats
            .into_iter()
            .filter_map(|f| {
                let itag = f.format_id.parse::<u32>().ok()?;
                Some(StreamVariant {
                    itag,
                    ext: f.ext.unwrap_or_default(),
                    height: f.height,
                    vcodec: f.vcodec,
                    acodec: f.acodec,
                })
            })
            .collect();

        Ok(ExtractedVideo {
            url: url.to_string(),
            title: info.title.unwrap_or_else(|| "Unknown".to_string()),
            streams,
        })
    }

    fn log_diagnosis(stage: &str, stderr: &str) {
        if let Some(reason) = diagnose_error(stderr) {
            warn!(
                stage,
                reason = reason.description(),
                permanent = reason.is_permanent(),
                bypass_might_help = reason.bypass_might_help(),
                "yt-dlp failure diagnosed"
            );
        }
    }
}

/// Feed yt-dlp's stdout to `progress` until EOF and return how many lines
/// were recognised.
///
/// Lines are split on raw bytes and decoded lossily; yt-dlp prints paths in
/// the console encoding, which is not always UTF-8. The reader is consumed,
/// so the pipe is closed on return even after a read error.
async fn pump_progress<R>(stdout: R, progress: &ProgressEmitter) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    let mut recognised = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                if progress
                    .emit_line(line.trim_end_matches(['\r', '\n']))
                    .is_some()
                {
                    recognised += 1;
                }
            }
            Err(e) => {
                warn!("[yt-dlp] Stopped reading progress: {}", e);
                break;
            }
        }
    }

    recognised
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(
        &self,
        url: &str,
        config: &ExtractorConfig,
    ) -> Result<ExtractedVideo, DownloadError> {
        let args = self.build_info_args(url, config);
        debug!("[yt-dlp] {} {}", self.ytdlp_path, args.join(" "));

        let output = run_output_with_timeout(&self.ytdlp_path, args, config.timeout_seconds as u64)
            .await
            .map_err(|e| {
                Self::log_diagnosis("resolve", &e);
                DownloadError::Extraction(e)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Self::log_diagnosis("resolve", &stderr);
            return Err(DownloadError::Extraction(summarize_stderr(&stderr)));
        }

        let video = Self::parse_info(url, &output.stdout)?;
        info!(
            "[yt-dlp] Resolved '{}' with {} itag streams",
            video.title,
            video.streams.len()
        );
        Ok(video)
    }

    async fn transfer(
        &self,
        video: &ExtractedVideo,
        stream: &StreamVariant,
        dest: &Path,
        config: &ExtractorConfig,
        progress: &ProgressEmitter,
    ) -> Result<(), DownloadError> {
        let args = self.build_transfer_args(&video.url, stream.itag, dest, config);
        debug!("[yt-dlp] {} {}", self.ytdlp_path, args.join(" "));

        let mut child = TokioCommand::new(&self.ytdlp_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DownloadError::Transfer(format!("Failed to start {}: {}", self.ytdlp_path, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::Transfer("Failed to capture yt-dlp stdout".to_string()))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::Transfer("Failed to capture yt-dlp stderr".to_string()))?;

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr_pipe.read_to_end(&mut buf).await;
            buf
        });

        pump_progress(stdout, progress).await;

        let status = child
            .wait()
            .await
            .map_err(|e| DownloadError::Transfer(format!("Failed to wait for yt-dlp: {}", e)))?;
        let stderr = stderr_task.await.unwrap_or_default();

        if status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&stderr);
        Self::log_diagnosis("transfer", &stderr);
        let message = summarize_stderr(&stderr);
        Err(DownloadError::Transfer(if message.is_empty() {
            format!("yt-dlp exited with {}", status)
        } else {
            message
        }))
    }
}
