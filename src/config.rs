// Service configuration, read once from the environment at startup

use anyhow::{Context, Result};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::downloader::{DownloadLocation, ExtractorConfig};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    pub location: DownloadLocation,
    /// Explicit yt-dlp binary; auto-detected when absent
    pub ytdlp_path: Option<String>,
    pub extractor: ExtractorConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number between 0 and 65535, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let host = get("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .trim()
            .parse::<IpAddr>()
            .context("HOST must be an IPv4 or IPv6 address")?;

        let location = get("DOWNLOAD_DIR")
            .map(|dir| DownloadLocation::Fixed(PathBuf::from(dir)))
            .unwrap_or_default();

        let timeout = match get("YTDLP_INFO_TIMEOUT") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("YTDLP_INFO_TIMEOUT must be whole seconds, got {raw:?}"))?,
            None => ExtractorConfig::default().timeout_seconds,
        };
        if timeout == 0 {
            anyhow::bail!("YTDLP_INFO_TIMEOUT must be at least 1 second");
        }

        let extractor = ExtractorConfig::default()
            .with_proxy(get("YTDLP_PROXY"))
            .with_cookies_path(get("YTDLP_COOKIES"))
            .with_po_token(get("YTDLP_PO_TOKEN"))
            .with_player_client(get("YTDLP_PLAYER_CLIENT"))
            .with_timeout(timeout);

        Ok(Self {
            host,
            port,
            location,
            ytdlp_path: get("YTDLP_PATH"),
            extractor,
        })
    }

    pub fn listen_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ServiceConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.listen_addr().to_string(), "0.0.0.0:5000");
        assert_eq!(cfg.location, DownloadLocation::UserDownloads);
        assert!(cfg.ytdlp_path.is_none());
        assert!(cfg.extractor.bypass_bot_detection);
        assert_eq!(cfg.extractor.timeout_seconds, 30);
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("DOWNLOAD_DIR", "/srv/media"),
            ("YTDLP_PATH", "/opt/yt-dlp"),
            ("YTDLP_PO_TOKEN", "tok"),
            ("YTDLP_PLAYER_CLIENT", "mweb"),
            ("YTDLP_INFO_TIMEOUT", "45"),
        ])
        .unwrap();
        assert_eq!(cfg.listen_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.location, DownloadLocation::Fixed(PathBuf::from("/srv/media")));
        assert_eq!(cfg.ytdlp_path.as_deref(), Some("/opt/yt-dlp"));
        assert_eq!(cfg.extractor.po_token.as_deref(), Some("tok"));
        assert_eq!(cfg.extractor.player_client, "mweb");
        assert_eq!(cfg.extractor.timeout_seconds, 45);
    }

    #[test]
    fn empty_values_fall_back() {
        let cfg = config(&[("PORT", ""), ("DOWNLOAD_DIR", "  ")]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.location, DownloadLocation::UserDownloads);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = config(&[("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert!(config(&[("PORT", "70000")]).is_err());
        assert!(config(&[("HOST", "localhost")]).is_err());
    }

    #[test]
    fn zero_or_bad_timeout_is_rejected() {
        let err = config(&[("YTDLP_INFO_TIMEOUT", "0")]).unwrap_err();
        assert!(err.to_string().contains("YTDLP_INFO_TIMEOUT"));
        assert!(config(&[("YTDLP_INFO_TIMEOUT", "-5")]).is_err());
        assert!(config(&[("YTDLP_INFO_TIMEOUT", "1")]).is_ok());
    }
}
