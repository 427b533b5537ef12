// Download target resolution - where finished files land
//
// Windows: %USERPROFILE%\Downloads
// Everything else: $HOME/Downloads
//
// The directory is recomputed for every request and created on demand.

use std::ffi::OsString;
use std::path::PathBuf;

use tracing::info;

use super::errors::DownloadError;
use super::models::ResolvedTarget;

/// Host family, as far as the Downloads location is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Environment variable holding the user's home directory
    pub fn home_var(&self) -> &'static str {
        match self {
            Self::Windows => "USERPROFILE",
            Self::Unix => "HOME",
        }
    }
}

/// Where downloads go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadLocation {
    /// `<home>/Downloads` for the current user
    #[default]
    UserDownloads,
    /// A fixed directory (DOWNLOAD_DIR)
    Fixed(PathBuf),
}

impl DownloadLocation {
    /// Resolve the directory and make sure it exists.
    pub fn resolve(&self) -> Result<ResolvedTarget, DownloadError> {
        let dir = match self {
            Self::UserDownloads => {
                downloads_dir_for(Platform::current(), |key| std::env::var_os(key))?
            }
            Self::Fixed(path) => path.clone(),
        };
        ensure_dir(dir)
    }
}

/// `<home>/Downloads` using the platform's home variable.
///
/// Unset and empty values are both treated as missing.
pub fn downloads_dir_for<F>(platform: Platform, lookup: F) -> Result<PathBuf, DownloadError>
where
    F: Fn(&str) -> Option<OsString>,
{
    let var = platform.home_var();
    let home = lookup(var)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            DownloadError::Environment(format!(
                "{} is not set; cannot locate the Downloads folder",
                var
            ))
        })?;

    Ok(PathBuf::from(home).join("Downloads"))
}

fn ensure_dir(dir: PathBuf) -> Result<ResolvedTarget, DownloadError> {
    let exists = dir.is_dir();
    if !exists {
        std::fs::create_dir_all(&dir).map_err(|e| {
            DownloadError::Environment(format!(
                "Failed to create download directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        info!(path = %dir.display(), "Created download directory");
    }

    Ok(ResolvedTarget {
        directory_path: dir,
        exists,
    })
}
