// Cookies file lookup for authenticated yt-dlp requests

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Conventional cookies file, relative to the working directory
pub const DEFAULT_COOKIES_FILE: &str = "cookies.txt";

const MIN_COOKIES_SIZE: u64 = 512;
const MAX_COOKIES_SIZE: u64 = 2 * 1024 * 1024;

/// Pick the cookies file to pass to yt-dlp.
///
/// A user-supplied path wins when it exists, then `default_path`, otherwise
/// no cookies are used.
pub fn locate_credentials(user_path: Option<&Path>, default_path: &Path) -> Option<PathBuf> {
    if let Some(path) = user_path {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        warn!(path = %path.display(), "cookies file not found, trying default");
    }

    if default_path.is_file() {
        return Some(default_path.to_path_buf());
    }

    debug!(path = %default_path.display(), "no cookies file, continuing without credentials");
    None
}

/// Metadata about a cookies file on disk
#[derive(Debug, Clone)]
pub struct CookiesInfo {
    pub absolute_path: PathBuf,
    pub size_bytes: u64,
    pub last_modified: Option<SystemTime>,
}

impl CookiesInfo {
    pub fn inspect(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let absolute_path = std::fs::canonicalize(path)?;
        Ok(Self {
            absolute_path,
            size_bytes: metadata.len(),
            last_modified: metadata.modified().ok(),
        })
    }

    /// Last-modified time as RFC 3339, when the platform reports it
    pub fn last_modified_rfc3339(&self) -> Option<String> {
        self.last_modified
            .map(OffsetDateTime::from)
            .and_then(|t| t.format(&Rfc3339).ok())
    }

    /// Reasons this file looks unlike an exported cookies.txt
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.absolute_path.extension().and_then(|e| e.to_str()) != Some("txt") {
            warnings.push("cookies file should have a .txt extension".to_string());
        }
        if self.size_bytes < MIN_COOKIES_SIZE || self.size_bytes > MAX_COOKIES_SIZE {
            warnings.push(format!(
                "cookies file is {} bytes, expected between {} and {}",
                self.size_bytes, MIN_COOKIES_SIZE, MAX_COOKIES_SIZE
            ));
        }
        warnings
    }
}

/// Log what we know about the chosen cookies file
pub fn report_credentials(path: &Path) {
    match CookiesInfo::inspect(path) {
        Ok(info) => {
            info!(
                path = %info.absolute_path.display(),
                size = info.size_bytes,
                modified = info.last_modified_rfc3339().as_deref().unwrap_or("unknown"),
                "using cookies file"
            );
            for warning in info.warnings() {
                warn!("{}", warning);
            }
        }
        Err(e) => warn!(path = %path.display(), "cannot inspect cookies file: {}", e),
    }
}
