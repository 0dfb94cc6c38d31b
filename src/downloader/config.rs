// Runtime configuration shared by the backends

use std::path::PathBuf;
use std::time::Duration;

use super::credentials::DEFAULT_COOKIES_FILE;

#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Explicit yt-dlp binary; discovered when unset
    pub ytdlp_path: Option<PathBuf>,
    /// Explicit ffmpeg binary; discovered when unset
    pub ffmpeg_path: Option<PathBuf>,
    /// Proxy URL passed through to yt-dlp
    pub proxy: Option<String>,
    /// Per-process limit; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Cookies file tried when the user does not name one
    pub default_cookies_path: PathBuf,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            ffmpeg_path: None,
            proxy: None,
            timeout: None,
            default_cookies_path: PathBuf::from(DEFAULT_COOKIES_FILE),
        }
    }
}

impl ConverterConfig {
    pub fn with_ytdlp_path(mut self, path: Option<PathBuf>) -> Self {
        self.ytdlp_path = path;
        self
    }

    pub fn with_ffmpeg_path(mut self, path: Option<PathBuf>) -> Self {
        self.ffmpeg_path = path;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.filter(|s| *s > 0).map(Duration::from_secs);
        self
    }

    pub fn with_default_cookies_path(mut self, path: PathBuf) -> Self {
        self.default_cookies_path = path;
        self
    }
}
