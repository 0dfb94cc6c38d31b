// Seams to the two external tools

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::errors::ConvertError;
use super::models::{DownloadRequest, StreamFormat};

/// Video-extraction backend (yt-dlp)
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// List every stream the backend knows for this locator, without downloading
    async fn extract_formats(
        &self,
        locator: &str,
        cookies: Option<&Path>,
    ) -> Result<Vec<StreamFormat>, ConvertError>;

    /// Download according to `request`; returns the path the backend reports
    async fn download(&self, request: &DownloadRequest) -> Result<PathBuf, ConvertError>;
}

/// Media transcoder (ffmpeg)
#[async_trait]
pub trait Transcoder: Send + Sync {
    fn name(&self) -> &'static str;

    /// Convert `input` to MP3 at `output`
    async fn transcode_audio(&self, input: &Path, output: &Path) -> Result<PathBuf, ConvertError>;
}
