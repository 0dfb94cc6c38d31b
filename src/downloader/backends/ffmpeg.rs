// ffmpeg transcoder - M4A (or any audio) to MP3

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::downloader::config::ConverterConfig;
use crate::downloader::errors::ConvertError;
use crate::downloader::tools::{find_tool, ToolType};
use crate::downloader::traits::Transcoder;
use crate::downloader::utils::run_process;

/// LAME VBR quality; 2 is roughly 190 kbps
const MP3_QUALITY: &str = "2";

pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegTranscoder {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            ffmpeg_path: find_tool(ToolType::Ffmpeg, config.ffmpeg_path.as_deref()),
            timeout: config.timeout,
        }
    }

    pub fn build_args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            // the MP3 name is deterministic, a rerun replaces the previous file
            "-y".to_string(),
            "-i".to_string(),
            input.display().to_string(),
            "-codec:a".to_string(),
            "libmp3lame".to_string(),
            "-q:a".to_string(),
            MP3_QUALITY.to_string(),
            output.display().to_string(),
        ]
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn transcode_audio(&self, input: &Path, output: &Path) -> Result<PathBuf, ConvertError> {
        info!("converting {} to {}", input.display(), output.display());
        let args = Self::build_args(input, output);

        let result = run_process(ToolType::Ffmpeg, &self.ffmpeg_path, &args, self.timeout).await?;
        if !result.status.success() {
            debug!("ffmpeg stderr:\n{}", result.stderr_text());
            return Err(ConvertError::Transcode {
                input: input.to_path_buf(),
                message: result.error_summary(),
            });
        }

        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_encoding_parameters() {
        let args = FfmpegTranscoder::build_args(
            Path::new("/tmp/out/abc123.m4a"),
            Path::new("/tmp/out/abc123.mp3"),
        );
        let joined = args.join(" ");
        assert!(joined.contains("-i /tmp/out/abc123.m4a"));
        assert!(joined.contains("-codec:a libmp3lame -q:a 2"));
        assert_eq!(args.last().unwrap(), "/tmp/out/abc123.mp3");
    }

    #[cfg(unix)]
    fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("ffmpeg");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_returns_output_path() {
        let dir = tempfile::tempdir().unwrap();
        // last argument is the output file
        let bin = fake_ffmpeg(dir.path(), r#"for last; do :; done; : > "$last""#);
        let config = ConverterConfig::default().with_ffmpeg_path(Some(bin));
        let transcoder = FfmpegTranscoder::new(&config);

        let input = dir.path().join("abc123.m4a");
        let output = dir.path().join("abc123.mp3");
        std::fs::write(&input, b"audio").unwrap();

        let produced = transcoder.transcode_audio(&input, &output).await.unwrap();
        assert_eq!(produced, output);
        assert!(output.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_transcode_error() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_ffmpeg(dir.path(), "echo 'abc123.m4a: Invalid data found' 1>&2; exit 1");
        let config = ConverterConfig::default().with_ffmpeg_path(Some(bin));
        let transcoder = FfmpegTranscoder::new(&config);

        let input = dir.path().join("abc123.m4a");
        let err = transcoder
            .transcode_audio(&input, &dir.path().join("abc123.mp3"))
            .await
            .unwrap_err();

        match err {
            ConvertError::Transcode { input: failed, message } => {
                assert_eq!(failed, input);
                assert!(message.contains("Invalid data"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_override_exits_as_transcoder() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConverterConfig::default()
            .with_ffmpeg_path(Some(dir.path().join("bin").join("avconv")));
        let transcoder = FfmpegTranscoder::new(&config);

        let err = transcoder
            .transcode_audio(&dir.path().join("abc123.m4a"), &dir.path().join("abc123.mp3"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConvertError::ToolNotFound { tool: ToolType::Ffmpeg, .. }
        ));
        assert_eq!(err.exit_code(), 3);
    }
}
