// Orchestrator - one request from validated arguments to a printed result

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::backends::FfmpegTranscoder;
use super::config::ConverterConfig;
use super::credentials::{locate_credentials, report_credentials, DEFAULT_COOKIES_FILE};
use super::errors::ConvertError;
use super::extractors::YtDlpCli;
use super::format_selector::{
    audio_output_template, available_resolutions, video_format_spec, video_output_template,
    AUDIO_FORMAT_SPEC, FINAL_AUDIO_EXT, INTERMEDIATE_AUDIO_EXT, VIDEO_CONTAINER,
};
use super::locator::resolve_locator;
use super::models::{DownloadRequest, Mode, Outcome, Request, ResolutionSet};
use super::traits::{Extractor, Transcoder};

/// The output directory must be absolute and exist before anything runs
pub fn validate_output_dir(path: &Path) -> Result<(), ConvertError> {
    let reason = if !path.is_absolute() {
        "path is not absolute"
    } else if !path.exists() {
        "path does not exist"
    } else if !path.is_dir() {
        "path is not a directory"
    } else {
        return Ok(());
    };

    Err(ConvertError::InvalidOutputDir {
        path: path.to_path_buf(),
        reason,
    })
}

pub struct Converter {
    extractor: Box<dyn Extractor>,
    transcoder: Box<dyn Transcoder>,
    default_cookies_path: PathBuf,
}

impl Converter {
    pub fn new(extractor: Box<dyn Extractor>, transcoder: Box<dyn Transcoder>) -> Self {
        Self {
            extractor,
            transcoder,
            default_cookies_path: PathBuf::from(DEFAULT_COOKIES_FILE),
        }
    }

    /// yt-dlp and ffmpeg as configured
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(
            Box::new(YtDlpCli::new(config)),
            Box::new(FfmpegTranscoder::new(config)),
        )
        .with_default_cookies_path(config.default_cookies_path.clone())
    }

    pub fn with_default_cookies_path(mut self, path: PathBuf) -> Self {
        self.default_cookies_path = path;
        self
    }

    pub async fn run(&self, request: &Request) -> Result<Outcome, ConvertError> {
        validate_output_dir(&request.output_dir)?;

        if request.identifier.is_empty() {
            return Err(ConvertError::InvalidArguments(
                "Please provide a video ID".to_string(),
            ));
        }

        let locator = resolve_locator(&request.identifier);
        let cookies = locate_credentials(request.cookies.as_deref(), &self.default_cookies_path);
        if let Some(path) = &cookies {
            report_credentials(path);
        }
        let cookies = cookies.as_deref();

        info!(
            "{} mode for {} using {} and {}",
            request.mode,
            locator,
            self.extractor.name(),
            self.transcoder.name()
        );

        match (request.mode, request.resolution.as_deref()) {
            (Mode::Audio, _) => {
                if request.resolution.is_some() {
                    warn!("--resolution is ignored in audio mode");
                }
                let path = self
                    .fetch_audio_as_mp3(&locator, &request.output_dir, &request.identifier, cookies)
                    .await?;
                Ok(Outcome::Saved(path))
            }
            (Mode::Video, None) => {
                let set = self.list_available_resolutions(&locator, cookies).await?;
                Ok(Outcome::Resolutions(set))
            }
            (Mode::Video, Some(resolution)) => {
                let path = self
                    .fetch_video(&locator, resolution, &request.output_dir, cookies)
                    .await?;
                Ok(Outcome::Saved(path))
            }
        }
    }

    /// Heights of every video-carrying stream, deduplicated and ascending
    pub async fn list_available_resolutions(
        &self,
        locator: &str,
        cookies: Option<&Path>,
    ) -> Result<ResolutionSet, ConvertError> {
        let formats = self.extractor.extract_formats(locator, cookies).await?;
        let set = available_resolutions(&formats);
        debug!("{} distinct resolutions out of {} formats", set.len(), formats.len());
        Ok(set)
    }

    /// Download the best audio as M4A; returns where it is expected to land
    pub async fn fetch_audio(
        &self,
        locator: &str,
        output_dir: &Path,
        identifier: &str,
        cookies: Option<&Path>,
    ) -> Result<PathBuf, ConvertError> {
        let request = DownloadRequest {
            locator: locator.to_string(),
            format: AUDIO_FORMAT_SPEC.to_string(),
            output_template: audio_output_template(output_dir),
            extract_audio: Some(INTERMEDIATE_AUDIO_EXT.to_string()),
            merge_format: None,
            cookies: cookies.map(Path::to_path_buf),
        };

        let reported = self.extractor.download(&request).await?;
        let expected = output_dir.join(format!("{}.{}", identifier, INTERMEDIATE_AUDIO_EXT));
        if reported != expected {
            debug!(
                "backend reported {}, continuing with {}",
                reported.display(),
                expected.display()
            );
        }
        Ok(expected)
    }

    /// Download video at exactly `resolution`, merged with the best audio
    pub async fn fetch_video(
        &self,
        locator: &str,
        resolution: &str,
        output_dir: &Path,
        cookies: Option<&Path>,
    ) -> Result<PathBuf, ConvertError> {
        let available = self.list_available_resolutions(locator, cookies).await?;
        let Some(chosen) = available.contains_label(resolution) else {
            return Err(ConvertError::ResolutionUnavailable {
                requested: resolution.to_string(),
                available: available.to_string(),
            });
        };

        info!("downloading video {} with resolution {}", locator, chosen);
        let request = DownloadRequest {
            locator: locator.to_string(),
            format: video_format_spec(chosen),
            output_template: video_output_template(output_dir),
            extract_audio: None,
            merge_format: Some(VIDEO_CONTAINER.to_string()),
            cookies: cookies.map(Path::to_path_buf),
        };

        self.extractor.download(&request).await
    }

    /// Convert the intermediate to MP3 and remove it once that succeeded
    pub async fn transcode_audio(&self, input: &Path, output: &Path) -> Result<PathBuf, ConvertError> {
        let converted = self.transcoder.transcode_audio(input, output).await?;

        match tokio::fs::remove_file(input).await {
            Ok(()) => debug!("removed intermediate {}", input.display()),
            Err(e) => warn!("could not remove intermediate {}: {}", input.display(), e),
        }

        Ok(converted)
    }

    async fn fetch_audio_as_mp3(
        &self,
        locator: &str,
        output_dir: &Path,
        identifier: &str,
        cookies: Option<&Path>,
    ) -> Result<PathBuf, ConvertError> {
        let intermediate = self
            .fetch_audio(locator, output_dir, identifier, cookies)
            .await?;
        let mp3 = output_dir.join(format!("{}.{}", identifier, FINAL_AUDIO_EXT));
        self.transcode_audio(&intermediate, &mp3).await
    }
}
