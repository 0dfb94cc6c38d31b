// yt-dlp extractor - drives the native `yt-dlp` binary
//
// Metadata comes from `--dump-json`; downloads ask yt-dlp to print the
// final file path once post-processing and moves are done.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::downloader::config::ConverterConfig;
use crate::downloader::errors::ConvertError;
use crate::downloader::models::{DownloadRequest, StreamFormat};
use crate::downloader::tools::{find_tool, ToolType};
use crate::downloader::traits::Extractor;
use crate::downloader::utils::{parse_ytdlp_progress, run_process, ProcessOutput};

#[derive(Debug, Deserialize)]
struct DumpedInfo {
    #[serde(default)]
    formats: Vec<StreamFormat>,
}

/// CLI-based extractor using the yt-dlp binary
pub struct YtDlpCli {
    ytdlp_path: PathBuf,
    proxy: Option<String>,
    timeout: Option<Duration>,
}

impl YtDlpCli {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            ytdlp_path: find_tool(ToolType::YtDlp, config.ytdlp_path.as_deref()),
            proxy: config.proxy.clone(),
            timeout: config.timeout,
        }
    }

    fn push_common_args(&self, args: &mut Vec<String>, cookies: Option<&Path>) {
        if let Some(path) = cookies {
            args.push("--cookies".to_string());
            args.push(path.display().to_string());
        }

        if let Some(proxy) = &self.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }
    }

    /// Arguments for a metadata-only query
    pub fn build_info_args(&self, locator: &str, cookies: Option<&Path>) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
        ];
        self.push_common_args(&mut args, cookies);
        args.push(locator.to_string());
        args
    }

    /// Arguments for an actual download
    pub fn build_download_args(&self, request: &DownloadRequest) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            // --print implies --simulate
            "--no-simulate".to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "--progress".to_string(),
            "--newline".to_string(),
            "-f".to_string(),
            request.format.clone(),
            "-o".to_string(),
            request.output_template.clone(),
        ];

        if let Some(codec) = &request.extract_audio {
            args.push("-x".to_string());
            args.push("--audio-format".to_string());
            args.push(codec.clone());
        }

        if let Some(container) = &request.merge_format {
            args.push("--merge-output-format".to_string());
            args.push(container.clone());
        }

        self.push_common_args(&mut args, request.cookies.as_deref());
        args.push(request.locator.clone());
        args
    }

    async fn run(&self, args: Vec<String>) -> Result<ProcessOutput, ConvertError> {
        let output = run_process(ToolType::YtDlp, &self.ytdlp_path, &args, self.timeout).await?;
        if output.status.success() {
            return Ok(output);
        }
        debug!("yt-dlp stderr:\n{}", output.stderr_text());
        Err(ConvertError::Extraction(output.error_summary()))
    }

    /// Parse `--dump-json` output into stream formats
    pub fn parse_formats(stdout: &[String]) -> Result<Vec<StreamFormat>, ConvertError> {
        let json = stdout
            .iter()
            .rev()
            .find(|line| line.trim_start().starts_with('{'))
            .ok_or_else(|| ConvertError::Parse("yt-dlp printed no JSON".to_string()))?;

        let info: DumpedInfo = serde_json::from_str(json)
            .map_err(|e| ConvertError::Parse(format!("Invalid JSON: {}", e)))?;
        Ok(info.formats)
    }

    /// Final path from `--print after_move:filepath` output
    pub fn parse_reported_path(stdout: &[String]) -> Option<PathBuf> {
        stdout
            .iter()
            .rev()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && parse_ytdlp_progress(line).is_none())
            .find(|line| !line.starts_with('['))
            .map(PathBuf::from)
    }
}

#[async_trait]
impl Extractor for YtDlpCli {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract_formats(
        &self,
        locator: &str,
        cookies: Option<&Path>,
    ) -> Result<Vec<StreamFormat>, ConvertError> {
        let args = self.build_info_args(locator, cookies);
        let output = self.run(args).await?;
        let formats = Self::parse_formats(&output.stdout)?;
        debug!("yt-dlp reported {} formats for {}", formats.len(), locator);
        Ok(formats)
    }

    async fn download(&self, request: &DownloadRequest) -> Result<PathBuf, ConvertError> {
        let args = self.build_download_args(request);
        info!("downloading {} with format {}", request.locator, request.format);
        let output = self.run(args).await?;
        Self::parse_reported_path(&output.stdout).ok_or_else(|| {
            ConvertError::Extraction("yt-dlp did not report an output file".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(proxy: Option<&str>) -> YtDlpCli {
        let config = ConverterConfig::default()
            .with_ytdlp_path(Some(PathBuf::from("/opt/yt-dlp")))
            .with_proxy(proxy.map(str::to_string));
        YtDlpCli::new(&config)
    }

    #[test]
    fn test_info_args() {
        let ex = extractor(None);
        let args = ex.build_info_args("https://www.youtube.com/watch?v=abc123", None);
        assert_eq!(
            args,
            vec![
                "--dump-json",
                "--no-playlist",
                "--no-warnings",
                "https://www.youtube.com/watch?v=abc123"
            ]
        );
        assert_eq!(ex.ytdlp_path, PathBuf::from("/opt/yt-dlp"));
    }

    #[test]
    fn test_info_args_with_cookies_and_proxy() {
        let ex = extractor(Some("socks5://127.0.0.1:1080"));
        let args = ex.build_info_args("loc", Some(Path::new("/tmp/cookies.txt")));
        let joined = args.join(" ");
        assert!(joined.contains("--cookies /tmp/cookies.txt"));
        assert!(joined.contains("--proxy socks5://127.0.0.1:1080"));
        assert_eq!(args.last().unwrap(), "loc");
    }

    #[test]
    fn test_download_args_audio() {
        let request = DownloadRequest {
            locator: "loc".to_string(),
            format: "m4a/bestaudio/best".to_string(),
            output_template: "/tmp/out/%(id)s.%(ext)s".to_string(),
            extract_audio: Some("m4a".to_string()),
            merge_format: None,
            cookies: None,
        };
        let args = extractor(None).build_download_args(&request);
        let joined = args.join(" ");
        assert!(joined.contains("-f m4a/bestaudio/best"));
        assert!(joined.contains("-o /tmp/out/%(id)s.%(ext)s"));
        assert!(joined.contains("-x --audio-format m4a"));
        assert!(joined.contains("--print after_move:filepath"));
        assert!(!joined.contains("--merge-output-format"));
    }

    #[test]
    fn test_download_args_video() {
        let request = DownloadRequest {
            locator: "loc".to_string(),
            format: "bestvideo[height=720]+bestaudio/best".to_string(),
            output_template: "/tmp/out/%(id)s-%(resolution)s.%(ext)s".to_string(),
            extract_audio: None,
            merge_format: Some("mp4".to_string()),
            cookies: Some(PathBuf::from("/tmp/c.txt")),
        };
        let args = extractor(None).build_download_args(&request);
        let joined = args.join(" ");
        assert!(joined.contains("--merge-output-format mp4"));
        assert!(joined.contains("--cookies /tmp/c.txt"));
        assert!(!args.contains(&"-x".to_string()));
    }

    #[test]
    fn test_parse_formats() {
        let json = r#"{"id":"abc123","formats":[
            {"format_id":"140","ext":"m4a","vcodec":"none","acodec":"mp4a.40.2","height":null},
            {"format_id":"136","ext":"mp4","vcodec":"avc1.4d401f","acodec":"none","height":720},
            {"format_id":"sb0","ext":"mhtml","height":45}
        ]}"#
        .replace('\n', "");
        let formats = YtDlpCli::parse_formats(&[json]).unwrap();
        assert_eq!(formats.len(), 3);
        assert_eq!(formats[1].height, Some(720));
        assert!(formats[1].has_video());
        assert!(!formats[2].has_video());
    }

    #[test]
    fn test_parse_formats_without_json() {
        let err = YtDlpCli::parse_formats(&["nothing here".to_string()]).unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }

    #[test]
    fn test_reported_path_skips_progress() {
        let stdout = vec![
            "[download]  50.0% of 10.00MiB at 1.00MiB/s ETA 00:05".to_string(),
            "[download] 100% of 10.00MiB in 00:00:10 at 1.00MiB/s".to_string(),
            "/tmp/out/abc123-1280x720.mp4".to_string(),
            "".to_string(),
        ];
        assert_eq!(
            YtDlpCli::parse_reported_path(&stdout),
            Some(PathBuf::from("/tmp/out/abc123-1280x720.mp4"))
        );
        assert_eq!(YtDlpCli::parse_reported_path(&stdout[..2]), None);
    }
}
