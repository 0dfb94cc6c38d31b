// Command-line surface

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::downloader::locator::normalize_identifier;
use crate::downloader::{ConverterConfig, Mode, Request};

/// Command-line arguments for yt-converter
#[derive(Parser, Debug)]
#[command(name = "yt-converter")]
#[command(version)]
#[command(about = "Download a video by id and optionally convert it to MP3")]
#[command(long_about = "Downloads a video with yt-dlp and, in audio mode, converts it to MP3 with ffmpeg.\n\
    The path of the produced file is printed on standard output.\n\n\
    EXAMPLES:\n    \
    yt-converter dQw4w9WgXcQ audio /srv/media\n    \
    yt-converter dQw4w9WgXcQ video /srv/media              # list resolutions\n    \
    yt-converter dQw4w9WgXcQ video /srv/media -r 720p\n    \
    yt-converter https://youtu.be/dQw4w9WgXcQ video /srv/media -r 1080p --cookies cookies.txt")]
pub struct Cli {
    /// Video id or watch URL
    pub identifier: String,

    /// audio (MP3) or video (MP4 at a given resolution)
    #[arg(value_enum)]
    pub mode: Mode,

    /// Existing absolute directory to write into
    pub output_dir: PathBuf,

    /// Resolution to download in video mode (e.g. 720p); omit to list what is available
    #[arg(short, long)]
    pub resolution: Option<String>,

    /// cookies.txt passed to yt-dlp; ./cookies.txt is used when present
    #[arg(short, long, env = "YT_CONVERTER_COOKIES", value_name = "PATH")]
    pub cookies: Option<PathBuf>,

    /// Proxy URL for yt-dlp (e.g. socks5://127.0.0.1:1080)
    #[arg(long)]
    pub proxy: Option<String>,

    /// Kill yt-dlp or ffmpeg after this many seconds (default: wait indefinitely)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// yt-dlp binary (also YTDLP_PATH)
    #[arg(long = "yt-dlp", value_name = "PATH")]
    pub ytdlp: Option<PathBuf>,

    /// ffmpeg binary (also FFMPEG_PATH)
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn request(&self) -> Request {
        Request {
            identifier: normalize_identifier(&self.identifier),
            mode: self.mode,
            output_dir: self.output_dir.clone(),
            resolution: self.resolution.clone(),
            cookies: self.cookies.clone(),
        }
    }

    pub fn config(&self) -> ConverterConfig {
        ConverterConfig::default()
            .with_ytdlp_path(self.ytdlp.clone())
            .with_ffmpeg_path(self.ffmpeg.clone())
            .with_proxy(self.proxy.clone())
            .with_timeout(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["yt-converter", "abc123", "audio", "/tmp/out"]).unwrap();
        let request = cli.request();
        assert_eq!(request.identifier, "abc123");
        assert_eq!(request.mode, Mode::Audio);
        assert_eq!(request.output_dir, PathBuf::from("/tmp/out"));
        assert!(request.resolution.is_none());
    }

    #[test]
    fn test_video_flags() {
        let cli = Cli::try_parse_from([
            "yt-converter",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "video",
            "/tmp/out",
            "-r",
            "720p",
            "--timeout",
            "60",
            "--proxy",
            "socks5://127.0.0.1:1080",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let request = cli.request();
        assert_eq!(request.identifier, "dQw4w9WgXcQ");
        assert_eq!(request.resolution.as_deref(), Some("720p"));
        let config = cli.config();
        assert_eq!(config.timeout.map(|t| t.as_secs()), Some(60));
        assert!(config.proxy.is_some());
    }

    #[test]
    fn test_rejects_unknown_mode_and_missing_args() {
        assert!(Cli::try_parse_from(["yt-converter", "abc123", "podcast", "/tmp/out"]).is_err());
        assert!(Cli::try_parse_from(["yt-converter", "abc123", "audio"]).is_err());
    }
}
