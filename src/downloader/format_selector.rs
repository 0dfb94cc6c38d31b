// Format selection - what yt-dlp is asked for in each mode

use std::path::Path;

use super::models::{Resolution, ResolutionSet, StreamFormat};

/// Prefer a native M4A stream, then any best audio, then the best combined stream
pub const AUDIO_FORMAT_SPEC: &str = "m4a/bestaudio/best";

/// Codec yt-dlp extracts the audio into before ffmpeg sees it
pub const INTERMEDIATE_AUDIO_EXT: &str = "m4a";

pub const FINAL_AUDIO_EXT: &str = "mp3";

/// Container for merged video+audio downloads
pub const VIDEO_CONTAINER: &str = "mp4";

/// Distinct heights of every stream that carries video
pub fn available_resolutions(formats: &[StreamFormat]) -> ResolutionSet {
    formats
        .iter()
        .filter(|f| f.has_video())
        .filter_map(|f| f.height)
        .filter(|h| *h > 0)
        .map(Resolution)
        .collect()
}

/// Exact height plus best audio, falling back to the best single file
pub fn video_format_spec(resolution: Resolution) -> String {
    format!("bestvideo[height={}]+bestaudio/best", resolution.height())
}

pub fn audio_output_template(output_dir: &Path) -> String {
    output_dir.join("%(id)s.%(ext)s").display().to_string()
}

pub fn video_output_template(output_dir: &Path) -> String {
    output_dir
        .join("%(id)s-%(resolution)s.%(ext)s")
        .display()
        .to_string()
}
