// Error types for the converter pipeline

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::extractors::diagnose_error;
use super::tools::ToolType;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Output directory is relative or missing
    #[error("Please provide a valid and absolute output path: {} ({reason})", .path.display())]
    InvalidOutputDir { path: PathBuf, reason: &'static str },

    /// Missing or malformed command-line input
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Requested resolution is not offered for this video
    #[error("Resolution {requested} not available. Available resolutions: {available}")]
    ResolutionUnavailable { requested: String, available: String },

    /// yt-dlp or ffmpeg not found in system
    #[error("Tool not found: {} ({})", .tool.as_str(), .path.display())]
    ToolNotFound { tool: ToolType, path: PathBuf },

    /// yt-dlp exited with an error
    #[error("Error downloading video: {}{}", .0, extraction_hint(.0))]
    Extraction(String),

    /// ffmpeg exited with a non-zero status
    #[error("Error converting {} to MP3: {message}", .input.display())]
    Transcode { input: PathBuf, message: String },

    /// Failed to parse yt-dlp JSON output
    #[error("Parse error: {0}")]
    Parse(String),

    /// Child process exceeded the configured limit
    #[error("{} timed out after {}s", .tool.as_str(), .limit.as_secs())]
    Timeout { tool: ToolType, limit: Duration },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidOutputDir { .. }
            | Self::InvalidArguments(_)
            | Self::ResolutionUnavailable { .. }
            | Self::Io(_) => 1,
            Self::Extraction(_) | Self::Parse(_) => 2,
            Self::Transcode { .. } => 3,
            Self::ToolNotFound { tool, .. } | Self::Timeout { tool, .. } => match tool {
                ToolType::YtDlp => 2,
                ToolType::Ffmpeg => 3,
            },
        }
    }
}

fn extraction_hint(stderr: &str) -> String {
    match diagnose_error(stderr).and_then(|reason| reason.hint()) {
        Some(hint) => format!("\nHint: {}", hint),
        None => String::new(),
    }
}
