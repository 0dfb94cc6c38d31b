use std::path::{Path, PathBuf};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolType {
    YtDlp,
    Ffmpeg,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "yt-dlp",
            ToolType::Ffmpeg => "ffmpeg",
        }
    }

    /// Environment variable that overrides discovery
    pub fn env_var(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "YTDLP_PATH",
            ToolType::Ffmpeg => "FFMPEG_PATH",
        }
    }
}

/// Find a tool binary.
///
/// Order: explicit override, the tool's environment variable, common install
/// locations, `PATH`. Falls back to the bare name so the spawn error names the
/// missing tool.
pub fn find_tool(tool: ToolType, override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        debug!("{} override: {}", tool.as_str(), path.display());
        return path.to_path_buf();
    }

    // e.g. export YTDLP_PATH="/path/to/venv/bin/yt-dlp"
    if let Some(path) = std::env::var_os(tool.env_var()).filter(|v| !v.is_empty()) {
        debug!("{} from {}: {:?}", tool.as_str(), tool.env_var(), path);
        return PathBuf::from(path);
    }

    let binary_name = tool.as_str();

    let common_paths = [
        format!("/opt/homebrew/bin/{}", binary_name), // Homebrew on Apple Silicon
        format!("/usr/local/bin/{}", binary_name),    // Homebrew on Intel Mac
        format!("/usr/bin/{}", binary_name),
    ];

    for path in common_paths {
        let candidate = PathBuf::from(path);
        if candidate.is_file() {
            debug!("found {} at {}", binary_name, candidate.display());
            return candidate;
        }
    }

    if let Some(found) = search_path_env(binary_name) {
        debug!("found {} on PATH at {}", binary_name, found.display());
        return found;
    }

    PathBuf::from(binary_name)
}

fn search_path_env(binary_name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(binary_name))
        .find(|candidate| candidate.is_file())
}
