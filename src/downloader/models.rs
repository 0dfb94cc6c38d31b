// Common data models for the converter

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

/// What the user wants out of the video
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Best audio stream, converted to MP3
    Audio,
    /// Video at an exact height, merged with the best audio
    Video,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Vertical resolution label such as "720p"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resolution(pub u32);

impl Resolution {
    pub fn height(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.0)
    }
}

impl FromStr for Resolution {
    type Err = String;

    /// Only the canonical label is accepted: "0720p" and "+720p" are rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_suffix('p')
            .and_then(|digits| digits.parse::<u32>().ok())
            .map(Resolution)
            .filter(|r| r.to_string() == s)
            .ok_or_else(|| format!("'{}' is not a resolution label like 720p", s))
    }
}

/// Distinct resolutions offered for a video, ascending by height
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSet(BTreeSet<Resolution>);

impl ResolutionSet {
    /// Membership check on the raw user label; unparseable labels never match
    pub fn contains_label(&self, label: &str) -> Option<Resolution> {
        label
            .parse::<Resolution>()
            .ok()
            .filter(|r| self.0.contains(r))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(Resolution::to_string).collect()
    }
}

impl FromIterator<Resolution> for ResolutionSet {
    fn from_iter<I: IntoIterator<Item = Resolution>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Renders as a JSON array, e.g. `["360p","720p"]`
impl fmt::Display for ResolutionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self.labels();
        let json = serde_json::to_string(&labels).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// One stream as reported by `yt-dlp --dump-json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamFormat {
    #[serde(default)]
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    /// Video height in pixels
    #[serde(default)]
    pub height: Option<u32>,
    /// Video codec (avc1, vp9, av01, none)
    #[serde(default)]
    pub vcodec: Option<String>,
    /// Audio codec (mp4a, opus, none)
    #[serde(default)]
    pub acodec: Option<String>,
}

impl StreamFormat {
    /// Whether the stream carries a video track
    pub fn has_video(&self) -> bool {
        self.vcodec
            .as_deref()
            .map_or(false, |v| !v.is_empty() && v != "none")
    }
}

/// Validated request for one invocation
#[derive(Debug, Clone)]
pub struct Request {
    pub identifier: String,
    pub mode: Mode,
    pub output_dir: PathBuf,
    pub resolution: Option<String>,
    pub cookies: Option<PathBuf>,
}

/// What the extraction backend is asked to download
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub locator: String,
    /// yt-dlp format expression
    pub format: String,
    /// yt-dlp output template (absolute)
    pub output_template: String,
    /// Re-encode extracted audio into this codec (`-x --audio-format`)
    pub extract_audio: Option<String>,
    /// Container for merged video+audio (`--merge-output-format`)
    pub merge_format: Option<String>,
    pub cookies: Option<PathBuf>,
}

/// Final result of a successful invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Path of the produced file
    Saved(PathBuf),
    /// Resolutions listed instead of downloading
    Resolutions(ResolutionSet),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(path) => write!(f, "{}", path.display()),
            Self::Resolutions(set) => write!(f, "{}", set),
        }
    }
}
