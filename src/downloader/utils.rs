// Helpers shared by the yt-dlp and ffmpeg backends

use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::debug;

use super::errors::ConvertError;
use super::tools::ToolType;

/// Captured result of a finished child process
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl ProcessOutput {
    pub fn stderr_text(&self) -> String {
        self.stderr.join("\n")
    }

    /// Most useful part of stderr for a one-line report
    pub fn error_summary(&self) -> String {
        let errors: Vec<&str> = self
            .stderr
            .iter()
            .map(|l| l.trim())
            .filter(|l| l.starts_with("ERROR:"))
            .collect();

        if !errors.is_empty() {
            return errors.join(" | ");
        }

        self.stderr
            .iter()
            .rev()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("exited with {}", self.status))
    }
}

/// Run a program to completion, streaming its output into memory.
///
/// Without a limit the call waits indefinitely. With one, the child is
/// killed once the limit passes. Failures to start or finish in time are
/// attributed to `tool`.
pub async fn run_process(
    tool: ToolType,
    program: &Path,
    args: &[String],
    limit: Option<Duration>,
) -> Result<ProcessOutput, ConvertError> {
    let program_name = program.display().to_string();
    debug!("running {} {}", program_name, args.join(" "));

    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConvertError::ToolNotFound {
                tool,
                path: program.to_path_buf(),
            },
            _ => ConvertError::Io(io::Error::new(
                e.kind(),
                format!("Failed to start {}: {}", program_name, e),
            )),
        })?;

    let stdout_pipe = child.stdout.take().ok_or_else(|| capture_error(&program_name, "stdout"))?;
    let stderr_pipe = child.stderr.take().ok_or_else(|| capture_error(&program_name, "stderr"))?;

    let stdout_task = tokio::spawn(collect_lines(stdout_pipe));
    let stderr_task = tokio::spawn(collect_lines(stderr_pipe));

    let status = match limit {
        Some(limit) => match timeout(limit, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                debug!("killed {} after {:?}", program_name, limit);
                return Err(ConvertError::Timeout { tool, limit });
            }
        },
        None => child.wait().await?,
    };

    let stdout = stdout_task
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;
    let stderr = stderr_task
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;

    debug!("{} finished with {}", program_name, status);
    Ok(ProcessOutput { status, stdout, stderr })
}

fn capture_error(program: &str, stream: &str) -> ConvertError {
    ConvertError::Io(io::Error::new(
        io::ErrorKind::Other,
        format!("Failed to capture {} from {}", stream, program),
    ))
}

async fn collect_lines<R: AsyncRead + Unpin>(reader: R) -> io::Result<Vec<String>> {
    let mut segments = BufReader::new(reader).split(b'\n');
    let mut lines = Vec::new();
    while let Some(segment) = segments.next_segment().await? {
        let line = String::from_utf8_lossy(&segment)
            .trim_end_matches('\r')
            .to_string();
        if let Some((percent, status)) = parse_ytdlp_progress(&line) {
            debug!(percent, "{}", status);
        }
        lines.push(line);
    }
    Ok(lines)
}

/// Parse yt-dlp progress line like:
/// [download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32 (frag 29/454)
/// Returns (percent, status_string)
pub fn parse_ytdlp_progress(line: &str) -> Option<(f32, String)> {
    lazy_static::lazy_static! {
        static ref PROGRESS_RE: Regex = Regex::new(
            r"\[download\]\s+(\d+\.?\d*)%\s+of\s+~?\s*(\d+\.?\d*\s*\w+)(?:\s+at\s+(\S+\s*\w*/s))?(?:\s+ETA\s+(\S+))?"
        ).unwrap();
        static ref DEST_RE: Regex = Regex::new(r"\[download\]\s+Destination:\s+(.+)").unwrap();
        static ref MERGE_RE: Regex = Regex::new(r"\[Merger?\]\s+Merging").unwrap();
        static ref EXTRACT_RE: Regex = Regex::new(r"\[ExtractAudio\]\s+Destination:\s+(.+)").unwrap();
    }

    if let Some(caps) = PROGRESS_RE.captures(line) {
        let percent: f32 = caps.get(1)?.as_str().parse().ok()?;
        let size = caps.get(2).map(|m| m.as_str()).unwrap_or("?");
        let status = match (caps.get(3), caps.get(4)) {
            (Some(speed), Some(eta)) => {
                format!("{:.1}% of {} at {} ETA {}", percent, size, speed.as_str(), eta.as_str())
            }
            (Some(speed), None) => format!("{:.1}% of {} at {}", percent, size, speed.as_str()),
            _ => format!("{:.1}% of {}", percent, size),
        };
        return Some((percent, status));
    }

    if let Some(caps) = DEST_RE.captures(line) {
        let filename = caps.get(1).map(|m| m.as_str()).unwrap_or("file");
        return Some((0.0, format!("downloading to {}", filename)));
    }

    if MERGE_RE.is_match(line) {
        return Some((99.0, "merging video and audio".to_string()));
    }

    if let Some(caps) = EXTRACT_RE.captures(line) {
        let filename = caps.get(1).map(|m| m.as_str()).unwrap_or("file");
        return Some((100.0, format!("extracting audio to {}", filename)));
    }

    None
}
