pub mod cli;
pub mod downloader;
pub mod logging;

use cli::Cli;
use downloader::orchestrator::validate_output_dir;
use downloader::{ConvertError, Converter, Outcome};

/// Run one invocation with the real yt-dlp and ffmpeg backends
pub async fn run(cli: &Cli) -> Result<Outcome, ConvertError> {
    let request = cli.request();
    // fail before any tool lookup
    validate_output_dir(&request.output_dir)?;

    let converter = Converter::from_config(&cli.config());
    converter.run(&request).await
}
