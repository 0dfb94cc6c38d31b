// Extraction backend - video info and downloads via yt-dlp
//
// yt-dlp is driven as an external process. `diagnostics` turns its error
// text into a short hint for the printed diagnostic.

mod cli;
mod diagnostics;

pub use cli::YtDlpCli;
pub use diagnostics::{diagnose_error, BlockingReason};
