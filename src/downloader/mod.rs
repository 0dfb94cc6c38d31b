// Downloader module - yt-dlp extraction, ffmpeg conversion and the glue between them

pub mod backends;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod locator;
pub mod models;
pub mod orchestrator;
pub mod tools;
pub mod traits;
pub mod utils;

pub use config::ConverterConfig;
pub use errors::ConvertError;
pub use models::{Mode, Outcome, Request, Resolution, ResolutionSet, StreamFormat};
pub use orchestrator::Converter;
pub use traits::{Extractor, Transcoder};
