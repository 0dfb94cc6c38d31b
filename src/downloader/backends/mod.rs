// Transcoder backends

mod ffmpeg;

pub use ffmpeg::FfmpegTranscoder;
