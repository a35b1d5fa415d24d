//! FFmpeg Integration Module
//!
//! Drives the external encoder for fragment output:
//! - Subtitle conversion (SRT → ASS)
//! - Fragment cutting with burned-in subtitles
//!
//! Uses an explicitly configured binary or a system-installed FFmpeg.

mod detection;
mod runner;

pub use detection::*;
pub use runner::{cut_args, escape_filter_path, subtitle_args, FFmpegRunner};

/// FFmpeg-related error types
#[derive(Debug, thiserror::Error)]
pub enum FFmpegError {
    #[error("FFmpeg not found. Please install FFmpeg or set video.ffmpegPath in the settings.")]
    NotFound,

    #[error("FFmpeg execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid input file: {0}")]
    InvalidInput(String),

    #[error("Output path error: {0}")]
    OutputError(String),

    #[error("Process error: {0}")]
    ProcessError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type FFmpegResult<T> = Result<T, FFmpegError>;
