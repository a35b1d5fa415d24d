//! FFmpeg Runner Module
//!
//! Executes the two encoder calls the fragment driver needs. Argument lists
//! are built by pure functions so they can be checked without an encoder.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use tracing::debug;

use super::{FFmpegError, FFmpegInfo, FFmpegResult};
use crate::core::{format_seconds, TimeMs};

/// Escapes a path for use inside a quoted filter argument (`ass='<path>'`)
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace('\'', "'\\''")
        .replace(':', "\\:")
}

/// `-i <srt> <ass> -y -loglevel <n>`
pub fn subtitle_args(srt: &Path, ass: &Path, log_level: u8) -> Vec<OsString> {
    vec![
        "-i".into(),
        srt.as_os_str().to_owned(),
        ass.as_os_str().to_owned(),
        "-y".into(),
        "-loglevel".into(),
        log_level.to_string().into(),
    ]
}

/// `-ss <start> -i <video> -t <duration> -vf ass='<ass>' <output> -y -loglevel <n>`
///
/// `-ss` comes before `-i` so the encoder seeks without decoding the
/// preceding part of the video.
pub fn cut_args(
    video: &Path,
    start_ms: TimeMs,
    duration_ms: TimeMs,
    ass: &Path,
    output: &Path,
    log_level: u8,
) -> Vec<OsString> {
    vec![
        "-ss".into(),
        format_seconds(start_ms).into(),
        "-i".into(),
        video.as_os_str().to_owned(),
        "-t".into(),
        format_seconds(duration_ms).into(),
        "-vf".into(),
        format!("ass='{}'", escape_filter_path(ass)).into(),
        output.as_os_str().to_owned(),
        "-y".into(),
        "-loglevel".into(),
        log_level.to_string().into(),
    ]
}

/// Runs FFmpeg for subtitle conversion and fragment cutting
#[derive(Debug, Clone)]
pub struct FFmpegRunner {
    info: Arc<FFmpegInfo>,
    log_level: u8,
}

impl FFmpegRunner {
    pub fn new(info: FFmpegInfo, log_level: u8) -> Self {
        Self {
            info: Arc::new(info),
            log_level,
        }
    }

    pub fn info(&self) -> &FFmpegInfo {
        &self.info
    }

    /// Converts an SRT file to ASS
    pub async fn convert_subtitles(&self, srt: &Path, ass: &Path) -> FFmpegResult<()> {
        if !srt.exists() {
            return Err(FFmpegError::InvalidInput(format!(
                "Subtitle file does not exist: {}",
                srt.display()
            )));
        }
        ensure_parent(ass)?;

        self.run(subtitle_args(srt, ass, self.log_level), "Subtitle conversion")
            .await
    }

    /// Cuts `[start_ms, start_ms + duration_ms)` out of `video` with `ass` burned in
    pub async fn cut_with_subtitles(
        &self,
        video: &Path,
        start_ms: TimeMs,
        duration_ms: TimeMs,
        ass: &Path,
        output: &Path,
    ) -> FFmpegResult<()> {
        if !video.exists() {
            return Err(FFmpegError::InvalidInput(format!(
                "Input file does not exist: {}",
                video.display()
            )));
        }
        ensure_parent(output)?;

        self.run(
            cut_args(video, start_ms, duration_ms, ass, output, self.log_level),
            "Fragment cut",
        )
        .await
    }

    async fn run(&self, args: Vec<OsString>, what: &str) -> FFmpegResult<()> {
        debug!("{}: {} {:?}", what, self.info.ffmpeg_path.display(), args);

        let output = tokio::process::Command::new(&self.info.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(FFmpegError::ProcessError)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FFmpegError::ExecutionFailed(format!(
                "{} failed ({}): {}",
                what,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

fn ensure_parent(path: &Path) -> FFmpegResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            FFmpegError::OutputError(format!("Failed to create output directory: {}", e))
        })?;
    }
    Ok(())
}
