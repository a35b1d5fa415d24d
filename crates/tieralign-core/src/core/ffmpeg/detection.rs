//! Encoder Detection
//!
//! Resolves the ffmpeg binary: a configured path wins, otherwise the `PATH`
//! entries are searched, then a few well-known install directories.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::{FFmpegError, FFmpegResult};

#[cfg(target_os = "windows")]
const BINARY_NAME: &str = "ffmpeg.exe";

#[cfg(not(target_os = "windows"))]
const BINARY_NAME: &str = "ffmpeg";

/// A validated ffmpeg binary
#[derive(Debug, Clone)]
pub struct FFmpegInfo {
    pub ffmpeg_path: PathBuf,
    /// First token after "ffmpeg version", or the whole first line
    pub version: String,
}

impl FFmpegInfo {
    /// Validates an explicitly configured binary.
    pub fn from_path(path: impl Into<PathBuf>) -> FFmpegResult<Self> {
        let ffmpeg_path = path.into();
        if !ffmpeg_path.is_file() {
            return Err(FFmpegError::NotFound);
        }
        let version = query_version(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            version,
        })
    }

    /// Uses `configured` when given, otherwise searches the system.
    pub fn resolve(configured: Option<&str>) -> FFmpegResult<Self> {
        match configured.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => Self::from_path(path),
            None => detect_system_ffmpeg(),
        }
    }
}

/// Finds ffmpeg on `PATH` or in a well-known directory.
pub fn detect_system_ffmpeg() -> FFmpegResult<FFmpegInfo> {
    let ffmpeg_path = locate_binary(std::env::var_os("PATH")).ok_or(FFmpegError::NotFound)?;
    let info = FFmpegInfo::from_path(ffmpeg_path)?;
    debug!("Found FFmpeg {} at {}", info.version, info.ffmpeg_path.display());
    Ok(info)
}

fn locate_binary(path_var: Option<OsString>) -> Option<PathBuf> {
    let search_dirs: Vec<PathBuf> = path_var
        .map(|paths| std::env::split_paths(&paths).collect())
        .unwrap_or_default();

    search_dirs
        .into_iter()
        .chain(fallback_dirs())
        .map(|dir| dir.join(BINARY_NAME))
        .find(|candidate| candidate.is_file())
}

fn fallback_dirs() -> Vec<PathBuf> {
    let dirs: &[&str] = if cfg!(target_os = "windows") {
        &[r"C:\ffmpeg\bin", r"C:\Program Files\ffmpeg\bin"]
    } else if cfg!(target_os = "macos") {
        &["/opt/homebrew/bin", "/usr/local/bin"]
    } else {
        &["/usr/bin", "/usr/local/bin", "/snap/bin"]
    };
    dirs.iter().map(PathBuf::from).collect()
}

fn query_version(ffmpeg_path: &Path) -> FFmpegResult<String> {
    let output = Command::new(ffmpeg_path).arg("-version").output()?;

    if !output.status.success() {
        return Err(FFmpegError::ExecutionFailed(format!(
            "{} -version exited with {}",
            ffmpeg_path.display(),
            output.status
        )));
    }

    parse_version(&String::from_utf8_lossy(&output.stdout))
}

fn parse_version(output: &str) -> FFmpegResult<String> {
    let first_line = output
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .ok_or_else(|| FFmpegError::ParseError("empty -version output".to_string()))?;

    Ok(first_line
        .strip_prefix("ffmpeg version ")
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or(first_line)
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        let output = "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) 2000-2023\nbuilt with gcc";
        assert_eq!(parse_version(output).unwrap(), "6.1.1-3ubuntu5");
        assert_eq!(parse_version("custom build").unwrap(), "custom build");
        assert!(parse_version("").is_err());
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = FFmpegInfo::from_path(dir.path().join("no-ffmpeg")).unwrap_err();
        assert!(matches!(err, FFmpegError::NotFound));

        // A directory is not a binary
        let err = FFmpegInfo::from_path(dir.path()).unwrap_err();
        assert!(matches!(err, FFmpegError::NotFound));
    }

    #[test]
    fn test_locate_binary_prefers_path_entries() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(second.path().join(BINARY_NAME), b"").unwrap();

        let path_var =
            std::env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(
            locate_binary(Some(path_var)),
            Some(second.path().join(BINARY_NAME))
        );
    }

    #[test]
    fn test_blank_configured_path_falls_back_to_detection() {
        // Passes whether or not FFmpeg is installed
        if let Ok(info) = FFmpegInfo::resolve(Some("  ")) {
            assert!(!info.version.is_empty());
        }
    }
}
