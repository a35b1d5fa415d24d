//! Fragment planning
//!
//! Everything here is pure apart from `find_video`, which lists a directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::align::AlignedRecord;
use crate::core::captions::{export_srt, fragment_cue};
use crate::core::{AlignResult, TimeMs};

/// Output names already produced during one batch run.
///
/// Source and target lines with identical timing map to the same fragment;
/// only the first claim cuts it.
#[derive(Debug, Clone, Default)]
pub struct BatchState {
    created: HashSet<String>,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` was not produced yet and marks it produced.
    pub fn claim(&mut self, name: &str) -> bool {
        self.created.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.created.contains(name)
    }

    pub fn len(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

/// `<stem>-<start>-<end>-<group>`
pub fn fragment_name(stem: &str, record: &AlignedRecord) -> String {
    let group: String = record
        .tier_group
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}-{}-{}-{}", stem, record.start_ms, record.end_ms, group)
}

/// `<subtitles>/<stem>`
pub fn subtitle_dir(subtitles_root: &Path, stem: &str) -> PathBuf {
    subtitles_root.join(stem)
}

/// One subtitle file to write and convert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleJob {
    pub srt_path: PathBuf,
    pub ass_path: PathBuf,
    pub content: String,
}

/// Plans the subtitle file of every record.
///
/// SRT files go to `<subtitles>/<stem>/SRT/`, converted ASS files to
/// `<subtitles>/<stem>/`. Records sharing a fragment name are planned once.
pub fn plan_subtitles(
    stem: &str,
    records: &[AlignedRecord],
    subtitles_root: &Path,
) -> Vec<SubtitleJob> {
    let dir = subtitle_dir(subtitles_root, stem);
    let srt_dir = dir.join("SRT");
    let mut seen = HashSet::new();

    records
        .iter()
        .filter_map(|record| {
            let name = fragment_name(stem, record);
            if !seen.insert(name.clone()) {
                return None;
            }
            Some(SubtitleJob {
                srt_path: srt_dir.join(format!("{}.srt", name)),
                ass_path: dir.join(format!("{}.ass", name)),
                content: export_srt(&[fragment_cue(record)]),
            })
        })
        .collect()
}

/// One fragment to cut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutJob {
    /// Output file name, the deduplication key
    pub name: String,
    pub video: PathBuf,
    pub start_ms: TimeMs,
    pub duration_ms: TimeMs,
    pub ass_path: PathBuf,
    pub output_path: PathBuf,
}

/// Plans fragment cuts, skipping outputs already claimed in `state`.
pub fn plan_cuts(
    stem: &str,
    records: &[AlignedRecord],
    video: &Path,
    subtitles_root: &Path,
    output_dir: &Path,
    state: &mut BatchState,
) -> Vec<CutJob> {
    let extension = video
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let dir = subtitle_dir(subtitles_root, stem);

    records
        .iter()
        .filter_map(|record| {
            let base = fragment_name(stem, record);
            let name = format!("{}{}", base, extension);
            if !state.claim(&name) {
                return None;
            }
            Some(CutJob {
                video: video.to_path_buf(),
                start_ms: record.start_ms,
                duration_ms: record.duration_ms(),
                ass_path: dir.join(format!("{}.ass", base)),
                output_path: output_dir.join(&name),
                name,
            })
        })
        .collect()
}

/// Finds `<stem>.<ext>` in `dir`, `ext` being non-empty ASCII alphanumeric.
///
/// When several files match, the lexicographically first is used.
pub fn find_video(dir: &Path, stem: &str) -> AlignResult<Option<PathBuf>> {
    let mut matches: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_video_for(path, stem))
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}

fn is_video_for(path: &Path, stem: &str) -> bool {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    match file_name
        .strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix('.'))
    {
        Some(ext) => !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) && ext != "eaf",
        None => false,
    }
}
