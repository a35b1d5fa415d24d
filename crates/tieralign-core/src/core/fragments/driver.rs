//! Fragment driver
//!
//! Aligns a document, writes and converts its subtitles, then cuts one
//! fragment per record through the encoder.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::planner::{find_video, plan_cuts, plan_subtitles, subtitle_dir, BatchState};
use crate::core::align::Aligner;
use crate::core::ffmpeg::FFmpegRunner;
use crate::core::fs::{atomic_write_bytes, document_stem};
use crate::core::settings::{AlignSettings, VideoSettings};
use crate::core::AlignResult;

/// What was produced for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentSummary {
    pub document: String,
    pub subtitles: usize,
    pub fragments: usize,
    /// Fragments already produced earlier in the batch
    pub skipped: usize,
}

/// Produces subtitled fragments for documents with a matching video
#[derive(Debug, Clone)]
pub struct FragmentDriver {
    aligner: Aligner,
    settings: VideoSettings,
    runner: FFmpegRunner,
}

impl FragmentDriver {
    pub fn new(settings: &AlignSettings, runner: FFmpegRunner) -> Self {
        Self {
            aligner: Aligner::new(settings),
            settings: settings.video.clone(),
            runner,
        }
    }

    fn subtitles_root(&self) -> PathBuf {
        PathBuf::from(&self.settings.subtitles_dir)
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.settings.output_dir)
    }

    /// Finds the video of `document` in `video_dir` and processes the pair.
    ///
    /// Returns `None` when no video matches; the document is skipped.
    pub async fn process_in_dir(
        &self,
        document: &Path,
        video_dir: &Path,
        state: &mut BatchState,
    ) -> AlignResult<Option<FragmentSummary>> {
        let stem = document_stem(document);
        match find_video(video_dir, &stem)? {
            Some(video) => self.process_document(document, &video, state).await.map(Some),
            None => {
                warn!(
                    "No video for {} in {}, no fragments will be cut",
                    stem,
                    video_dir.display()
                );
                Ok(None)
            }
        }
    }

    /// Processes one document against an explicit video file.
    pub async fn process_document(
        &self,
        document: &Path,
        video: &Path,
        state: &mut BatchState,
    ) -> AlignResult<FragmentSummary> {
        let stem = document_stem(document);
        let records = self.aligner.align_file(document)?.records;
        let mut summary = FragmentSummary {
            document: stem.clone(),
            ..Default::default()
        };

        if records.is_empty() {
            warn!("{} has no aligned records, nothing to cut", stem);
            return Ok(summary);
        }

        let subtitles_root = self.subtitles_root();
        info!("Making subtitles for {}", stem);
        for job in plan_subtitles(&stem, &records, &subtitles_root) {
            atomic_write_bytes(&job.srt_path, job.content.as_bytes())?;
            self.runner
                .convert_subtitles(&job.srt_path, &job.ass_path)
                .await?;
            summary.subtitles += 1;
        }

        if !self.settings.keep_srt {
            let srt_dir = subtitle_dir(&subtitles_root, &stem).join("SRT");
            if srt_dir.exists() {
                std::fs::remove_dir_all(&srt_dir)?;
            }
        }

        info!("Cutting fragments for {}", stem);
        let jobs = plan_cuts(
            &stem,
            &records,
            video,
            &subtitles_root,
            &self.output_dir(),
            state,
        );
        summary.skipped = records.len() - jobs.len();
        for job in jobs {
            self.runner
                .cut_with_subtitles(
                    &job.video,
                    job.start_ms,
                    job.duration_ms,
                    &job.ass_path,
                    &job.output_path,
                )
                .await?;
            summary.fragments += 1;
        }

        info!(
            "{}: {} subtitles, {} fragments, {} skipped",
            stem, summary.subtitles, summary.fragments, summary.skipped
        );
        Ok(summary)
    }
}
