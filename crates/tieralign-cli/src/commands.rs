//! Subcommand implementations
//!
//! Each returns `Ok(false)` when some document failed, so the process can
//! exit with failure after the whole batch ran.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Serialize;
use tracing::{info, warn};

use tieralign_core::core::align::{AlignedRecord, Aligner, AuditEvent};
use tieralign_core::core::batch::{run_batch, BatchSummary};
use tieralign_core::core::corpus::CorpusWriter;
use tieralign_core::core::ffmpeg::{FFmpegInfo, FFmpegRunner};
use tieralign_core::core::fragments::{BatchState, FragmentDriver};
use tieralign_core::core::fs::{discover_documents, document_stem, is_document_path};
use tieralign_core::core::qc::IntervalChecker;
use tieralign_core::core::reshape::{load_tier_pairs, reshape_file, TierReshaper};
use tieralign_core::core::settings::AlignSettings;

fn report(summary: &BatchSummary) -> bool {
    if !summary.is_success() {
        warn!(
            "{} of {} documents failed",
            summary.failed.len(),
            summary.total()
        );
    }
    summary.is_success()
}

pub fn check(settings: &AlignSettings, locations: &[PathBuf], strict: bool) -> anyhow::Result<bool> {
    let documents = discover_documents(locations)?;
    let checker = IntervalChecker::new(&settings.classifier);

    let (reports, summary) = run_batch(&documents, |path| {
        let validity = checker.check_file(path)?;
        println!("Checking {}", path.display());
        println!("{}", validity.summary());
        println!("{}", "*".repeat(30));
        Ok(validity)
    })?;

    let clean = reports.iter().all(|(_, report)| report.is_clean());
    Ok(report(&summary) && (clean || !strict))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlignOutput<'a> {
    document: String,
    records: &'a [AlignedRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    audit: Option<&'a [AuditEvent]>,
}

pub fn align(
    settings: &AlignSettings,
    locations: &[PathBuf],
    with_audit: bool,
    pretty: bool,
) -> anyhow::Result<bool> {
    let documents = discover_documents(locations)?;
    let aligner = Aligner::new(settings);

    let (_, summary) = run_batch(&documents, |path| {
        let alignment = aligner.align_file(path)?;
        let output = AlignOutput {
            document: document_stem(path),
            records: &alignment.records,
            audit: with_audit.then(|| alignment.audit.events()),
        };
        let json = if pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };
        println!("{}", json);
        Ok(())
    })?;

    Ok(report(&summary))
}

pub fn vrt(settings: &AlignSettings, locations: &[PathBuf], out: Option<PathBuf>) -> anyhow::Result<bool> {
    let documents = discover_documents(locations)?;
    let aligner = Aligner::new(settings);
    let mut writer = CorpusWriter::new(&settings.corpus);
    if let Some(dir) = out {
        writer = writer.with_output_dir(dir);
    }

    info!("Making .vrt for {} documents", documents.len());
    let (_, summary) = run_batch(&documents, |path| {
        let alignment = aligner.align_file(path)?;
        writer.write(&document_stem(path), &alignment.records)
    })?;

    Ok(report(&summary))
}

pub async fn video(settings: &AlignSettings, documents: &Path, videos: &Path) -> anyhow::Result<bool> {
    if !documents.exists() || !videos.exists() {
        bail!(
            "Provide correct paths: {} and {}",
            documents.display(),
            videos.display()
        );
    }

    let info = FFmpegInfo::resolve(settings.video.ffmpeg_path.as_deref())
        .context("FFmpeg is required to cut video fragments")?;
    info!("Using FFmpeg {} at {}", info.version, info.ffmpeg_path.display());
    let driver = FragmentDriver::new(settings, FFmpegRunner::new(info, settings.video.log_level));
    let mut state = BatchState::new();
    let mut summary = BatchSummary::new();

    if documents.is_dir() && videos.is_dir() {
        for path in discover_documents(&[documents])? {
            let result = driver.process_in_dir(&path, videos, &mut state).await;
            summary.record(&path, result)?;
        }
    } else if documents.is_file() && videos.is_file() {
        if !is_document_path(documents) {
            bail!("Not an annotation document: {}", documents.display());
        }
        let result = driver.process_document(documents, videos, &mut state).await;
        summary.record(documents, result)?;
    } else {
        bail!("Provide either two files or two directories");
    }

    info!("{} fragments cut", state.len());
    Ok(report(&summary))
}

pub fn reshape(settings: &AlignSettings, document: &Path, metadata: &Path) -> anyhow::Result<bool> {
    if !document.is_file() || !is_document_path(document) {
        bail!(
            "ELAN file does not exist or is not .eaf-formatted: {}",
            document.display()
        );
    }
    let pairs = load_tier_pairs(metadata)
        .with_context(|| format!("Reading tier metadata {}", metadata.display()))?;

    let utterance_type = settings
        .classifier
        .utterance_types
        .first()
        .map(String::as_str)
        .unwrap_or("utterance");
    reshape_file(&TierReshaper::new(utterance_type), document, &pairs)?;
    Ok(true)
}
