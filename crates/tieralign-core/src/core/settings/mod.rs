//! Settings
//!
//! Alignment configuration with:
//! - Defaults for every field, so partial JSON files are valid
//! - Normalization that repairs bad values instead of failing
//! - Atomic persistence (temp file + rename)

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::fs::atomic_write_json_pretty;
use crate::core::{AlignError, AlignResult, TimeMs};

/// Settings schema version
pub const SETTINGS_VERSION: u32 = 1;

/// Default proximity threshold for interval pairing and auxiliary merging
pub const DEFAULT_PROXIMITY_MS: TimeMs = 100;

/// Alignment settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlignSettings {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Tier classification
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Pairing and reconciliation
    #[serde(default)]
    pub alignment: AlignmentSettings,

    /// Corpus (VRT) output
    #[serde(default)]
    pub corpus: CorpusSettings,

    /// Subtitle and fragment output
    #[serde(default)]
    pub video: VideoSettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for AlignSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            classifier: ClassifierConfig::default(),
            alignment: AlignmentSettings::default(),
            corpus: CorpusSettings::default(),
            video: VideoSettings::default(),
        }
    }
}

impl AlignSettings {
    /// Loads settings from a JSON file; a missing file yields defaults.
    pub fn load(path: &Path) -> AlignResult<Self> {
        if !path.exists() {
            info!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let mut settings: AlignSettings = serde_json::from_str(&content)
            .map_err(|e| AlignError::Config(format!("{}: {}", path.display(), e)))?;

        if settings.version > SETTINGS_VERSION {
            warn!(
                "Settings version {} is newer than supported version {}",
                settings.version, SETTINGS_VERSION
            );
        }

        settings.normalize();
        Ok(settings)
    }

    /// Normalizes and saves settings atomically.
    pub fn save(&self, path: &Path) -> AlignResult<()> {
        let mut normalized = self.clone();
        normalized.normalize();
        atomic_write_json_pretty(path, &normalized)
    }

    /// Normalizes settings so downstream components can rely on them.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        self.classifier.normalize();

        self.alignment.proximity_ms = self.alignment.proximity_ms.clamp(1, 10_000);

        self.corpus.normalize();
        self.video.log_level = self.video.log_level.min(64);
    }
}

fn normalize_list(values: &mut Vec<String>, fallback: fn() -> Vec<String>) {
    values.retain(|v| !v.trim().is_empty());
    values.dedup();
    if values.is_empty() {
        *values = fallback();
    }
}

fn normalize_label(value: &mut String, fallback: fn() -> String) {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        *value = fallback();
    } else if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Tier classification settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierConfig {
    /// `LINGUISTIC_TYPE_REF` values marking utterance tiers
    #[serde(default = "default_utterance_types")]
    pub utterance_types: Vec<String>,

    /// Annotation kinds recognized as auxiliary tier suffixes
    #[serde(default = "default_auxiliary_kinds")]
    pub auxiliary_kinds: Vec<String>,

    /// Separators allowed between a speaker name and an annotation kind
    #[serde(default = "default_auxiliary_separators")]
    pub auxiliary_separators: Vec<String>,

    /// Speaker-role suffixes removed when deriving group keys
    #[serde(default = "default_speaker_suffixes")]
    pub speaker_suffixes: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            utterance_types: default_utterance_types(),
            auxiliary_kinds: default_auxiliary_kinds(),
            auxiliary_separators: default_auxiliary_separators(),
            speaker_suffixes: default_speaker_suffixes(),
        }
    }
}

impl ClassifierConfig {
    fn normalize(&mut self) {
        normalize_list(&mut self.utterance_types, default_utterance_types);
        normalize_list(&mut self.auxiliary_kinds, default_auxiliary_kinds);
        // A bare space is a valid separator, so only drop truly empty entries.
        self.auxiliary_separators.retain(|s| !s.is_empty());
        if self.auxiliary_separators.is_empty() {
            self.auxiliary_separators = default_auxiliary_separators();
        }
        self.speaker_suffixes.retain(|s| !s.is_empty());
    }
}

fn default_utterance_types() -> Vec<String> {
    vec!["utterance".to_string()]
}

fn default_auxiliary_kinds() -> Vec<String> {
    vec!["NVK".to_string(), "AA".to_string(), "Illok.".to_string()]
}

fn default_auxiliary_separators() -> Vec<String> {
    vec![" ".to_string(), "-".to_string()]
}

fn default_speaker_suffixes() -> Vec<String> {
    vec!["-Spch".to_string()]
}

/// Pairing and reconciliation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentSettings {
    /// Maximum start-time distance (ms) for two intervals to count as a pair
    #[serde(default = "default_proximity_ms")]
    pub proximity_ms: TimeMs,
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            proximity_ms: DEFAULT_PROXIMITY_MS,
        }
    }
}

fn default_proximity_ms() -> TimeMs {
    DEFAULT_PROXIMITY_MS
}

/// Corpus (VRT) output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CorpusSettings {
    /// Language label of the source tier output
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language label of the target tier output
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Language label of the auxiliary annotation output
    #[serde(default = "default_annotation_language")]
    pub annotation_language: String,

    /// Element name wrapping each aligned utterance
    #[serde(default = "default_align_tag")]
    pub align_tag: String,

    /// Directory receiving `.vrt` files
    #[serde(default = "default_corpus_dir")]
    pub output_dir: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            annotation_language: default_annotation_language(),
            align_tag: default_align_tag(),
            output_dir: default_corpus_dir(),
        }
    }
}

impl CorpusSettings {
    fn normalize(&mut self) {
        normalize_label(&mut self.source_language, default_source_language);
        normalize_label(&mut self.target_language, default_target_language);
        normalize_label(&mut self.annotation_language, default_annotation_language);
        normalize_label(&mut self.align_tag, default_align_tag);
        if self.output_dir.trim().is_empty() {
            self.output_dir = default_corpus_dir();
        }
    }
}

fn default_source_language() -> String {
    "RU".to_string()
}

fn default_target_language() -> String {
    "DE".to_string()
}

fn default_annotation_language() -> String {
    "annotation".to_string()
}

fn default_align_tag() -> String {
    "Align_RU_DE".to_string()
}

fn default_corpus_dir() -> String {
    "./VRT".to_string()
}

/// Subtitle and fragment output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoSettings {
    /// Directory receiving per-document subtitle files
    #[serde(default = "default_subtitles_dir")]
    pub subtitles_dir: String,

    /// Directory receiving cut fragments
    #[serde(default = "default_fragments_dir")]
    pub output_dir: String,

    /// Explicit ffmpeg binary; detected on PATH when unset
    #[serde(default)]
    pub ffmpeg_path: Option<String>,

    /// Numeric ffmpeg `-loglevel`
    #[serde(default = "default_log_level")]
    pub log_level: u8,

    /// Keep intermediate `.srt` files after conversion
    #[serde(default)]
    pub keep_srt: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            subtitles_dir: default_subtitles_dir(),
            output_dir: default_fragments_dir(),
            ffmpeg_path: None,
            log_level: default_log_level(),
            keep_srt: false,
        }
    }
}

fn default_subtitles_dir() -> String {
    "./Subtitles".to_string()
}

fn default_fragments_dir() -> String {
    "./OUT".to_string()
}

fn default_log_level() -> u8 {
    24
}
