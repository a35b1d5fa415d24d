//! Validity Finding Types
//!
//! Defines findings, their kinds, and severity levels.

use serde::Serialize;

use crate::core::{format_clock, TierId, TimeMs};

/// Time range locating a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_ms: TimeMs,
    pub end_ms: TimeMs,
}

impl TimeRange {
    pub fn new(start_ms: TimeMs, end_ms: TimeMs) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn duration_ms(&self) -> TimeMs {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Check if this range contains a specific time
    pub fn contains(&self, time_ms: TimeMs) -> bool {
        time_ms >= self.start_ms && time_ms <= self.end_ms
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "between {} and {}",
            format_clock(self.start_ms),
            format_clock(self.end_ms)
        )
    }
}

/// Severity level of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// What a finding is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FindingKind {
    /// The two tiers of a pair hold different numbers of intervals
    #[serde(rename_all = "camelCase")]
    CountMismatch {
        first_tier: TierId,
        first_count: usize,
        second_tier: TierId,
        second_count: usize,
    },
    /// One side of a lockstep-walked interval has no text
    #[serde(rename_all = "camelCase")]
    EmptyField {
        tier_id: TierId,
        first_text: Option<String>,
        second_text: Option<String>,
    },
}

/// A problem found in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    /// Human-readable message explaining the issue
    pub message: String,
    pub location: Option<TimeRange>,
    /// Tier ids involved
    pub tiers: Vec<TierId>,
}

impl Finding {
    pub fn count_mismatch(
        first_tier: &str,
        first_count: usize,
        second_tier: &str,
        second_count: usize,
    ) -> Self {
        Self {
            message: format!(
                "Tiers {} and {} have unequal lengths: {} vs {} intervals",
                first_tier, second_tier, first_count, second_count
            ),
            kind: FindingKind::CountMismatch {
                first_tier: first_tier.to_string(),
                first_count,
                second_tier: second_tier.to_string(),
                second_count,
            },
            severity: Severity::Warning,
            location: None,
            tiers: vec![first_tier.to_string(), second_tier.to_string()],
        }
    }

    /// An empty field on `tier_id`, located at that tier's own interval.
    pub fn empty_field(
        tier_id: &str,
        first_text: Option<&str>,
        second_text: Option<&str>,
        location: TimeRange,
    ) -> Self {
        Self {
            message: format!(
                "Speaker: {}\t Empty field: {} | {}\t Located {}",
                tier_id,
                first_text.unwrap_or("None"),
                second_text.unwrap_or("None"),
                location
            ),
            kind: FindingKind::EmptyField {
                tier_id: tier_id.to_string(),
                first_text: first_text.map(str::to_string),
                second_text: second_text.map(str::to_string),
            },
            severity: Severity::Warning,
            location: Some(location),
            tiers: vec![tier_id.to_string()],
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}
