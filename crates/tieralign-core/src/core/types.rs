//! Tieralign Core Type Definitions
//!
//! Defines fundamental types used throughout the project.

// =============================================================================
// ID Types
// =============================================================================

/// Tier identifier as written in the document (`TIER_ID`)
pub type TierId = String;

/// Time slot identifier (`TIME_SLOT_ID`)
pub type BoundaryId = String;

/// Speaker/group key shared by an utterance tier and its auxiliary tiers
pub type GroupKey = String;

/// Dense, 1-based position of a record in a document's chronological output
pub type SequenceNo = u32;

// =============================================================================
// Time Types
// =============================================================================

/// Time in milliseconds from the start of the media
pub type TimeMs = u64;

/// Formats milliseconds as `H:MM:SS.mmm`
pub fn format_clock(ms: TimeMs) -> String {
    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}

/// Formats milliseconds as fractional seconds for encoder arguments
pub fn format_seconds(ms: TimeMs) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}
