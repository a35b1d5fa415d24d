//! Tieralign Error Definitions
//!
//! Defines error types used throughout the alignment engine.

use thiserror::Error;

use super::ffmpeg::FFmpegError;
use super::{BoundaryId, TierId, TimeMs};

/// Core engine error types
#[derive(Error, Debug)]
pub enum AlignError {
    // =========================================================================
    // Document Errors
    // =========================================================================
    #[error("Failed to parse annotation document: {0}")]
    XmlParse(String),

    #[error("Missing attribute {attribute} on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    #[error("Invalid time value for boundary {boundary_id}: {value}")]
    InvalidTimeValue {
        boundary_id: BoundaryId,
        value: String,
    },

    #[error(
        "Unresolved boundary {boundary_id} referenced by annotation {annotation_id} on tier {tier_id}"
    )]
    UnresolvedBoundary {
        boundary_id: BoundaryId,
        annotation_id: String,
        tier_id: TierId,
    },

    #[error("Invalid interval {annotation_id} on tier {tier_id}: ends at {end_ms}ms before it starts at {start_ms}ms")]
    InvalidInterval {
        annotation_id: String,
        tier_id: TierId,
        start_ms: TimeMs,
        end_ms: TimeMs,
    },

    // =========================================================================
    // Tier Errors
    // =========================================================================
    #[error("Malformed tier count: {count} utterance tiers found, expected an even number")]
    MalformedTierCount { count: usize },

    #[error("Tier not found: {0}")]
    TierNotFound(TierId),

    // =========================================================================
    // Consumer Errors
    // =========================================================================
    #[error("Tier metadata error: {0}")]
    Metadata(String),

    #[error("Encoder error: {0}")]
    Encoder(#[from] FFmpegError),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No annotation documents found")]
    NoDocuments,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core engine result type
pub type AlignResult<T> = Result<T, AlignError>;

impl AlignError {
    /// Whether this error only invalidates the current document of a batch
    pub fn is_document_fatal(&self) -> bool {
        matches!(
            self,
            Self::XmlParse(_)
                | Self::MissingAttribute { .. }
                | Self::InvalidTimeValue { .. }
                | Self::UnresolvedBoundary { .. }
                | Self::InvalidInterval { .. }
                | Self::MalformedTierCount { .. }
                | Self::TierNotFound(_)
                | Self::Encoder(_)
                | Self::IoError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_boundary_display() {
        let err = AlignError::UnresolvedBoundary {
            boundary_id: "ts7".to_string(),
            annotation_id: "a12".to_string(),
            tier_id: "Junge-Spch".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ts7"));
        assert!(msg.contains("a12"));
        assert!(msg.contains("Junge-Spch"));
    }

    #[test]
    fn test_document_fatal_classification() {
        assert!(AlignError::MalformedTierCount { count: 3 }.is_document_fatal());
        assert!(AlignError::TierNotFound("x".to_string()).is_document_fatal());
        assert!(!AlignError::NoDocuments.is_document_fatal());
        assert!(!AlignError::Config("bad".to_string()).is_document_fatal());
    }
}
