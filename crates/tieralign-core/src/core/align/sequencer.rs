//! Chronological Sequencer
//!
//! Merges the aligned pairs of every tier pair into one list ordered by
//! source start time and numbers it densely from 1.

use serde::Serialize;

use super::reconcile::AlignedPair;
use crate::core::{GroupKey, SequenceNo, TimeMs};

/// A numbered output record; the shape every consumer reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedRecord {
    pub sequence_id: SequenceNo,
    pub start_ms: TimeMs,
    pub end_ms: TimeMs,
    pub source_text: Option<String>,
    pub target_text: Option<String>,
    pub auxiliary_text: String,
    pub tier_group: GroupKey,
}

impl AlignedRecord {
    pub fn duration_ms(&self) -> TimeMs {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Orders pairs from all tier pairs by start time and assigns sequence ids.
///
/// The sort is stable: records with equal starts keep the order of their
/// tier pairs in the document, then their order within the pair.
pub fn sequence(per_pair: Vec<Vec<AlignedPair>>) -> Vec<AlignedRecord> {
    let mut pairs: Vec<AlignedPair> = per_pair.into_iter().flatten().collect();
    pairs.sort_by_key(|p| p.start_ms);

    pairs
        .into_iter()
        .zip(1..)
        .map(|(p, sequence_id)| AlignedRecord {
            sequence_id,
            start_ms: p.start_ms,
            end_ms: p.end_ms,
            source_text: p.source_text,
            target_text: p.target_text,
            auxiliary_text: p.auxiliary_text,
            tier_group: p.tier_group,
        })
        .collect()
}
