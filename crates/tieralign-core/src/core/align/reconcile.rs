//! Interval reconciliation
//!
//! Walks the source and target tiers of a pair with two cursors. Intervals
//! whose starts lie further apart than the proximity threshold are treated
//! as stray blanks left by the annotator: the one that starts earlier is
//! dropped and the comparison repeats at the next interval of that tier.

use serde::Serialize;
use tracing::debug;

use super::audit::{AlignmentAudit, AuditEvent};
use super::pairing::TierPair;
use crate::core::eaf::{Annotation, AuxiliaryLookup, Tier};
use crate::core::settings::DEFAULT_PROXIMITY_MS;
use crate::core::{GroupKey, TierId, TimeMs};

/// One reconciled source/target interval pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedPair {
    /// Source start; authoritative for the record
    pub start_ms: TimeMs,
    /// Source end; authoritative for the record
    pub end_ms: TimeMs,
    pub target_start_ms: TimeMs,
    pub target_end_ms: TimeMs,
    pub source_text: Option<String>,
    pub target_text: Option<String>,
    /// Space-joined auxiliary annotations starting near the target interval
    pub auxiliary_text: String,
    pub tier_group: GroupKey,
    pub source_tier: TierId,
    pub target_tier: TierId,
}

impl AlignedPair {
    /// Whether either side has no text
    pub fn has_missing_text(&self) -> bool {
        self.source_text.is_none() || self.target_text.is_none()
    }
}

/// Reconciles tier pairs using a fixed proximity threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciler {
    proximity_ms: TimeMs,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(DEFAULT_PROXIMITY_MS)
    }
}

impl Reconciler {
    pub fn new(proximity_ms: TimeMs) -> Self {
        Self { proximity_ms }
    }

    pub fn proximity_ms(&self) -> TimeMs {
        self.proximity_ms
    }

    /// Pairs the intervals of `pair`, merging auxiliary text from `auxiliary`.
    ///
    /// The underlying tiers are never modified; drops only advance a cursor.
    /// No emitted pair has starts more than `proximity_ms` apart.
    pub fn reconcile(
        &self,
        pair: &TierPair<'_>,
        auxiliary: AuxiliaryLookup<'_>,
        audit: &mut AlignmentAudit,
    ) -> Vec<AlignedPair> {
        let source = &pair.source.annotations;
        let target = &pair.target.annotations;
        let mut aligned = Vec::with_capacity(source.len().min(target.len()));

        let (mut i, mut j) = (0, 0);
        while i < source.len() && j < target.len() {
            let src = &source[i];
            let tgt = &target[j];

            if src.interval.start_distance(&tgt.interval) > self.proximity_ms {
                if tgt.start_ms() < src.start_ms() {
                    audit.record(dropped(pair.target, tgt));
                    j += 1;
                } else {
                    audit.record(dropped(pair.source, src));
                    i += 1;
                }
                continue;
            }

            if src.end_ms().abs_diff(tgt.end_ms()) > self.proximity_ms {
                audit.record(AuditEvent::EndMismatch {
                    source_tier: pair.source.id.clone(),
                    target_tier: pair.target.id.clone(),
                    start_ms: src.start_ms(),
                    source_end_ms: src.end_ms(),
                    target_end_ms: tgt.end_ms(),
                });
            }

            let auxiliary_text = match auxiliary {
                AuxiliaryLookup::Group(tiers) => self.auxiliary_text(tiers, tgt.start_ms()),
                AuxiliaryLookup::NoGroup => String::new(),
            };

            aligned.push(AlignedPair {
                start_ms: src.start_ms(),
                end_ms: src.end_ms(),
                target_start_ms: tgt.start_ms(),
                target_end_ms: tgt.end_ms(),
                source_text: src.text.clone(),
                target_text: tgt.text.clone(),
                auxiliary_text,
                tier_group: pair.group_key().clone(),
                source_tier: pair.source.id.clone(),
                target_tier: pair.target.id.clone(),
            });
            i += 1;
            j += 1;
        }

        for (tier, remaining) in [
            (pair.source, source.len() - i),
            (pair.target, target.len() - j),
        ] {
            if remaining > 0 {
                audit.record(AuditEvent::Unpaired {
                    tier_id: tier.id.clone(),
                    remaining,
                });
            }
        }

        debug!(
            "Reconciled {} / {}: {} pairs from {} and {} intervals",
            pair.source.id,
            pair.target.id,
            aligned.len(),
            source.len(),
            target.len()
        );

        aligned
    }

    /// Texts of auxiliary intervals starting strictly within the threshold
    /// of `target_start`, tier by tier, interval by interval.
    fn auxiliary_text(&self, tiers: &[Tier], target_start: TimeMs) -> String {
        tiers
            .iter()
            .flat_map(|tier| tier.annotations.iter())
            .filter(|an| an.start_ms().abs_diff(target_start) < self.proximity_ms)
            .filter_map(|an| an.text.as_deref())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn dropped(tier: &Tier, annotation: &Annotation) -> AuditEvent {
    AuditEvent::DroppedInterval {
        tier_id: tier.id.clone(),
        start_ms: annotation.start_ms(),
        end_ms: annotation.end_ms(),
        text: annotation.text.clone(),
    }
}
