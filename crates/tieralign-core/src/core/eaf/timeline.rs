//! Timeline Index
//!
//! Maps time slot ids to millisecond offsets. Slots without an explicit value
//! are left out, so any interval that references one fails to resolve.

use std::collections::HashMap;

use super::document::{EafDocument, RawAnnotation};
use super::tiers::TimedInterval;
use crate::core::{AlignError, AlignResult, BoundaryId, TimeMs};

/// Boundary id → millisecond lookup for one document
#[derive(Debug, Clone, Default)]
pub struct TimelineIndex {
    slots: HashMap<BoundaryId, TimeMs>,
}

impl TimelineIndex {
    /// Builds the index from every valued time slot of the document
    pub fn build(document: &EafDocument) -> Self {
        let slots = document
            .time_slots
            .iter()
            .filter_map(|slot| slot.value.map(|value| (slot.id.clone(), value)))
            .collect();
        Self { slots }
    }

    pub fn get(&self, boundary_id: &str) -> Option<TimeMs> {
        self.slots.get(boundary_id).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Resolves both boundaries of an annotation on the given tier.
    pub fn resolve(&self, annotation: &RawAnnotation, tier_id: &str) -> AlignResult<TimedInterval> {
        let start_ms = self.lookup(&annotation.start_ref, annotation, tier_id)?;
        let end_ms = self.lookup(&annotation.end_ref, annotation, tier_id)?;

        if end_ms < start_ms {
            return Err(AlignError::InvalidInterval {
                annotation_id: annotation.id.clone(),
                tier_id: tier_id.to_string(),
                start_ms,
                end_ms,
            });
        }

        Ok(TimedInterval::new(start_ms, end_ms))
    }

    fn lookup(
        &self,
        boundary_id: &str,
        annotation: &RawAnnotation,
        tier_id: &str,
    ) -> AlignResult<TimeMs> {
        self.get(boundary_id)
            .ok_or_else(|| AlignError::UnresolvedBoundary {
                boundary_id: boundary_id.to_string(),
                annotation_id: annotation.id.clone(),
                tier_id: tier_id.to_string(),
            })
    }
}
