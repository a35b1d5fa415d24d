//! ELAN Annotation Documents
//!
//! Reading side of the engine:
//! - `document.rs` - owned view of the XML (time slots, tiers, annotations)
//! - `timeline.rs` - boundary id → millisecond index
//! - `tiers.rs`    - utterance/auxiliary classification and group keys

mod document;
#[cfg(test)]
pub(crate) mod fixtures;
mod tiers;
mod timeline;

pub use document::{EafDocument, RawAnnotation, RawTier, TimeSlot};
pub use tiers::{
    Annotation, AuxiliaryGroups, AuxiliaryLookup, Classification, SuffixTable, Tier,
    TierClassifier, TierKind, TimedInterval,
};
pub use timeline::TimelineIndex;
