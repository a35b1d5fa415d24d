//! Tier Reshaping
//!
//! Rewrites a document so that the tiers named in a metadata table become
//! utterance tiers, ordered in the table's pairs ahead of every other tier.
//! Documents rewritten this way classify and pair without relying on the
//! naming heuristic.

mod metadata;
mod reorder;

pub use metadata::{load_tier_pairs, read_tier_pairs, TierPairSpec};
pub use reorder::{reshape_document, reshape_file, TierReshaper};
