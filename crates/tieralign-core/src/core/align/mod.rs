//! Tier Pairing & Alignment
//!
//! Turns classified tiers into one chronological list of aligned records:
//!
//! ```text
//! utterance tiers ──pair_tiers──▶ (first, second)
//!                 ──assign_roles─▶ TierPair { source, target }
//!                 ──Reconciler───▶ Vec<AlignedPair>   (+ AlignmentAudit)
//!                 ──sequence─────▶ Vec<AlignedRecord> (sequence_id 1..N)
//! ```

mod audit;
mod pairing;
mod pipeline;
mod reconcile;
mod sequencer;

pub use audit::{AlignmentAudit, AuditEvent};
pub use pairing::{assign_roles, pair_tiers, RoleDecision, TierPair};
pub use pipeline::{Aligner, DocumentAlignment};
pub use reconcile::{AlignedPair, Reconciler};
pub use sequencer::{sequence, AlignedRecord};
