//! Tier pairing and role assignment
//!
//! Every two consecutive utterance tiers form a pair. Within a pair the tier
//! whose identifier contains Latin letters is taken as the translation
//! (target). This is a naming convention, not a guarantee; documents that
//! break it align with swapped roles, which the audit reports as ambiguous.

use serde::Serialize;

use super::audit::{AlignmentAudit, AuditEvent};
use crate::core::eaf::Tier;
use crate::core::{AlignError, AlignResult, GroupKey};

/// How the source/target roles of a pair were decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleDecision {
    /// The second tier is the Latin-script one
    DocumentOrder,
    /// The first tier is the Latin-script one, so the pair was swapped
    Swapped,
    /// The heuristic could not decide; document order kept
    Ambiguous,
}

/// A source/target pair of utterance tiers
#[derive(Debug, Clone, Copy)]
pub struct TierPair<'a> {
    pub source: &'a Tier,
    pub target: &'a Tier,
    pub role: RoleDecision,
}

impl TierPair<'_> {
    /// Group key used to find auxiliary tiers: the target's speaker key
    pub fn group_key(&self) -> &GroupKey {
        &self.target.group_key
    }
}

/// Groups consecutive tiers two at a time, in document order.
pub fn pair_tiers(tiers: &[Tier]) -> AlignResult<Vec<(&Tier, &Tier)>> {
    if tiers.len() % 2 != 0 {
        return Err(AlignError::MalformedTierCount { count: tiers.len() });
    }

    Ok(tiers
        .chunks_exact(2)
        .map(|chunk| (&chunk[0], &chunk[1]))
        .collect())
}

/// Decides which tier of a pair is the source and which the target.
pub fn assign_roles<'a>(
    first: &'a Tier,
    second: &'a Tier,
    audit: &mut AlignmentAudit,
) -> TierPair<'a> {
    match (first.has_latin_letters(), second.has_latin_letters()) {
        (false, true) => TierPair {
            source: first,
            target: second,
            role: RoleDecision::DocumentOrder,
        },
        (true, false) => {
            audit.record(AuditEvent::RoleOverride {
                first_tier: first.id.clone(),
                second_tier: second.id.clone(),
            });
            TierPair {
                source: second,
                target: first,
                role: RoleDecision::Swapped,
            }
        }
        _ => {
            audit.record(AuditEvent::RoleAmbiguous {
                first_tier: first.id.clone(),
                second_tier: second.id.clone(),
            });
            TierPair {
                source: first,
                target: second,
                role: RoleDecision::Ambiguous,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::eaf::TierKind;

    fn tier(id: &str) -> Tier {
        Tier::new(id, TierKind::Utterance, id, vec![])
    }

    #[test]
    fn test_pair_tiers_in_document_order() {
        let tiers = vec![tier("Мама"), tier("Mama"), tier("Папа"), tier("Papa")];
        let pairs = pair_tiers(&tiers).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.id, "Мама");
        assert_eq!(pairs[0].1.id, "Mama");
        assert_eq!(pairs[1].0.id, "Папа");
    }

    #[test]
    fn test_pair_tiers_odd_count() {
        let tiers = vec![tier("Мама"), tier("Mama"), tier("Папа")];
        let err = pair_tiers(&tiers).unwrap_err();
        assert!(matches!(err, AlignError::MalformedTierCount { count: 3 }));
    }

    #[test]
    fn test_latin_tier_is_target_regardless_of_order() {
        let russian = tier("РусскийТекст");
        let german = tier("GermanText");
        let mut audit = AlignmentAudit::new();

        let pair = assign_roles(&russian, &german, &mut audit);
        assert_eq!(pair.target.id, "GermanText");
        assert_eq!(pair.role, RoleDecision::DocumentOrder);
        assert!(audit.is_empty());

        let pair = assign_roles(&german, &russian, &mut audit);
        assert_eq!(pair.source.id, "РусскийТекст");
        assert_eq!(pair.target.id, "GermanText");
        assert_eq!(pair.role, RoleDecision::Swapped);
        assert!(matches!(audit.events()[0], AuditEvent::RoleOverride { .. }));
    }

    #[test]
    fn test_ambiguous_roles_keep_document_order() {
        let first = tier("Speaker1");
        let second = tier("Speaker1-Spch");
        let mut audit = AlignmentAudit::new();

        let pair = assign_roles(&first, &second, &mut audit);
        assert_eq!(pair.source.id, "Speaker1");
        assert_eq!(pair.target.id, "Speaker1-Spch");
        assert_eq!(pair.role, RoleDecision::Ambiguous);
        assert_eq!(audit.len(), 1);
    }
}
