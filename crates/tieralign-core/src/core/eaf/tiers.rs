//! Tier Classifier
//!
//! Splits a document's tiers into utterance tiers (paired across languages)
//! and auxiliary annotation tiers grouped by speaker, and resolves their
//! intervals against the timeline index.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::document::{EafDocument, RawTier};
use super::timeline::TimelineIndex;
use crate::core::settings::ClassifierConfig;
use crate::core::{AlignError, AlignResult, GroupKey, TierId, TimeMs};

// =============================================================================
// Intervals
// =============================================================================

/// A resolved time span, `start_ms <= end_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedInterval {
    pub start_ms: TimeMs,
    pub end_ms: TimeMs,
}

impl TimedInterval {
    pub fn new(start_ms: TimeMs, end_ms: TimeMs) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn duration_ms(&self) -> TimeMs {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Absolute distance between the two start boundaries
    pub fn start_distance(&self, other: &TimedInterval) -> TimeMs {
        self.start_ms.abs_diff(other.start_ms)
    }
}

/// A resolved interval with its (possibly absent) text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub interval: TimedInterval,
    pub text: Option<String>,
}

impl Annotation {
    pub fn new(start_ms: TimeMs, end_ms: TimeMs, text: Option<&str>) -> Self {
        Self {
            interval: TimedInterval::new(start_ms, end_ms),
            text: text.map(str::to_string),
        }
    }

    pub fn start_ms(&self) -> TimeMs {
        self.interval.start_ms
    }

    pub fn end_ms(&self) -> TimeMs {
        self.interval.end_ms
    }
}

// =============================================================================
// Tiers
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierKind {
    Utterance,
    Auxiliary,
}

/// A classified tier with resolved intervals in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub id: TierId,
    pub kind: TierKind,
    pub group_key: GroupKey,
    pub annotations: Vec<Annotation>,
}

impl Tier {
    pub fn new(
        id: impl Into<TierId>,
        kind: TierKind,
        group_key: impl Into<GroupKey>,
        annotations: Vec<Annotation>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            group_key: group_key.into(),
            annotations,
        }
    }

    fn resolve(
        raw: &RawTier,
        kind: TierKind,
        group_key: GroupKey,
        timeline: &TimelineIndex,
    ) -> AlignResult<Self> {
        let annotations = raw
            .annotations
            .iter()
            .map(|aa| {
                Ok(Annotation {
                    interval: timeline.resolve(aa, &raw.id)?,
                    text: aa.value.clone(),
                })
            })
            .collect::<AlignResult<Vec<_>>>()?;

        Ok(Self::new(raw.id.clone(), kind, group_key, annotations))
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Whether the identifier contains Latin letters (translation tiers do)
    pub fn has_latin_letters(&self) -> bool {
        self.id.chars().any(|c| c.is_ascii_alphabetic())
    }
}

// =============================================================================
// Suffix Table
// =============================================================================

/// Ordered set of identifier suffixes, longest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixTable {
    suffixes: Vec<String>,
}

impl SuffixTable {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut suffixes: Vec<String> = suffixes
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.is_empty())
            .collect();
        suffixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        suffixes.dedup();
        Self { suffixes }
    }

    /// Every `separator + kind` combination, e.g. `" NVK"` and `"-NVK"`.
    pub fn from_kinds(kinds: &[String], separators: &[String]) -> Self {
        Self::new(
            kinds
                .iter()
                .flat_map(|kind| separators.iter().map(move |sep| format!("{sep}{kind}"))),
        )
    }

    /// Strips the longest matching suffix: `(matched, stripped_id)`.
    pub fn strip(&self, id: &str) -> (bool, String) {
        match self.suffixes.iter().find(|s| id.ends_with(s.as_str())) {
            Some(suffix) => (true, id[..id.len() - suffix.len()].to_string()),
            None => (false, id.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }
}

// =============================================================================
// Auxiliary Groups
// =============================================================================

/// Result of looking up a group's auxiliary tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxiliaryLookup<'a> {
    Group(&'a [Tier]),
    NoGroup,
}

/// Auxiliary tiers by group key, each list in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuxiliaryGroups {
    groups: HashMap<GroupKey, Vec<Tier>>,
}

impl AuxiliaryGroups {
    pub fn insert(&mut self, tier: Tier) {
        self.groups
            .entry(tier.group_key.clone())
            .or_default()
            .push(tier);
    }

    pub fn lookup(&self, group_key: &str) -> AuxiliaryLookup<'_> {
        match self.groups.get(group_key) {
            Some(tiers) => AuxiliaryLookup::Group(tiers),
            None => AuxiliaryLookup::NoGroup,
        }
    }

    /// Number of distinct groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn tier_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Classified tiers of one document
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Utterance tiers in document order; always an even count
    pub utterance_tiers: Vec<Tier>,
    pub auxiliary: AuxiliaryGroups,
}

/// Classifies tiers by linguistic type and identifier suffix
#[derive(Debug, Clone)]
pub struct TierClassifier {
    utterance_types: HashSet<String>,
    auxiliary_suffixes: SuffixTable,
    speaker_suffixes: SuffixTable,
}

impl Default for TierClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl TierClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            utterance_types: config.utterance_types.iter().cloned().collect(),
            auxiliary_suffixes: SuffixTable::from_kinds(
                &config.auxiliary_kinds,
                &config.auxiliary_separators,
            ),
            speaker_suffixes: SuffixTable::new(config.speaker_suffixes.iter().cloned()),
        }
    }

    pub fn is_utterance(&self, tier: &RawTier) -> bool {
        tier.linguistic_type
            .as_deref()
            .is_some_and(|t| self.utterance_types.contains(t))
    }

    /// Group key of an utterance tier: the id without its speaker-role suffix
    pub fn utterance_group_key(&self, tier_id: &str) -> GroupKey {
        self.speaker_suffixes.strip(tier_id).1
    }

    /// Group key of an auxiliary tier, or `None` if no annotation-kind suffix matches
    pub fn auxiliary_group_key(&self, tier_id: &str) -> Option<GroupKey> {
        match self.auxiliary_suffixes.strip(tier_id) {
            (true, speaker) => Some(self.speaker_suffixes.strip(&speaker).1),
            (false, _) => None,
        }
    }

    /// Classifies every tier and resolves the intervals of the ones kept.
    ///
    /// Fails with `MalformedTierCount` before resolving anything when the
    /// number of utterance tiers is odd.
    pub fn classify(
        &self,
        document: &EafDocument,
        timeline: &TimelineIndex,
    ) -> AlignResult<Classification> {
        let mut utterance_raw = Vec::new();
        let mut auxiliary_raw = Vec::new();

        for raw in &document.tiers {
            if self.is_utterance(raw) {
                utterance_raw.push(raw);
            } else if let Some(group_key) = self.auxiliary_group_key(&raw.id) {
                auxiliary_raw.push((group_key, raw));
            }
        }

        if utterance_raw.len() % 2 != 0 {
            return Err(AlignError::MalformedTierCount {
                count: utterance_raw.len(),
            });
        }

        let utterance_tiers = utterance_raw
            .into_iter()
            .map(|raw| {
                let group_key = self.utterance_group_key(&raw.id);
                Tier::resolve(raw, TierKind::Utterance, group_key, timeline)
            })
            .collect::<AlignResult<Vec<_>>>()?;

        let mut auxiliary = AuxiliaryGroups::default();
        for (group_key, raw) in auxiliary_raw {
            auxiliary.insert(Tier::resolve(raw, TierKind::Auxiliary, group_key, timeline)?);
        }

        debug!(
            "Classified {} utterance tiers, {} auxiliary tiers in {} groups",
            utterance_tiers.len(),
            auxiliary.tier_count(),
            auxiliary.len()
        );

        Ok(Classification {
            utterance_tiers,
            auxiliary,
        })
    }
}
