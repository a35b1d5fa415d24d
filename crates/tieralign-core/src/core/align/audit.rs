//! Alignment audit channel
//!
//! Everything reconciliation decides silently (dropped intervals, swapped or
//! ambiguous roles, diverging end times) is recorded here and logged.

use serde::Serialize;
use tracing::warn;

use crate::core::{format_clock, TierId, TimeMs};

/// A single self-healing decision taken during alignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AuditEvent {
    /// An interval without a partner within the proximity threshold was dropped
    #[serde(rename_all = "camelCase")]
    DroppedInterval {
        tier_id: TierId,
        start_ms: TimeMs,
        end_ms: TimeMs,
        text: Option<String>,
    },
    /// Intervals left on one tier after the other was exhausted
    #[serde(rename_all = "camelCase")]
    Unpaired { tier_id: TierId, remaining: usize },
    /// The second tier of a pair was assigned the source role
    #[serde(rename_all = "camelCase")]
    RoleOverride {
        first_tier: TierId,
        second_tier: TierId,
    },
    /// Both or neither tier id contains Latin letters; document order kept
    #[serde(rename_all = "camelCase")]
    RoleAmbiguous {
        first_tier: TierId,
        second_tier: TierId,
    },
    /// Paired intervals start together but end apart; the source end is kept
    #[serde(rename_all = "camelCase")]
    EndMismatch {
        source_tier: TierId,
        target_tier: TierId,
        start_ms: TimeMs,
        source_end_ms: TimeMs,
        target_end_ms: TimeMs,
    },
}

impl std::fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DroppedInterval {
                tier_id,
                start_ms,
                end_ms,
                text,
            } => write!(
                f,
                "Dropped unpaired interval on {} between {} and {} ({})",
                tier_id,
                format_clock(*start_ms),
                format_clock(*end_ms),
                text.as_deref().unwrap_or("<empty>")
            ),
            Self::Unpaired { tier_id, remaining } => write!(
                f,
                "{} trailing interval(s) on {} have no partner",
                remaining, tier_id
            ),
            Self::RoleOverride {
                first_tier,
                second_tier,
            } => write!(
                f,
                "Tier {} takes the source role before {}",
                second_tier, first_tier
            ),
            Self::RoleAmbiguous {
                first_tier,
                second_tier,
            } => write!(
                f,
                "Cannot tell translation tier between {} and {}, keeping document order",
                first_tier, second_tier
            ),
            Self::EndMismatch {
                source_tier,
                target_tier,
                start_ms,
                source_end_ms,
                target_end_ms,
            } => write!(
                f,
                "Interval at {} ends at {} on {} but at {} on {}",
                format_clock(*start_ms),
                format_clock(*source_end_ms),
                source_tier,
                format_clock(*target_end_ms),
                target_tier
            ),
        }
    }
}

/// Ordered record of audit events for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentAudit {
    events: Vec<AuditEvent>,
}

impl AlignmentAudit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records and logs an event
    pub fn record(&mut self, event: AuditEvent) {
        warn!("{}", event);
        self.events.push(event);
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of intervals removed by the drop heuristic
    pub fn dropped_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AuditEvent::DroppedInterval { .. }))
            .count()
    }

    pub fn extend(&mut self, other: AlignmentAudit) {
        self.events.extend(other.events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropped_count() {
        let mut audit = AlignmentAudit::new();
        audit.record(AuditEvent::DroppedInterval {
            tier_id: "Мама".to_string(),
            start_ms: 0,
            end_ms: 200,
            text: None,
        });
        audit.record(AuditEvent::RoleAmbiguous {
            first_tier: "A".to_string(),
            second_tier: "B".to_string(),
        });

        assert_eq!(audit.len(), 2);
        assert_eq!(audit.dropped_count(), 1);
    }

    #[test]
    fn test_event_display() {
        let event = AuditEvent::DroppedInterval {
            tier_id: "Mama-Spch".to_string(),
            start_ms: 1_500,
            end_ms: 2_000,
            text: None,
        };
        let msg = event.to_string();
        assert!(msg.contains("Mama-Spch"));
        assert!(msg.contains("0:00:01.500"));
        assert!(msg.contains("<empty>"));
    }

    #[test]
    fn test_event_serialization() {
        let event = AuditEvent::Unpaired {
            tier_id: "Мама".to_string(),
            remaining: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "unpaired");
        assert_eq!(json["tierId"], "Мама");
        assert_eq!(json["remaining"], 2);
    }
}
