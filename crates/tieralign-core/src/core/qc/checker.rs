//! Interval Checker
//!
//! Walks every utterance tier pair in document order and reports intervals
//! whose counts or texts do not line up.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::finding::{Finding, FindingKind, TimeRange};
use crate::core::align::pair_tiers;
use crate::core::eaf::{EafDocument, TierClassifier, TimelineIndex};
use crate::core::fs::document_stem;
use crate::core::settings::ClassifierConfig;
use crate::core::AlignResult;

/// Summary line of a document without findings
pub const CLEAN_SUMMARY: &str = "File seems to have no errors in intervals.";

/// Validity check result for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityReport {
    pub document: String,
    pub findings: Vec<Finding>,
}

impl ValidityReport {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            findings: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn count_mismatches(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| matches!(f.kind, FindingKind::CountMismatch { .. }))
            .count()
    }

    pub fn empty_fields(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| matches!(f.kind, FindingKind::EmptyField { .. }))
            .count()
    }

    /// One line per finding, or the clean message
    pub fn summary(&self) -> String {
        if self.is_clean() {
            return CLEAN_SUMMARY.to_string();
        }
        self.findings
            .iter()
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reports count mismatches and empty fields without modifying anything
#[derive(Debug, Clone, Default)]
pub struct IntervalChecker {
    classifier: TierClassifier,
}

impl IntervalChecker {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            classifier: TierClassifier::new(config),
        }
    }

    /// Checks a parsed document.
    ///
    /// Intervals are walked in lockstep up to the shorter tier. The tier
    /// order is the document's; no role heuristic is applied.
    pub fn check(&self, document: &EafDocument, name: &str) -> AlignResult<ValidityReport> {
        let timeline = TimelineIndex::build(document);
        let classification = self.classifier.classify(document, &timeline)?;
        let mut report = ValidityReport::new(name);

        for (first, second) in pair_tiers(&classification.utterance_tiers)? {
            if first.len() != second.len() {
                report.findings.push(Finding::count_mismatch(
                    &first.id,
                    first.len(),
                    &second.id,
                    second.len(),
                ));
            }

            for (a, b) in first.annotations.iter().zip(&second.annotations) {
                let (tier, interval) = match (&a.text, &b.text) {
                    (None, _) => (first, a),
                    (Some(_), None) => (second, b),
                    (Some(_), Some(_)) => continue,
                };
                report.findings.push(Finding::empty_field(
                    &tier.id,
                    a.text.as_deref(),
                    b.text.as_deref(),
                    TimeRange::new(interval.start_ms(), interval.end_ms()),
                ));
            }
        }

        debug!("{}: {} findings", name, report.findings.len());
        Ok(report)
    }

    /// Loads and checks a document file.
    pub fn check_file(&self, path: &Path) -> AlignResult<ValidityReport> {
        info!("Checking {}", path.display());
        let document = EafDocument::load(path)?;
        self.check(&document, &document_stem(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::eaf::fixtures::EafBuilder;
    use crate::core::AlignError;

    fn check(xml: &str) -> ValidityReport {
        let document = EafDocument::parse(xml).unwrap();
        IntervalChecker::default().check(&document, "test").unwrap()
    }

    #[test]
    fn test_clean_document() {
        let xml = EafBuilder::new()
            .utterance_tier("Мама", &[(0, 1000, Some("Привет"))])
            .utterance_tier("Mama-Spch", &[(0, 1000, Some("Hallo"))])
            .build();

        let report = check(&xml);
        assert!(report.is_clean());
        assert_eq!(report.summary(), CLEAN_SUMMARY);
    }

    #[test]
    fn test_count_mismatch() {
        let source: Vec<_> = (0..5).map(|k| (k * 1000, k * 1000 + 500, Some("да"))).collect();
        let target: Vec<_> = (0..4).map(|k| (k * 1000, k * 1000 + 500, Some("ja"))).collect();
        let xml = EafBuilder::new()
            .utterance_tier("Мама", &source)
            .utterance_tier("Mama-Spch", &target)
            .build();

        let report = check(&xml);
        assert_eq!(report.count_mismatches(), 1);
        assert_eq!(report.empty_fields(), 0);
        assert_eq!(
            report.findings[0].kind,
            FindingKind::CountMismatch {
                first_tier: "Мама".to_string(),
                first_count: 5,
                second_tier: "Mama-Spch".to_string(),
                second_count: 4,
            }
        );
    }

    #[test]
    fn test_empty_field_on_third_interval() {
        let xml = EafBuilder::new()
            .utterance_tier(
                "Мама",
                &[
                    (0, 1000, Some("Раз")),
                    (1000, 2000, Some("Два")),
                    (2000, 3000, Some("Три")),
                ],
            )
            .utterance_tier(
                "Mama-Spch",
                &[
                    (0, 1000, Some("Eins")),
                    (1000, 2000, Some("Zwei")),
                    (2040, 2960, None),
                ],
            )
            .build();

        let report = check(&xml);
        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(
            finding.kind,
            FindingKind::EmptyField {
                tier_id: "Mama-Spch".to_string(),
                first_text: Some("Три".to_string()),
                second_text: None,
            }
        );
        // Location comes from the tier whose text is missing
        assert_eq!(finding.location, Some(TimeRange::new(2040, 2960)));
        assert_ne!(report.summary(), CLEAN_SUMMARY);
    }

    #[test]
    fn test_empty_source_reported_on_first_tier() {
        let xml = EafBuilder::new()
            .utterance_tier("Мама", &[(0, 1000, None)])
            .utterance_tier("Mama-Spch", &[(0, 1000, None)])
            .build();

        let report = check(&xml);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].tiers, vec!["Мама".to_string()]);
    }

    #[test]
    fn test_no_drop_heuristic_in_checks() {
        // A stray target blank shifts the lockstep walk; the checker reports
        // what it sees instead of healing it.
        let xml = EafBuilder::new()
            .utterance_tier("Мама", &[(1000, 2000, Some("Да"))])
            .utterance_tier("Mama-Spch", &[(0, 300, None), (1000, 2000, Some("Ja"))])
            .build();

        let report = check(&xml);
        assert_eq!(report.count_mismatches(), 1);
        assert_eq!(report.empty_fields(), 1);
    }

    #[test]
    fn test_odd_tier_count_fails() {
        let xml = EafBuilder::new()
            .utterance_tier("Мама", &[(0, 1000, Some("Привет"))])
            .build();
        let document = EafDocument::parse(&xml).unwrap();

        let err = IntervalChecker::default().check(&document, "odd").unwrap_err();
        assert!(matches!(err, AlignError::MalformedTierCount { count: 1 }));
    }

    #[test]
    fn test_check_file_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session01.eaf");
        let xml = EafBuilder::new()
            .utterance_tier("Мама", &[(0, 1000, Some("Привет"))])
            .utterance_tier("Mama-Spch", &[(0, 1000, Some("Hallo"))])
            .build();
        std::fs::write(&path, xml).unwrap();

        let report = IntervalChecker::default().check_file(&path).unwrap();
        assert_eq!(report.document, "session01");
    }
}
