//! Document alignment pipeline
//!
//! Runs the full chain for one document and returns its records together
//! with the audit of every corrective decision taken on the way.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::audit::AlignmentAudit;
use super::pairing::{assign_roles, pair_tiers};
use super::reconcile::Reconciler;
use super::sequencer::{sequence, AlignedRecord};
use crate::core::eaf::{EafDocument, TierClassifier, TimelineIndex};
use crate::core::settings::AlignSettings;
use crate::core::AlignResult;

/// Aligned records of one document plus its audit
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAlignment {
    pub records: Vec<AlignedRecord>,
    pub audit: AlignmentAudit,
}

impl DocumentAlignment {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Classifies, pairs, reconciles and sequences documents
#[derive(Debug, Clone, Default)]
pub struct Aligner {
    classifier: TierClassifier,
    reconciler: Reconciler,
}

impl Aligner {
    pub fn new(settings: &AlignSettings) -> Self {
        Self {
            classifier: TierClassifier::new(&settings.classifier),
            reconciler: Reconciler::new(settings.alignment.proximity_ms),
        }
    }

    pub fn classifier(&self) -> &TierClassifier {
        &self.classifier
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Aligns a parsed document.
    ///
    /// Documents without utterance tiers yield an empty alignment.
    pub fn align(&self, document: &EafDocument) -> AlignResult<DocumentAlignment> {
        let timeline = TimelineIndex::build(document);
        let classification = self.classifier.classify(document, &timeline)?;
        let mut audit = AlignmentAudit::new();

        let per_pair = pair_tiers(&classification.utterance_tiers)?
            .into_iter()
            .map(|(first, second)| {
                let pair = assign_roles(first, second, &mut audit);
                debug!(
                    "Pair {} -> {} ({:?})",
                    pair.source.id, pair.target.id, pair.role
                );
                let auxiliary = classification.auxiliary.lookup(pair.group_key());
                self.reconciler.reconcile(&pair, auxiliary, &mut audit)
            })
            .collect();

        Ok(DocumentAlignment {
            records: sequence(per_pair),
            audit,
        })
    }

    /// Loads and aligns a document file.
    pub fn align_file(&self, path: &Path) -> AlignResult<DocumentAlignment> {
        let document = EafDocument::load(path)?;
        let alignment = self.align(&document)?;

        info!(
            "Aligned {}: {} records, {} dropped intervals",
            path.display(),
            alignment.len(),
            alignment.audit.dropped_count()
        );

        Ok(alignment)
    }
}
