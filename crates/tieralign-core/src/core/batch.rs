//! Batch processing
//!
//! Documents are processed one at a time and independently. An error that
//! only concerns one document is logged and counted and the batch moves on;
//! any other error ends the batch.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::error;

use crate::core::AlignResult;

/// A document that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome counts of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: Vec<DocumentFailure>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the result of one document.
    ///
    /// Returns the value on success and `None` for a document-level failure;
    /// other errors are passed through.
    pub fn record<T>(&mut self, path: &Path, result: AlignResult<T>) -> AlignResult<Option<T>> {
        match result {
            Ok(value) => {
                self.succeeded += 1;
                Ok(Some(value))
            }
            Err(e) if e.is_document_fatal() => {
                error!("{}: {}", path.display(), e);
                self.failed.push(DocumentFailure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs `process` over every document, continuing past document failures.
pub fn run_batch<T, F>(
    documents: &[PathBuf],
    mut process: F,
) -> AlignResult<(Vec<(PathBuf, T)>, BatchSummary)>
where
    F: FnMut(&Path) -> AlignResult<T>,
{
    let mut summary = BatchSummary::new();
    let mut outputs = Vec::with_capacity(documents.len());

    for path in documents {
        if let Some(value) = summary.record(path, process(path))? {
            outputs.push((path.clone(), value));
        }
    }

    Ok((outputs, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AlignError;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_batch_continues_after_document_failure() {
        let documents = paths(&["a.eaf", "b.eaf", "c.eaf"]);

        let (outputs, summary) = run_batch(&documents, |path| {
            if path.ends_with("b.eaf") {
                Err(AlignError::MalformedTierCount { count: 3 })
            } else {
                Ok(path.display().to_string())
            }
        })
        .unwrap();

        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].1, "c.eaf");
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].path, PathBuf::from("b.eaf"));
        assert!(!summary.is_success());
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_batch_aborts_on_non_document_error() {
        let documents = paths(&["a.eaf", "b.eaf"]);
        let mut seen = 0;

        let result = run_batch(&documents, |_| {
            seen += 1;
            Err::<(), _>(AlignError::Config("broken".to_string()))
        });

        assert!(matches!(result, Err(AlignError::Config(_))));
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_empty_batch() {
        let (outputs, summary) = run_batch(&[], |_| Ok(())).unwrap();
        assert!(outputs.is_empty());
        assert!(summary.is_success());
    }
}
