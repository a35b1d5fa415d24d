//! Interval Validity Reporting
//!
//! Read-only checks of utterance tier pairs. Findings are reported, never
//! corrected: the drop heuristic is not applied here.

pub mod checker;
pub mod finding;

pub use checker::{IntervalChecker, ValidityReport, CLEAN_SUMMARY};
pub use finding::{Finding, FindingKind, Severity, TimeRange};
