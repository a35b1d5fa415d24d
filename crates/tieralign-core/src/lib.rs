//! Tieralign Core Library
//!
//! Alignment engine for bilingual (Russian/German) ELAN annotation documents.
//! This library contains the document model, tier pairing and reconciliation,
//! the interval validity checker, and the corpus, subtitle and reshaping
//! consumers built on top of the aligned records.

pub mod core;

pub use crate::core::{AlignError, AlignResult};
