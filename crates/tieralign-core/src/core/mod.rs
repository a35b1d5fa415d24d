//! Tieralign Core Engine
//!
//! Data flows one document at a time:
//! timeline index → tier classifier → pairing & reconciliation → sequencer → consumers.

pub mod align;
pub mod batch;
pub mod captions;
pub mod corpus;
pub mod eaf;
pub mod ffmpeg;
pub mod fragments;
pub mod fs;
pub mod qc;
pub mod reshape;
pub mod settings;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
