//! Fragment Subtitles
//!
//! Each cut fragment gets its own subtitle file whose single cue starts at
//! zero, so the encoder can seek before opening the input.
//!
//! ```text
//! AlignedRecord ──fragment_cue──▶ Cue ──export_srt──▶ .srt ──encoder──▶ .ass
//! ```

mod formats;

pub use formats::{export_srt, format_srt_timestamp, fragment_cue, Cue};
