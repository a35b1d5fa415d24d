//! Subtitled Video Fragments
//!
//! Turns aligned records into one subtitled video fragment each.
//!
//! ```text
//! records ──plan_subtitles──▶ SubtitleJob (.srt → .ass)
//!         ──plan_cuts───────▶ CutJob      (deduplicated per batch)
//!         ──FragmentDriver──▶ encoder calls
//! ```

mod driver;
mod planner;

pub use driver::{FragmentDriver, FragmentSummary};
pub use planner::{
    find_video, fragment_name, plan_cuts, plan_subtitles, subtitle_dir, BatchState, CutJob,
    SubtitleJob,
};
