//! SRT export

use serde::Serialize;

use crate::core::align::AlignedRecord;
use crate::core::TimeMs;

/// A subtitle cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    pub start_ms: TimeMs,
    pub end_ms: TimeMs,
    /// Lines shown together, top to bottom
    pub lines: Vec<String>,
}

impl Cue {
    pub fn new(start_ms: TimeMs, end_ms: TimeMs, lines: Vec<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            lines,
        }
    }
}

/// Builds the cue of a fragment cut at `record.start_ms`.
///
/// The cue spans the fragment's duration from zero and shows the source line
/// above the target line. Absent text yields an empty line.
pub fn fragment_cue(record: &AlignedRecord) -> Cue {
    Cue::new(
        0,
        record.duration_ms(),
        vec![
            record.source_text.clone().unwrap_or_default(),
            record.target_text.clone().unwrap_or_default(),
        ],
    )
}

/// Exports cues to SRT format
pub fn export_srt(cues: &[Cue]) -> String {
    let mut output = String::new();

    for (index, cue) in cues.iter().enumerate() {
        output.push_str(&format!("{}\n", index + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(cue.start_ms),
            format_srt_timestamp(cue.end_ms)
        ));
        for line in &cue.lines {
            output.push_str(line);
            output.push('\n');
        }
        output.push('\n');
    }

    output
}

/// Formats milliseconds as SRT timestamp (00:00:00,000)
pub fn format_srt_timestamp(ms: TimeMs) -> String {
    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_srt_timestamp() {
        assert_eq!(format_srt_timestamp(0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(1_500), "00:00:01,500");
        assert_eq!(format_srt_timestamp(90_000), "00:01:30,000");
        assert_eq!(format_srt_timestamp(5_400_007), "01:30:00,007");
    }

    #[test]
    fn test_fragment_cue_starts_at_zero() {
        let record = AlignedRecord {
            sequence_id: 4,
            start_ms: 61_000,
            end_ms: 63_250,
            source_text: Some("Привет".to_string()),
            target_text: None,
            auxiliary_text: String::new(),
            tier_group: "Mama".to_string(),
        };

        let cue = fragment_cue(&record);
        assert_eq!(cue.start_ms, 0);
        assert_eq!(cue.end_ms, 2_250);
        assert_eq!(cue.lines, vec!["Привет".to_string(), String::new()]);
    }

    #[test]
    fn test_export_srt() {
        let cue = Cue::new(0, 2_250, vec!["Привет".to_string(), "Hallo".to_string()]);

        assert_eq!(
            export_srt(&[cue]),
            "1\n00:00:00,000 --> 00:00:02,250\nПривет\nHallo\n\n"
        );
    }

    #[test]
    fn test_export_srt_numbers_cues() {
        let cues = vec![
            Cue::new(0, 1_000, vec!["a".to_string()]),
            Cue::new(1_000, 2_000, vec!["b".to_string()]),
        ];

        let srt = export_srt(&cues);
        assert!(srt.starts_with("1\n"));
        assert!(srt.contains("\n2\n00:00:01,000 --> 00:00:02,000\nb\n"));
    }
}
