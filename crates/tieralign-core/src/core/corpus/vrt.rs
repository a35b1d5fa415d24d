//! VRT rendering and file output

use std::path::{Path, PathBuf};

use tracing::info;

use super::tokenizer::{Tokenizer, WordTokenizer};
use crate::core::align::AlignedRecord;
use crate::core::fs::atomic_write_bytes;
use crate::core::settings::CorpusSettings;
use crate::core::{AlignResult, SequenceNo};

/// Which text of a record a VRT file carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusStream {
    Source,
    Target,
    Annotation,
}

impl CorpusStream {
    pub const ALL: [CorpusStream; 3] = [Self::Source, Self::Target, Self::Annotation];

    fn text<'r>(&self, record: &'r AlignedRecord) -> Option<&'r str> {
        match self {
            Self::Source => record.source_text.as_deref(),
            Self::Target => record.target_text.as_deref(),
            Self::Annotation => Some(record.auxiliary_text.as_str()),
        }
    }

    fn language<'s>(&self, settings: &'s CorpusSettings) -> &'s str {
        match self {
            Self::Source => &settings.source_language,
            Self::Target => &settings.target_language,
            Self::Annotation => &settings.annotation_language,
        }
    }

    /// File name suffix: the language label, `annot` for annotations
    fn suffix<'s>(&self, settings: &'s CorpusSettings) -> &'s str {
        match self {
            Self::Annotation => "annot",
            _ => self.language(settings),
        }
    }
}

/// Renders one VRT document.
///
/// Absent text produces an empty block. Lines are joined with `\n` and the
/// output has no trailing newline.
pub fn render_vrt<'r, I, T>(
    utterances: I,
    filename: &str,
    language: &str,
    align_tag: &str,
    tokenizer: &T,
) -> String
where
    I: IntoIterator<Item = (SequenceNo, Option<&'r str>)>,
    T: Tokenizer + ?Sized,
{
    let mut lines = vec![format!("<meta filename={}, language={}>", filename, language)];
    for (id, text) in utterances {
        lines.push(format!("<{} id={}>", align_tag, id));
        if let Some(text) = text {
            lines.extend(tokenizer.tokenize(text).into_iter().map(str::to_string));
        }
        lines.push(format!("</{}>", align_tag));
    }
    lines.push("</meta>".to_string());
    lines.join("\n")
}

/// Paths of the files written for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFiles {
    pub source: PathBuf,
    pub target: PathBuf,
    pub annotation: PathBuf,
}

/// Writes the three VRT files of a document
#[derive(Debug, Clone)]
pub struct CorpusWriter<T: Tokenizer = WordTokenizer> {
    settings: CorpusSettings,
    output_dir: PathBuf,
    tokenizer: T,
}

impl CorpusWriter<WordTokenizer> {
    pub fn new(settings: &CorpusSettings) -> Self {
        Self::with_tokenizer(settings, WordTokenizer)
    }
}

impl<T: Tokenizer> CorpusWriter<T> {
    pub fn with_tokenizer(settings: &CorpusSettings, tokenizer: T) -> Self {
        Self {
            settings: settings.clone(),
            output_dir: PathBuf::from(&settings.output_dir),
            tokenizer,
        }
    }

    /// Overrides the configured output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders one stream of a document's records.
    pub fn render(&self, stem: &str, records: &[AlignedRecord], stream: CorpusStream) -> String {
        render_vrt(
            records.iter().map(|r| (r.sequence_id, stream.text(r))),
            stem,
            stream.language(&self.settings),
            &self.settings.align_tag,
            &self.tokenizer,
        )
    }

    fn path_for(&self, stem: &str, stream: CorpusStream) -> PathBuf {
        self.output_dir
            .join(format!("{}-{}.vrt", stem, stream.suffix(&self.settings)))
    }

    /// Writes `<stem>-<SRC>.vrt`, `<stem>-<TGT>.vrt` and `<stem>-annot.vrt`.
    pub fn write(&self, stem: &str, records: &[AlignedRecord]) -> AlignResult<CorpusFiles> {
        for stream in CorpusStream::ALL {
            let content = self.render(stem, records, stream);
            atomic_write_bytes(&self.path_for(stem, stream), content.as_bytes())?;
        }

        info!(
            "Wrote corpus files for {} ({} utterances) to {}",
            stem,
            records.len(),
            self.output_dir.display()
        );

        Ok(CorpusFiles {
            source: self.path_for(stem, CorpusStream::Source),
            target: self.path_for(stem, CorpusStream::Target),
            annotation: self.path_for(stem, CorpusStream::Annotation),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: SequenceNo, source: Option<&str>, target: Option<&str>, aux: &str) -> AlignedRecord {
        AlignedRecord {
            sequence_id: id,
            start_ms: u64::from(id) * 1000,
            end_ms: u64::from(id) * 1000 + 500,
            source_text: source.map(str::to_string),
            target_text: target.map(str::to_string),
            auxiliary_text: aux.to_string(),
            tier_group: "Mama".to_string(),
        }
    }

    #[test]
    fn test_render_vrt_format() {
        let vrt = render_vrt(
            [(1, Some("Hallo, Welt!")), (2, Some("Ja"))],
            "interview",
            "DE",
            "Align_RU_DE",
            &WordTokenizer,
        );

        assert_eq!(
            vrt,
            "<meta filename=interview, language=DE>\n\
             <Align_RU_DE id=1>\nHallo\n,\nWelt\n!\n</Align_RU_DE>\n\
             <Align_RU_DE id=2>\nJa\n</Align_RU_DE>\n\
             </meta>"
        );
    }

    #[test]
    fn test_absent_text_renders_empty_block() {
        let vrt = render_vrt([(1, None)], "x", "RU", "Align_RU_DE", &WordTokenizer);
        assert_eq!(
            vrt,
            "<meta filename=x, language=RU>\n<Align_RU_DE id=1>\n</Align_RU_DE>\n</meta>"
        );
    }

    #[test]
    fn test_render_streams() {
        let writer = CorpusWriter::new(&CorpusSettings::default());
        let records = vec![record(1, Some("Да"), None, "lacht nickt")];

        let ru = writer.render("s", &records, CorpusStream::Source);
        let de = writer.render("s", &records, CorpusStream::Target);
        let annot = writer.render("s", &records, CorpusStream::Annotation);

        assert!(ru.starts_with("<meta filename=s, language=RU>"));
        assert!(ru.contains("\nДа\n"));
        assert!(de.contains("<Align_RU_DE id=1>\n</Align_RU_DE>"));
        assert!(annot.starts_with("<meta filename=s, language=annotation>"));
        assert!(annot.contains("\nlacht\nnickt\n"));
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("VRT");
        let writer = CorpusWriter::new(&CorpusSettings::default()).with_output_dir(&out);
        let records = vec![
            record(1, Some("Привет"), Some("Hallo"), ""),
            record(2, Some("Пока"), Some("Tschüss"), "winkt"),
        ];

        let files = writer.write("session01", &records).unwrap();

        assert_eq!(files.source, out.join("session01-RU.vrt"));
        assert_eq!(files.target, out.join("session01-DE.vrt"));
        assert_eq!(files.annotation, out.join("session01-annot.vrt"));

        let de = std::fs::read_to_string(&files.target).unwrap();
        assert!(de.ends_with("</meta>"));
        assert!(de.contains("<Align_RU_DE id=2>\nTschüss\n</Align_RU_DE>"));
    }
}
