//! Tier reordering
//!
//! Top-level children of the document root are kept as raw event streams so
//! that everything not being moved is written back unchanged apart from
//! indentation.

use std::fmt::Display;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::info;

use super::metadata::TierPairSpec;
use crate::core::fs::{atomic_write_bytes, backup_path_for};
use crate::core::{AlignError, AlignResult};

const TIER: &[u8] = b"TIER";
const LINGUISTIC_TYPE: &[u8] = b"LINGUISTIC_TYPE";

fn xml_error(e: impl Display) -> AlignError {
    AlignError::XmlParse(e.to_string())
}

// =============================================================================
// Raw Nodes
// =============================================================================

/// A top-level child of the root element with all its descendants
#[derive(Debug, Clone)]
struct Node {
    events: Vec<Event<'static>>,
}

impl Node {
    fn start(&self) -> Option<&BytesStart<'static>> {
        match self.events.first() {
            Some(Event::Start(e)) | Some(Event::Empty(e)) => Some(e),
            _ => None,
        }
    }

    fn is_element(&self, name: &[u8]) -> bool {
        self.start().is_some_and(|e| e.name().as_ref() == name)
    }

    fn attribute(&self, key: &[u8]) -> AlignResult<Option<String>> {
        let Some(start) = self.start() else {
            return Ok(None);
        };
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            if attr.key.as_ref() == key {
                return Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned()));
            }
        }
        Ok(None)
    }

    /// Replaces or appends an attribute, keeping the others in place.
    fn set_attribute(&mut self, key: &str, value: &str) -> AlignResult<()> {
        let Some(Event::Start(start) | Event::Empty(start)) = self.events.first_mut() else {
            return Ok(());
        };

        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut updated = BytesStart::new(name);
        let mut replaced = false;
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            if attr.key.as_ref() == key.as_bytes() {
                updated.push_attribute((key, value));
                replaced = true;
            } else {
                updated.push_attribute(attr);
            }
        }
        if !replaced {
            updated.push_attribute((key, value));
        }

        *start = updated;
        Ok(())
    }
}

fn is_blank(event: &Event<'_>) -> bool {
    matches!(event, Event::Text(t) if t.iter().all(u8::is_ascii_whitespace))
}

/// Appends a child event, dropping the indentation text before it.
fn push_child(events: &mut Vec<Event<'static>>, event: Event<'static>) {
    if events.last().is_some_and(is_blank) {
        events.pop();
    }
    events.push(event);
}

/// Closes the innermost open element.
///
/// An element without content becomes an empty element; whitespace that is
/// the only content of an element is kept as its text.
fn push_end(events: &mut Vec<Event<'static>>, end: Event<'static>) {
    let len = events.len();
    let sole_blank = len >= 2
        && is_blank(&events[len - 1])
        && matches!(events[len - 2], Event::Start(_));
    if !sole_blank && events.last().is_some_and(is_blank) {
        events.pop();
    }

    if let Some(Event::Start(start)) = events.last() {
        let start = start.clone();
        events.pop();
        events.push(Event::Empty(start));
    } else {
        events.push(end);
    }
}

struct RawDocument {
    root: BytesStart<'static>,
    children: Vec<Node>,
}

fn parse_raw(xml: &str) -> AlignResult<RawDocument> {
    let mut reader = Reader::from_str(xml);
    let mut root = None;
    let mut children = Vec::new();
    let mut current: Vec<Event<'static>> = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Eof => break,
            Event::Start(e) => {
                if depth == 0 {
                    root = Some(e.into_owned());
                } else {
                    push_child(&mut current, Event::Start(e.into_owned()));
                }
                depth += 1;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth >= 1 {
                    push_end(&mut current, Event::End(e.into_owned()));
                    if depth == 1 {
                        children.push(Node {
                            events: std::mem::take(&mut current),
                        });
                    }
                }
            }
            Event::Empty(e) => match depth {
                0 => root = Some(e.into_owned()),
                1 => children.push(Node {
                    events: vec![Event::Empty(e.into_owned())],
                }),
                _ => push_child(&mut current, Event::Empty(e.into_owned())),
            },
            Event::Comment(e) => match depth {
                0 => {}
                1 => children.push(Node {
                    events: vec![Event::Comment(e.into_owned())],
                }),
                _ => push_child(&mut current, Event::Comment(e.into_owned())),
            },
            Event::Text(e) if depth >= 2 => current.push(Event::Text(e.into_owned())),
            Event::CData(e) if depth >= 2 => current.push(Event::CData(e.into_owned())),
            // Declaration, doctype, processing instructions and
            // inter-element whitespace are regenerated on output.
            _ => {}
        }
    }

    if depth != 0 {
        return Err(AlignError::XmlParse(
            "unexpected end of document".to_string(),
        ));
    }

    match root {
        Some(root) => Ok(RawDocument { root, children }),
        None => Err(AlignError::XmlParse("document has no root element".to_string())),
    }
}

// =============================================================================
// Reshaper
// =============================================================================

/// Forces requested tiers into utterance classification and pair order
#[derive(Debug, Clone)]
pub struct TierReshaper {
    utterance_type: String,
}

impl Default for TierReshaper {
    fn default() -> Self {
        Self::new("utterance")
    }
}

impl TierReshaper {
    pub fn new(utterance_type: impl Into<String>) -> Self {
        Self {
            utterance_type: utterance_type.into(),
        }
    }

    /// Rewrites `xml` with the tiers of `pairs` first, in table order.
    ///
    /// Output order of the root's children: everything before the first
    /// tier, the requested tiers (source then target per pair), the other
    /// tiers in document order, the utterance `LINGUISTIC_TYPE` declaration
    /// if the document lacked it, then everything else. A tier named in
    /// several pairs is placed at its first mention.
    pub fn reshape(&self, xml: &str, pairs: &[TierPairSpec]) -> AlignResult<String> {
        let RawDocument { root, children } = parse_raw(xml)?;

        let first_tier = children.iter().position(|n| n.is_element(TIER));
        let mut before = Vec::new();
        let mut tiers = Vec::new();
        let mut after = Vec::new();
        for (index, node) in children.into_iter().enumerate() {
            if node.is_element(TIER) {
                tiers.push(node);
            } else if first_tier.is_some_and(|first| index > first) {
                after.push(node);
            } else {
                before.push(node);
            }
        }

        let tier_ids = tiers
            .iter()
            .map(|t| t.attribute(b"TIER_ID"))
            .collect::<AlignResult<Vec<_>>>()?;

        let mut requested: Vec<usize> = Vec::new();
        for pair in pairs {
            for id in [&pair.source_id, &pair.target_id] {
                let index = tier_ids
                    .iter()
                    .position(|t| t.as_deref() == Some(id.as_str()))
                    .ok_or_else(|| AlignError::TierNotFound(id.clone()))?;
                if !requested.contains(&index) {
                    requested.push(index);
                }
            }
        }

        for &index in &requested {
            tiers[index].set_attribute("LINGUISTIC_TYPE_REF", &self.utterance_type)?;
        }

        if !self.declares_utterance_type(before.iter().chain(&after))? {
            after.insert(0, self.utterance_type_node());
        }

        let ordered_tiers = requested
            .iter()
            .copied()
            .chain((0..tiers.len()).filter(|i| !requested.contains(i)))
            .map(|i| &tiers[i]);

        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
        writer
            .write_event(Event::Start(root.clone()))
            .map_err(xml_error)?;
        for node in before.iter().chain(ordered_tiers).chain(after.iter()) {
            for event in &node.events {
                writer.write_event(event).map_err(xml_error)?;
            }
        }
        writer
            .write_event(Event::End(root.to_end()))
            .map_err(xml_error)?;

        let mut output = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
        output.push('\n');
        Ok(output)
    }

    fn declares_utterance_type<'n>(
        &self,
        mut nodes: impl Iterator<Item = &'n Node>,
    ) -> AlignResult<bool> {
        nodes.try_fold(false, |found, node| {
            Ok(found
                || (node.is_element(LINGUISTIC_TYPE)
                    && node.attribute(b"LINGUISTIC_TYPE_ID")?.as_deref()
                        == Some(self.utterance_type.as_str())))
        })
    }

    fn utterance_type_node(&self) -> Node {
        let element = BytesStart::new("LINGUISTIC_TYPE").with_attributes([
            ("GRAPHIC_REFERENCES", "false"),
            ("LINGUISTIC_TYPE_ID", self.utterance_type.as_str()),
            ("TIME_ALIGNABLE", "true"),
        ]);
        Node {
            events: vec![Event::Empty(element)],
        }
    }
}

/// Reshapes with the default `utterance` type.
pub fn reshape_document(xml: &str, pairs: &[TierPairSpec]) -> AlignResult<String> {
    TierReshaper::default().reshape(xml, pairs)
}

/// Reshapes a document file in place, keeping a `<stem>_backup.<ext>` copy.
///
/// Nothing is written when reshaping fails.
pub fn reshape_file(
    reshaper: &TierReshaper,
    path: &Path,
    pairs: &[TierPairSpec],
) -> AlignResult<()> {
    let original = std::fs::read_to_string(path)?;
    let reshaped = reshaper.reshape(&original, pairs)?;

    let backup = backup_path_for(path);
    atomic_write_bytes(&backup, original.as_bytes())?;
    atomic_write_bytes(path, reshaped.as_bytes())?;

    info!(
        "Reshaped {} ({} tier pairs), backup at {}",
        path.display(),
        pairs.len(),
        backup.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::align::Aligner;
    use crate::core::eaf::fixtures::EafBuilder;
    use crate::core::eaf::EafDocument;

    fn scrambled() -> EafBuilder {
        EafBuilder::new()
            .tier("Papa-Spch", "default-lt", &[(2000, 3000, Some("Na"))])
            .auxiliary_tier("Mama-NVK", &[(10, 500, Some("lacht"))])
            .tier("Мама", "default-lt", &[(0, 1000, Some("Привет"))])
            .tier("Mama-Spch", "default-lt", &[(0, 1000, Some("Tom & Jerry"))])
            .tier("Папа", "default-lt", &[(2000, 3000, None)])
    }

    fn pairs() -> Vec<TierPairSpec> {
        vec![
            TierPairSpec::new("Мама", "Mama-Spch"),
            TierPairSpec::new("Папа", "Papa-Spch"),
        ]
    }

    fn tier_order(document: &EafDocument) -> Vec<&str> {
        document.tiers.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_reorders_and_retypes_tiers() {
        let output = reshape_document(&scrambled().build(), &pairs()).unwrap();
        let document = EafDocument::parse(&output).unwrap();

        assert_eq!(
            tier_order(&document),
            ["Мама", "Mama-Spch", "Папа", "Papa-Spch", "Mama-NVK"]
        );
        for tier in &document.tiers[..4] {
            assert_eq!(tier.linguistic_type.as_deref(), Some("utterance"));
        }
        assert_eq!(
            document.tiers[4].linguistic_type.as_deref(),
            Some("default-lt")
        );
    }

    #[test]
    fn test_texts_and_times_survive() {
        let output = reshape_document(&scrambled().build(), &pairs()).unwrap();
        let document = EafDocument::parse(&output).unwrap();

        let target = document.tier("Mama-Spch").unwrap();
        assert_eq!(target.annotations[0].value.as_deref(), Some("Tom & Jerry"));
        let papa = document.tier("Папа").unwrap();
        assert_eq!(papa.annotations[0].value, None);

        let alignment = Aligner::default().align(&document).unwrap();
        assert_eq!(alignment.len(), 2);
        assert_eq!(alignment.records[0].auxiliary_text, "lacht");
    }

    #[test]
    fn test_declaration_and_element_order() {
        let output = reshape_document(&scrambled().build(), &pairs()).unwrap();

        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        let header = output.find("<HEADER").unwrap();
        let time_order = output.find("<TIME_ORDER").unwrap();
        let first_tier = output.find("<TIER").unwrap();
        let linguistic_type = output.find("<LINGUISTIC_TYPE ").unwrap();
        let constraint = output.find("<CONSTRAINT").unwrap();
        assert!(header < time_order);
        assert!(time_order < first_tier);
        assert!(first_tier < linguistic_type);
        assert!(linguistic_type < constraint);
    }

    #[test]
    fn test_utterance_type_added_only_when_missing() {
        let declared = reshape_document(&scrambled().build(), &pairs()).unwrap();
        assert_eq!(declared.matches("LINGUISTIC_TYPE_ID=\"utterance\"").count(), 1);

        let missing = reshape_document(&scrambled().without_utterance_type().build(), &pairs())
            .unwrap();
        assert_eq!(missing.matches("LINGUISTIC_TYPE_ID=\"utterance\"").count(), 1);

        let document = EafDocument::parse(&missing).unwrap();
        assert_eq!(document.tiers.len(), 5);
    }

    #[test]
    fn test_unknown_tier_fails() {
        let bad = vec![TierPairSpec::new("Мама", "Nope")];
        let err = reshape_document(&scrambled().build(), &bad).unwrap_err();
        assert!(matches!(err, AlignError::TierNotFound(id) if id == "Nope"));
    }

    #[test]
    fn test_repeated_tier_placed_once() {
        let repeated = vec![
            TierPairSpec::new("Мама", "Mama-Spch"),
            TierPairSpec::new("Мама", "Papa-Spch"),
        ];
        let output = reshape_document(&scrambled().build(), &repeated).unwrap();
        let document = EafDocument::parse(&output).unwrap();

        assert_eq!(
            tier_order(&document),
            ["Мама", "Mama-Spch", "Papa-Spch", "Mama-NVK", "Папа"]
        );
    }

    #[test]
    fn test_reshape_file_keeps_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session01.eaf");
        let original = scrambled().build();
        std::fs::write(&path, &original).unwrap();

        reshape_file(&TierReshaper::default(), &path, &pairs()).unwrap();

        let backup = dir.path().join("session01_backup.eaf");
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), original);
        let document = EafDocument::load(&path).unwrap();
        assert_eq!(document.tiers[0].id, "Мама");
    }

    #[test]
    fn test_failed_reshape_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session01.eaf");
        let original = scrambled().build();
        std::fs::write(&path, &original).unwrap();

        let bad = vec![TierPairSpec::new("X", "Y")];
        assert!(reshape_file(&TierReshaper::default(), &path, &bad).is_err());

        assert!(!dir.path().join("session01_backup.eaf").exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }
}
