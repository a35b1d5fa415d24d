//! EAF document model
//!
//! Parses the parts of an ELAN file the engine needs into owned data so the
//! XML tree does not outlive parsing.

use std::path::Path;

use roxmltree::{Document as XmlDocument, Node};
use tracing::debug;

use crate::core::{AlignError, AlignResult, BoundaryId, TierId, TimeMs};

/// A `TIME_SLOT` entry; anchors placed only relatively have no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: BoundaryId,
    pub value: Option<TimeMs>,
}

/// An `ALIGNABLE_ANNOTATION` with unresolved boundary references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotation {
    pub id: String,
    pub start_ref: BoundaryId,
    pub end_ref: BoundaryId,
    /// `ANNOTATION_VALUE` text; `None` when nothing was entered
    pub value: Option<String>,
}

/// A top-level `TIER` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTier {
    pub id: TierId,
    pub linguistic_type: Option<String>,
    pub participant: Option<String>,
    pub annotations: Vec<RawAnnotation>,
}

/// Parsed annotation document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EafDocument {
    pub time_slots: Vec<TimeSlot>,
    /// Tiers in document order
    pub tiers: Vec<RawTier>,
}

impl EafDocument {
    /// Parses an annotation document from XML text.
    pub fn parse(xml: &str) -> AlignResult<Self> {
        let doc = XmlDocument::parse(xml).map_err(|e| AlignError::XmlParse(e.to_string()))?;
        let root = doc.root_element();

        let mut time_slots = Vec::new();
        for time_order in root.descendants().filter(|n| is_element(n, "TIME_ORDER")) {
            for slot in time_order.children().filter(|n| is_element(n, "TIME_SLOT")) {
                time_slots.push(parse_time_slot(&slot)?);
            }
        }

        let mut tiers = Vec::new();
        for tier in root.children().filter(|n| is_element(n, "TIER")) {
            tiers.push(parse_tier(&tier)?);
        }

        debug!(
            "Parsed annotation document: {} time slots, {} tiers",
            time_slots.len(),
            tiers.len()
        );

        Ok(Self { time_slots, tiers })
    }

    /// Reads and parses an annotation document from disk.
    pub fn load(path: &Path) -> AlignResult<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    /// Finds a tier by its identifier
    pub fn tier(&self, id: &str) -> Option<&RawTier> {
        self.tiers.iter().find(|t| t.id == id)
    }
}

fn is_element(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn required_attr(node: &Node, name: &str) -> AlignResult<String> {
    node.attribute(name)
        .map(str::to_string)
        .ok_or_else(|| AlignError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: name.to_string(),
        })
}

fn parse_time_slot(node: &Node) -> AlignResult<TimeSlot> {
    let id = required_attr(node, "TIME_SLOT_ID")?;
    let value = match node.attribute("TIME_VALUE") {
        Some(raw) => Some(raw.trim().parse::<TimeMs>().map_err(|_| {
            AlignError::InvalidTimeValue {
                boundary_id: id.clone(),
                value: raw.to_string(),
            }
        })?),
        None => None,
    };
    Ok(TimeSlot { id, value })
}

fn parse_tier(node: &Node) -> AlignResult<RawTier> {
    let id = required_attr(node, "TIER_ID")?;

    let mut annotations = Vec::new();
    for aa in node
        .descendants()
        .filter(|n| is_element(n, "ALIGNABLE_ANNOTATION"))
    {
        let value = aa
            .children()
            .find(|n| is_element(n, "ANNOTATION_VALUE"))
            .and_then(|n| n.text())
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        annotations.push(RawAnnotation {
            id: aa.attribute("ANNOTATION_ID").unwrap_or_default().to_string(),
            start_ref: required_attr(&aa, "TIME_SLOT_REF1")?,
            end_ref: required_attr(&aa, "TIME_SLOT_REF2")?,
            value,
        });
    }

    Ok(RawTier {
        id,
        linguistic_type: node.attribute("LINGUISTIC_TYPE_REF").map(str::to_string),
        participant: node.attribute("PARTICIPANT").map(str::to_string),
        annotations,
    })
}
