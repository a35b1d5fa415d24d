//! Test fixtures: builds EAF XML documents.

pub(crate) type IntervalSpec<'a> = (u64, u64, Option<&'a str>);

/// Builds a minimal but structurally complete ELAN document.
#[derive(Debug, Default)]
pub(crate) struct EafBuilder {
    slots: Vec<(String, Option<u64>)>,
    tiers: Vec<String>,
    next_annotation: usize,
    declare_utterance_type: bool,
}

impl EafBuilder {
    pub(crate) fn new() -> Self {
        Self {
            declare_utterance_type: true,
            ..Default::default()
        }
    }

    /// Omits the `utterance` LINGUISTIC_TYPE declaration.
    pub(crate) fn without_utterance_type(mut self) -> Self {
        self.declare_utterance_type = false;
        self
    }

    /// Adds a time slot; `None` creates an anchor without a value.
    pub(crate) fn slot(mut self, id: &str, value: Option<u64>) -> Self {
        self.slots.push((id.to_string(), value));
        self
    }

    pub(crate) fn utterance_tier(self, id: &str, intervals: &[IntervalSpec<'_>]) -> Self {
        self.tier(id, "utterance", intervals)
    }

    pub(crate) fn auxiliary_tier(self, id: &str, intervals: &[IntervalSpec<'_>]) -> Self {
        self.tier(id, "default-lt", intervals)
    }

    pub(crate) fn tier(
        mut self,
        id: &str,
        linguistic_type: &str,
        intervals: &[IntervalSpec<'_>],
    ) -> Self {
        let refs: Vec<(String, String, Option<String>)> = intervals
            .iter()
            .map(|(start, end, text)| {
                let start_ref = self.push_slot(*start);
                let end_ref = self.push_slot(*end);
                (start_ref, end_ref, text.map(str::to_string))
            })
            .collect();
        self.tier_with_refs(id, linguistic_type, &refs)
    }

    /// Adds a tier whose annotations reference explicit slot ids.
    pub(crate) fn tier_with_refs(
        mut self,
        id: &str,
        linguistic_type: &str,
        refs: &[(String, String, Option<String>)],
    ) -> Self {
        let mut xml = format!(
            "    <TIER LINGUISTIC_TYPE_REF=\"{}\" TIER_ID=\"{}\">\n",
            linguistic_type,
            escape(id)
        );
        for (start_ref, end_ref, text) in refs {
            self.next_annotation += 1;
            let value = match text {
                Some(t) => format!("<ANNOTATION_VALUE>{}</ANNOTATION_VALUE>", escape(t)),
                None => "<ANNOTATION_VALUE></ANNOTATION_VALUE>".to_string(),
            };
            xml.push_str(&format!(
                "        <ANNOTATION>\n            <ALIGNABLE_ANNOTATION ANNOTATION_ID=\"a{}\" TIME_SLOT_REF1=\"{}\" TIME_SLOT_REF2=\"{}\">\n                {}\n            </ALIGNABLE_ANNOTATION>\n        </ANNOTATION>\n",
                self.next_annotation, start_ref, end_ref, value
            ));
        }
        xml.push_str("    </TIER>\n");
        self.tiers.push(xml);
        self
    }

    fn push_slot(&mut self, value: u64) -> String {
        let id = format!("ts{}", self.slots.len() + 1);
        self.slots.push((id.clone(), Some(value)));
        id
    }

    pub(crate) fn build(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ANNOTATION_DOCUMENT AUTHOR=\"\" FORMAT=\"3.0\" VERSION=\"3.0\">\n    <HEADER MEDIA_FILE=\"\" TIME_UNITS=\"milliseconds\"/>\n    <TIME_ORDER>\n",
        );
        for (id, value) in &self.slots {
            match value {
                Some(v) => xml.push_str(&format!(
                    "        <TIME_SLOT TIME_SLOT_ID=\"{}\" TIME_VALUE=\"{}\"/>\n",
                    id, v
                )),
                None => xml.push_str(&format!("        <TIME_SLOT TIME_SLOT_ID=\"{}\"/>\n", id)),
            }
        }
        xml.push_str("    </TIME_ORDER>\n");
        for tier in &self.tiers {
            xml.push_str(tier);
        }
        xml.push_str("    <LINGUISTIC_TYPE GRAPHIC_REFERENCES=\"false\" LINGUISTIC_TYPE_ID=\"default-lt\" TIME_ALIGNABLE=\"true\"/>\n");
        if self.declare_utterance_type {
            xml.push_str("    <LINGUISTIC_TYPE GRAPHIC_REFERENCES=\"false\" LINGUISTIC_TYPE_ID=\"utterance\" TIME_ALIGNABLE=\"true\"/>\n");
        }
        xml.push_str("    <CONSTRAINT DESCRIPTION=\"Time subdivision of parent annotation's time interval\" STEREOTYPE=\"Time_Subdivision\"/>\n");
        xml.push_str("</ANNOTATION_DOCUMENT>\n");
        xml
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
