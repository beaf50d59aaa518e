//! Field extraction from clinical-trial XML documents
//!
//! One document in, one [`StudyRecord`] out. The document is first parsed
//! into a small element tree; each schema field is then an independent
//! best-effort lookup against that tree. A missing or malformed node makes
//! that one field absent and never disturbs the other twelve. Only a
//! document that fails to parse at all is an error.

use thiserror::Error;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::record::StudyRecord;

/// Reported when an age node carries text with no leading integer
/// (e.g. "N/A"). Distinct from the absent case, which yields `None`.
pub const MIN_AGE_DEFAULT: u32 = 0;
/// Fallback for an unparsable `maximum_age` value.
pub const MAX_AGE_DEFAULT: u32 = 99;

/// Document-level extraction failure: the whole document is unusable.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("malformed XML document: {0}")]
    Malformed(String),

    #[error("unreadable document: {0}")]
    Unreadable(String),
}

impl ExtractError {
    fn malformed(err: impl ToString) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Extract the fixed field schema from one clinical-trial document.
///
/// Field lookups are independent: each missing node yields `None` for that
/// field alone. Returns `Err` only when the document itself cannot be
/// parsed; the caller counts that as one document-level failure and moves on.
pub fn extract_study(xml: &str) -> Result<StudyRecord, ExtractError> {
    let root = parse_document(xml)?;

    Ok(StudyRecord {
        nct_id: root.text_at(&["id_info", "nct_id"]),
        brief_title: root.text_at(&["brief_title"]),
        brief_summary: root.text_at(&["brief_summary", "textblock"]),
        detailed_description: root.text_at(&["detailed_description", "textblock"]),
        overall_status: root.text_at(&["overall_status"]),
        condition: root.text_at(&["condition"]),
        eligibility: root.text_at(&["eligibility", "criteria", "textblock"]),
        gender: root.text_at(&["eligibility", "gender"]),
        gender_based: root.text_at(&["eligibility", "gender_based"]),
        minimum_age: root
            .at(&["eligibility", "minimum_age"])
            .map(|node| parse_age(node.text(), MIN_AGE_DEFAULT)),
        maximum_age: root
            .at(&["eligibility", "maximum_age"])
            .map(|node| parse_age(node.text(), MAX_AGE_DEFAULT)),
        keyword: Some(root.texts_of("keyword")),
        mesh_term: root
            .child("condition_browse")
            .map(|browse| browse.texts_of("mesh_term")),
    })
}

/// Parse a leading integer out of free-form age text ("18 Years" -> 18).
///
/// An unparsable or empty value falls back to the documented default; the
/// absent-node case is handled by the caller and never reaches here.
fn parse_age(text: Option<&str>, default: u32) -> u32 {
    text.and_then(|t| t.split_whitespace().next())
        .and_then(|token| token.parse().ok())
        .unwrap_or(default)
}

/// A parsed XML element: tag name, trimmed text content, child elements.
///
/// Attributes are not retained; the trial schema carries everything in
/// element text.
#[derive(Debug, Clone, Default)]
pub(crate) struct XmlNode {
    name: String,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// First child element with the given tag name
    pub(crate) fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Walk a path of tag names from this node, first match at each step
    pub(crate) fn at(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, segment| node.child(segment))
    }

    /// Trimmed text content; `None` when empty
    pub(crate) fn text(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Text of the node at `path`, if the node exists and has text
    pub(crate) fn text_at(&self, path: &[&str]) -> Option<String> {
        self.at(path).and_then(|node| node.text()).map(str::to_owned)
    }

    /// Text of every direct child with the given tag name, in document order
    pub(crate) fn texts_of(&self, name: &str) -> Vec<String> {
        self.children
            .iter()
            .filter(|c| c.name == name)
            .filter_map(|c| c.text())
            .map(str::to_owned)
            .collect()
    }
}

/// Build the element tree for one document.
pub(crate) fn parse_document(xml: &str) -> Result<XmlNode, ExtractError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event().map_err(ExtractError::malformed)? {
            Event::Eof => break,
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push(XmlNode::new(name));
            },
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                attach(&mut stack, &mut root, XmlNode::new(name))?;
            },
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| ExtractError::malformed("unbalanced closing tag"))?;
                attach(&mut stack, &mut root, node)?;
            },
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    let unescaped = text.unescape().map_err(ExtractError::malformed)?;
                    top.text.push_str(&unescaped);
                }
            },
            Event::CData(cdata) => {
                if let Some(top) = stack.last_mut() {
                    top.text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            },
            // Declarations, comments, processing instructions, doctypes
            _ => {},
        }
    }

    if !stack.is_empty() {
        return Err(ExtractError::malformed("unexpected end of document"));
    }

    root.ok_or_else(|| ExtractError::malformed("document has no root element"))
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), ExtractError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_some() {
                return Err(ExtractError::malformed("multiple root elements"));
            }
            *root = Some(node);
        },
    }
    Ok(())
}
