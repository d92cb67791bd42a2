// SPDX-License-Identifier: AGPL-3.0-or-later
//! Typed node tree for serialized rich-text documents
//!
//! Editors in the Lexical family serialize their state as a JSON tree of nodes
//! discriminated by a `type` field. The shape is loose: element nodes carry
//! attributes this crate never reads, and `format` is an integer bitmask on
//! text nodes but a string (`""`, `"left"`, ...) on paragraphs. Each node is
//! read into a permissive raw shape which is narrowed into a [`DocumentNode`]
//! variant exactly once. An attribute of an unexpected JSON type counts as
//! absent; it never fails the document.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

/// Node type names with dedicated variants
pub mod types {
    pub const TEXT: &str = "text";
    pub const PARAGRAPH: &str = "paragraph";
    pub const MENTION: &str = "mention";
}

/// Styling decoded from a text node's `format` bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextFormat {
    pub bold: bool,
    pub italic: bool,
}

impl TextFormat {
    pub const BOLD: u64 = 1;
    pub const ITALIC: u64 = 1 << 1;

    /// Decode a bitmask. Bits other than bold and italic are reserved and dropped.
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            bold: bits & Self::BOLD != 0,
            italic: bits & Self::ITALIC != 0,
        }
    }

    /// Re-encode the known flags
    pub const fn bits(&self) -> u64 {
        let mut bits = 0;
        if self.bold {
            bits |= Self::BOLD;
        }
        if self.italic {
            bits |= Self::ITALIC;
        }
        bits
    }
}

/// One element of the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    /// Inline run of text
    Text { content: String, format: TextFormat },

    /// Paragraph; its children render between boundary markers
    Paragraph { children: Vec<DocumentNode> },

    /// Reference to a user, shown as `@name`
    Mention { name: String },

    /// Any other node carrying `children` (root, list, quote, link, ...)
    Container {
        kind: Option<String>,
        children: Vec<DocumentNode>,
    },

    /// Leaf of an unrecognized type; contributes no content
    Opaque { kind: Option<String> },
}

impl DocumentNode {
    /// The `type` this node was read from, if it had one
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Text { .. } => Some(types::TEXT),
            Self::Paragraph { .. } => Some(types::PARAGRAPH),
            Self::Mention { .. } => Some(types::MENTION),
            Self::Container { kind, .. } | Self::Opaque { kind } => kind.as_deref(),
        }
    }

    pub fn children(&self) -> &[DocumentNode] {
        match self {
            Self::Paragraph { children } | Self::Container { children, .. } => children,
            _ => &[],
        }
    }
}

// Children are unlinked onto a work list so dropping a deep tree does not recurse.
impl Drop for DocumentNode {
    fn drop(&mut self) {
        let mut pending = match self {
            Self::Paragraph { children } | Self::Container { children, .. } => {
                std::mem::take(children)
            }
            _ => return,
        };

        while let Some(mut node) = pending.pop() {
            if let Self::Paragraph { children } | Self::Container { children, .. } = &mut node {
                pending.append(children);
            }
        }
    }
}

/// Node attributes that are read; everything else is skipped
#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum Field {
    Type,
    Text,
    Format,
    Children,
    #[serde(other)]
    Other,
}

/// Wire shape of a node before its variant is chosen
#[derive(Default)]
struct RawNode {
    kind: Option<String>,
    text: Option<String>,
    format: Option<u64>,
    children: Option<Vec<DocumentNode>>,
}

impl From<RawNode> for DocumentNode {
    fn from(raw: RawNode) -> Self {
        let RawNode {
            kind,
            text,
            format,
            children,
        } = raw;

        match kind.as_deref() {
            Some(types::TEXT) => Self::Text {
                content: text.unwrap_or_default(),
                format: format.map_or_else(TextFormat::default, TextFormat::from_bits),
            },
            Some(types::PARAGRAPH) => Self::Paragraph {
                children: children.unwrap_or_default(),
            },
            Some(types::MENTION) => Self::Mention {
                name: text.unwrap_or_default(),
            },
            _ => match children {
                Some(children) => Self::Container { kind, children },
                None => Self::Opaque { kind },
            },
        }
    }
}

impl<'de> Deserialize<'de> for DocumentNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

/// Objects become nodes; any other JSON value is an untyped opaque leaf
struct NodeVisitor;

impl NodeVisitor {
    const UNTYPED: DocumentNode = DocumentNode::Opaque { kind: None };
}

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = DocumentNode;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a document node")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut raw = RawNode::default();
        while let Some(field) = map.next_key::<Field>()? {
            match field {
                Field::Type => raw.kind = map.next_value::<Attr>()?.into_string(),
                Field::Text => raw.text = map.next_value::<Attr>()?.into_string(),
                Field::Format => raw.format = map.next_value::<Attr>()?.into_u64(),
                Field::Children => raw.children = map.next_value::<Attr>()?.into_nodes(),
                Field::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(raw.into())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Self::UNTYPED)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Self::UNTYPED)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(Self::UNTYPED)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(Self::UNTYPED)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(Self::UNTYPED)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(Self::UNTYPED)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Self::UNTYPED)
    }
}

/// A node attribute, narrowed by the field that reads it
enum Attr {
    Str(String),
    Int(u64),
    Nodes(Vec<DocumentNode>),
    Other,
}

impl Attr {
    fn into_string(self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Negative and fractional numbers are not bitmasks
    fn into_u64(self) -> Option<u64> {
        match self {
            Self::Int(n) => Some(n),
            _ => None,
        }
    }

    fn into_nodes(self) -> Option<Vec<DocumentNode>> {
        match self {
            Self::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Attr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AttrVisitor)
    }
}

struct AttrVisitor;

impl<'de> Visitor<'de> for AttrVisitor {
    type Value = Attr;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a node attribute")
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
        Ok(Attr::Str(s.to_owned()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Self::Value, E> {
        Ok(Attr::Str(s))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Self::Value, E> {
        Ok(Attr::Int(n))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Self::Value, E> {
        Ok(u64::try_from(n).map_or(Attr::Other, Attr::Int))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(Attr::Other)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Attr::Other)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Attr::Other)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut nodes = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(64));
        while let Some(node) = seq.next_element::<DocumentNode>()? {
            nodes.push(node);
        }
        Ok(Attr::Nodes(nodes))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Attr::Other)
    }
}

/// The root-wrapped document: `{"root": { ... }}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: DocumentNode,
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum DocumentField {
    Root,
    #[serde(other)]
    Other,
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object with a `root` node")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut root: Option<DocumentNode> = None;
        while let Some(field) = map.next_key::<DocumentField>()? {
            match field {
                DocumentField::Root if root.is_some() => {
                    return Err(de::Error::duplicate_field("root"));
                }
                DocumentField::Root => root = Some(map.next_value()?),
                DocumentField::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let root = root.ok_or_else(|| de::Error::missing_field("root"))?;
        if root.kind().is_none() {
            return Err(de::Error::custom("document root has no `type` field"));
        }
        Ok(Document { root })
    }
}

impl Document {
    pub fn new(root: DocumentNode) -> Self {
        Self { root }
    }

    /// Parse a document from JSON text.
    ///
    /// Nesting depth is bounded only by memory: the parser's recursion limit
    /// is lifted and its stack grows on the heap as needed.
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        let mut de = serde_json::Deserializer::from_str(input);
        de.disable_recursion_limit();
        let doc = Self::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(doc)
    }

    /// Depth-first, pre-order traversal yielding each node with its depth (root = 1)
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            stack: vec![(&self.root, 1)],
        }
    }

    /// Deepest nesting level in the tree
    pub fn depth(&self) -> usize {
        self.nodes().map(|(_, depth)| depth).max().unwrap_or(0)
    }

    /// Concatenated content of every text node, in document order.
    ///
    /// This is the collapsed preview of a document: no paragraph separators,
    /// and mentions are skipped.
    pub fn plain_text(&self) -> String {
        self.texts().collect()
    }

    /// Count words in the document
    pub fn word_count(&self) -> usize {
        self.texts().map(|t| t.split_whitespace().count()).sum()
    }

    /// Count user-perceived characters (grapheme clusters) in the document
    pub fn char_count(&self) -> usize {
        self.texts().map(|t| t.graphemes(true).count()).sum()
    }

    fn texts(&self) -> impl Iterator<Item = &str> {
        self.nodes().filter_map(|(node, _)| match node {
            DocumentNode::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}

/// Iterator returned by [`Document::nodes`]
pub struct Nodes<'a> {
    stack: Vec<(&'a DocumentNode, usize)>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = (&'a DocumentNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Property: reserved bits never change the decoded flags
        #[test]
        fn prop_reserved_bits_ignored(bits in any::<u64>()) {
            prop_assert_eq!(TextFormat::from_bits(bits), TextFormat::from_bits(bits & 3));
        }

        // Property: decode/encode is stable on the known flags
        #[test]
        fn prop_bits_roundtrip_known_flags(bits in 0u64..4) {
            prop_assert_eq!(TextFormat::from_bits(bits).bits(), bits);
        }

        // Property: plain text of a single text node is its content
        #[test]
        fn prop_text_root_plain_text(content in "[a-zA-Z0-9 ]{0,40}", bits in 0u64..64) {
            let json = serde_json::json!({
                "root": { "type": "text", "text": content, "format": bits }
            });
            let doc: Document = serde_json::from_value(json).expect("deserialize");
            prop_assert_eq!(doc.plain_text(), content);
            prop_assert_eq!(doc.depth(), 1);
        }
    }
}
