// SPDX-License-Identifier: AGPL-3.0-or-later
//! Document interpreter: serialized tree in, styled fragments out
//!
//! Interpretation never fails from the caller's point of view. Input that
//! cannot be read as a document comes back as [`RenderResult::Fallback`]
//! holding the original string, so the raw text is always displayable.

use crate::ast::{Document, DocumentNode, TextFormat};
use crate::traits::{RenderConfig, Result, RichTextError};
use serde::Serialize;

/// A unit of renderable output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    /// Styled run of text
    Text {
        text: String,
        bold: bool,
        italic: bool,
    },
    /// Mentioned user name, without the leading `@`
    Mention { name: String },
    ParagraphStart,
    ParagraphEnd,
}

impl Fragment {
    pub fn text(text: impl Into<String>, format: TextFormat) -> Self {
        Self::Text {
            text: text.into(),
            bold: format.bold,
            italic: format.italic,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::text(text, TextFormat::default())
    }

    /// Styling of a text fragment
    pub fn format(&self) -> Option<TextFormat> {
        match self {
            Self::Text { bold, italic, .. } => Some(TextFormat {
                bold: *bold,
                italic: *italic,
            }),
            _ => None,
        }
    }
}

/// Outcome of interpreting one serialized document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "content", rename_all = "snake_case")]
pub enum RenderResult {
    /// Fragments in document order
    Rendered(Vec<Fragment>),
    /// The unmodified input, to be shown as plain text
    Fallback(String),
}

impl RenderResult {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn fragments(&self) -> Option<&[Fragment]> {
        match self {
            Self::Rendered(fragments) => Some(fragments),
            Self::Fallback(_) => None,
        }
    }
}

/// Parses serialized documents and walks them into fragments.
///
/// Holds no state besides its limits, so one instance can serve any number
/// of concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct DocumentInterpreter {
    config: RenderConfig,
}

impl DocumentInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Parse a serialized document, enforcing the configured limits
    pub fn parse(&self, input: &str) -> Result<Document> {
        if let Some(limit) = self.config.max_input_bytes {
            if input.len() > limit {
                return Err(RichTextError::InputTooLarge {
                    len: input.len(),
                    limit,
                });
            }
        }

        let doc = Document::from_json(input)?;

        if let Some(limit) = self.config.max_depth {
            if doc.depth() > limit {
                tracing::debug!(depth = doc.depth(), limit, "document too deep");
                return Err(RichTextError::DepthExceeded { limit });
            }
        }

        Ok(doc)
    }

    /// Interpret a serialized document into display fragments
    pub fn render(&self, input: &str) -> RenderResult {
        match self.parse(input) {
            Ok(doc) => RenderResult::Rendered(interpret(&doc)),
            Err(err) => {
                tracing::warn!(error = %err, "failed to parse document, showing raw text");
                RenderResult::Fallback(input.to_string())
            }
        }
    }

    /// Collapsed preview text of a serialized document; the raw input when
    /// it cannot be parsed
    pub fn plain_text(&self, input: &str) -> String {
        match self.parse(input) {
            Ok(doc) => doc.plain_text(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to parse document, showing raw text");
                input.to_string()
            }
        }
    }
}

/// Render with no limits
pub fn render(input: &str) -> RenderResult {
    DocumentInterpreter::new().render(input)
}

enum Step<'a> {
    Visit(&'a DocumentNode),
    CloseParagraph,
}

/// Walk a parsed document depth-first into fragments.
///
/// Uses an explicit stack, so arbitrarily deep trees cannot overflow the
/// thread stack.
pub fn interpret(doc: &Document) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut stack = vec![Step::Visit(&doc.root)];

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Visit(node) => node,
            Step::CloseParagraph => {
                fragments.push(Fragment::ParagraphEnd);
                continue;
            }
        };

        match node {
            DocumentNode::Text { content, format } => {
                fragments.push(Fragment::text(content.as_str(), *format));
            }
            DocumentNode::Mention { name } => {
                fragments.push(Fragment::Mention { name: name.clone() });
            }
            DocumentNode::Paragraph { children } => {
                fragments.push(Fragment::ParagraphStart);
                stack.push(Step::CloseParagraph);
                stack.extend(children.iter().rev().map(Step::Visit));
            }
            DocumentNode::Container { children, .. } => {
                stack.extend(children.iter().rev().map(Step::Visit));
            }
            DocumentNode::Opaque { .. } => {}
        }
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bold(text: &str) -> Fragment {
        Fragment::text(text, TextFormat::from_bits(TextFormat::BOLD))
    }

    #[test]
    fn test_paragraph_with_bold_text() {
        let result = render(
            r#"{"root":{"type":"paragraph","children":[{"type":"text","text":"Hi","format":1}]}}"#,
        );
        assert_eq!(
            result,
            RenderResult::Rendered(vec![
                Fragment::ParagraphStart,
                Fragment::Text {
                    text: "Hi".to_string(),
                    bold: true,
                    italic: false,
                },
                Fragment::ParagraphEnd,
            ])
        );
    }

    #[test]
    fn test_not_json_falls_back() {
        assert_eq!(
            render("not json"),
            RenderResult::Fallback("not json".to_string())
        );
    }

    #[test]
    fn test_fallback_cases() {
        for input in [
            "",
            "{",
            r#"{"root":{"type":"paragraph","children":[{"type":"text","text":"Hi""#,
            r#"{"root":{"children":[]}}"#,
            r#"{"root":null}"#,
            r#"{"type":"paragraph","children":[]}"#,
            "42",
            r#""just a string""#,
            "[]",
        ] {
            assert_eq!(render(input), RenderResult::Fallback(input.to_string()));
        }
    }

    #[test]
    fn test_format_composition() {
        let result = render(
            r#"{"root":{"type":"root","children":[
                {"type":"text","text":"both","format":3},
                {"type":"text","text":"none","format":0},
                {"type":"text","text":"absent"},
                {"type":"text","text":"italic","format":2},
                {"type":"text","text":"underline+bold","format":9}
            ]}}"#,
        );
        let formats: Vec<_> = result
            .fragments()
            .unwrap()
            .iter()
            .map(|f| f.format().unwrap().bits())
            .collect();
        assert_eq!(formats, vec![3, 0, 0, 2, 1]);
    }

    #[test]
    fn test_paragraph_order() {
        let result = render(
            r#"{"root":{"type":"paragraph","children":[
                {"type":"text","text":"one"},
                {"type":"text","text":"two","format":1}
            ]}}"#,
        );
        assert_eq!(
            result,
            RenderResult::Rendered(vec![
                Fragment::ParagraphStart,
                Fragment::plain("one"),
                bold("two"),
                Fragment::ParagraphEnd,
            ])
        );
    }

    #[test]
    fn test_containers_flatten_and_unknown_leaves_vanish() {
        let result = render(
            r#"{"root":{"type":"root","children":[
                {"type":"paragraph","children":[
                    {"type":"text","text":"a"},
                    {"type":"linebreak"},
                    {"type":"link","url":"https://example.com","children":[{"type":"text","text":"b"}]},
                    {"type":"image","src":"x.png"},
                    {"type":"text","text":"c"}
                ]},
                {"type":"horizontalrule"},
                {"type":"paragraph","children":[]}
            ]}}"#,
        );
        assert_eq!(
            result,
            RenderResult::Rendered(vec![
                Fragment::ParagraphStart,
                Fragment::plain("a"),
                Fragment::plain("b"),
                Fragment::plain("c"),
                Fragment::ParagraphEnd,
                Fragment::ParagraphStart,
                Fragment::ParagraphEnd,
            ])
        );
    }

    #[test]
    fn test_nested_paragraphs_close_in_order() {
        let result = render(
            r#"{"root":{"type":"paragraph","children":[
                {"type":"paragraph","children":[{"type":"text","text":"inner"}]},
                {"type":"text","text":"outer"}
            ]}}"#,
        );
        assert_eq!(
            result,
            RenderResult::Rendered(vec![
                Fragment::ParagraphStart,
                Fragment::ParagraphStart,
                Fragment::plain("inner"),
                Fragment::ParagraphEnd,
                Fragment::plain("outer"),
                Fragment::ParagraphEnd,
            ])
        );
    }

    #[test]
    fn test_text_content_is_verbatim() {
        let result = render(r#"{"root":{"type":"text","text":"  spaced  "}}"#);
        assert_eq!(
            result,
            RenderResult::Rendered(vec![Fragment::plain("  spaced  ")])
        );
    }

    #[test]
    fn test_mention() {
        let result = render(
            r#"{"root":{"type":"paragraph","children":[
                {"type":"text","text":"cc "},
                {"type":"mention","text":"alice"}
            ]}}"#,
        );
        assert_eq!(
            result,
            RenderResult::Rendered(vec![
                Fragment::ParagraphStart,
                Fragment::plain("cc "),
                Fragment::Mention {
                    name: "alice".to_string()
                },
                Fragment::ParagraphEnd,
            ])
        );
    }

    #[test]
    fn test_opaque_root_renders_empty() {
        assert_eq!(
            render(r#"{"root":{"type":"image"}}"#),
            RenderResult::Rendered(vec![])
        );
    }

    #[test]
    fn test_max_depth() {
        let input = r#"{"root":{"type":"root","children":[
            {"type":"paragraph","children":[{"type":"text","text":"x"}]}
        ]}}"#;

        let at_limit = DocumentInterpreter::with_config(RenderConfig::default().with_max_depth(3));
        assert_eq!(at_limit.config().max_depth, Some(3));
        assert!(!at_limit.render(input).is_fallback());

        let below = DocumentInterpreter::with_config(RenderConfig::default().with_max_depth(2));
        assert_eq!(below.render(input), RenderResult::Fallback(input.to_string()));
        assert!(matches!(
            below.parse(input),
            Err(RichTextError::DepthExceeded { limit: 2 })
        ));
    }

    #[test]
    fn test_max_input_bytes() {
        let input = r#"{"root":{"type":"text","text":"hello"}}"#;
        let interpreter = DocumentInterpreter::with_config(
            RenderConfig::default().with_max_input_bytes(input.len() - 1),
        );
        assert_eq!(interpreter.render(input), RenderResult::Fallback(input.to_string()));
        assert!(matches!(
            interpreter.parse(input),
            Err(RichTextError::InputTooLarge { .. })
        ));
    }

    #[test]
    fn test_deep_nesting_renders() {
        let levels = 500;
        let mut input = String::from(r#"{"root":"#);
        for _ in 0..levels {
            input.push_str(r#"{"type":"list","children":["#);
        }
        input.push_str(r#"{"type":"text","text":"deep"}"#);
        input.push_str(&"]}".repeat(levels));
        input.push('}');

        assert_eq!(
            render(&input),
            RenderResult::Rendered(vec![Fragment::plain("deep")])
        );

        let capped =
            DocumentInterpreter::with_config(RenderConfig::default().with_max_depth(levels));
        assert_eq!(capped.render(&input), RenderResult::Fallback(input.clone()));
    }

    #[test]
    fn test_mistyped_attributes_do_not_fall_back() {
        let result = render(
            r#"{"root":{"type":"root","children":[
                {"type":"text","text":"a"},
                {"type":"image","text":{"alt":"x"}},
                {"type":"equation","text":42},
                {"type":7},
                {"type":"text","text":"b","children":{"k":1}},
                [1, 2],
                "stray"
            ]}}"#,
        );
        assert_eq!(
            result,
            RenderResult::Rendered(vec![Fragment::plain("a"), Fragment::plain("b")])
        );
    }

    #[test]
    fn test_plain_text() {
        let interpreter = DocumentInterpreter::new();
        let input = r#"{"root":{"type":"root","children":[
            {"type":"paragraph","children":[{"type":"text","text":"Hello "},{"type":"text","text":"there","format":1}]},
            {"type":"paragraph","children":[{"type":"text","text":"!"}]}
        ]}}"#;
        assert_eq!(interpreter.plain_text(input), "Hello there!");
        assert_eq!(interpreter.plain_text("plain words"), "plain words");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(render(
            r#"{"root":{"type":"paragraph","children":[{"type":"text","text":"Hi","format":2}]}}"#,
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "result": "rendered",
                "content": [
                    {"kind": "paragraph_start"},
                    {"kind": "text", "text": "Hi", "bold": false, "italic": true},
                    {"kind": "paragraph_end"}
                ]
            })
        );

        let json = serde_json::to_value(render("oops")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"result": "fallback", "content": "oops"})
        );
    }
}
