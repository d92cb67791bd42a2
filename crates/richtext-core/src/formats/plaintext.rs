// SPDX-License-Identifier: AGPL-3.0-or-later
//! Plain text renderer

use crate::formats::OutputFormat;
use crate::interpreter::{Fragment, RenderResult};
use crate::traits::{Renderer, Result};

/// Plain text renderer: styling dropped, paragraphs separated by a blank line
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::PlainText
    }

    fn render(&self, result: &RenderResult) -> Result<String> {
        let fragments = match result {
            RenderResult::Rendered(fragments) => fragments,
            RenderResult::Fallback(raw) => return Ok(raw.clone()),
        };

        let mut output = String::new();
        let mut first_paragraph = true;

        for fragment in fragments {
            match fragment {
                Fragment::ParagraphStart => {
                    if !first_paragraph {
                        output.push_str("\n\n");
                    }
                    first_paragraph = false;
                }
                Fragment::ParagraphEnd => {}
                Fragment::Text { text, .. } => output.push_str(text),
                Fragment::Mention { name } => {
                    output.push('@');
                    output.push_str(name);
                }
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::render;

    #[test]
    fn test_paragraphs() {
        let result = render(
            r#"{"root":{"type":"root","children":[
                {"type":"paragraph","children":[{"type":"text","text":"Hello "},{"type":"text","text":"world","format":1}]},
                {"type":"paragraph","children":[{"type":"text","text":"hi "},{"type":"mention","text":"bob"}]}
            ]}}"#,
        );
        let output = PlainTextRenderer::new().render(&result).unwrap();
        assert_eq!(output, "Hello world\n\nhi @bob");
    }

    #[test]
    fn test_fallback_verbatim() {
        let result = render("{not quite json");
        let output = PlainTextRenderer::new().render(&result).unwrap();
        assert_eq!(output, "{not quite json");
    }
}
