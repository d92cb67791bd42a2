// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markdown renderer

use crate::formats::OutputFormat;
use crate::interpreter::{Fragment, RenderResult};
use crate::traits::{Renderer, Result};

/// Markdown renderer: bold as `**`, italic as `*`, paragraphs as blocks
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MarkdownRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Markdown
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
                Fragment::Text { text, bold, italic } => {
                    let delimiter = match (*bold, *italic) {
                        (true, true) => "***",
                        (true, false) => "**",
                        (false, true) => "*",
                        (false, false) => "",
                    };
                    render_text(&mut output, text, delimiter);
                }
                Fragment::Mention { name } => {
                    output.push('@');
                    output.push_str(&escape(name, false));
                }
            }
        }

        Ok(output)
    }
}

/// Emphasis delimiters must hug non-space characters, so surrounding
/// whitespace is kept outside them.
fn render_text(output: &mut String, text: &str, delimiter: &str) {
    let line_start = output
        .rsplit('\n')
        .next()
        .is_some_and(|line| line.chars().all(|c| c == ' ' || c == '\t'));
    let trimmed = text.trim();
    if delimiter.is_empty() || trimmed.is_empty() {
        output.push_str(&escape(text, line_start));
        return;
    }

    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];

    output.push_str(leading);
    output.push_str(delimiter);
    output.push_str(&escape(trimmed, false));
    output.push_str(delimiter);
    output.push_str(trailing);
}

/// Backslash-escape inline syntax everywhere, and block syntax (headings,
/// quotes, list markers, ...) where `text` begins a line.
fn escape(text: &str, mut line_start: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if line_start {
            match c {
                ' ' | '\t' => {
                    escaped.push(c);
                    continue;
                }
                '#' | '>' | '-' | '+' | '=' | '|' => escaped.push('\\'),
                '0'..='9' => {
                    escaped.push(c);
                    while let Some(&digit) = chars.peek().filter(|d| d.is_ascii_digit()) {
                        escaped.push(digit);
                        chars.next();
                    }
                    if let Some(&(marker @ ('.' | ')'))) = chars.peek() {
                        escaped.push('\\');
                        escaped.push(marker);
                        chars.next();
                    }
                    line_start = false;
                    continue;
                }
                _ => {}
            }
            line_start = false;
        }

        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<') {
            escaped.push('\\');
        }
        escaped.push(c);
        line_start = c == '\n';
    }
    escaped
}
