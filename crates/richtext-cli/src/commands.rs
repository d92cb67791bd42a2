// SPDX-License-Identifier: AGPL-3.0-or-later
//! Command handlers for document operations

use anyhow::Context;
use richtext_core::{DocumentInterpreter, OutputFormat, RenderConfig};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub word_count: usize,
    pub char_count: usize,
    pub depth: usize,
    /// Counts came from the raw input because it is not a document
    pub fallback: bool,
}

/// Read a document from a file, or stdin when `path` is absent or `-`
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            Ok(content)
        }
    }
}

/// Interpret a document and paint it in `format`.
///
/// With `strict`, unreadable input is an error instead of falling back to
/// the raw text.
pub fn render_document(
    content: &str,
    format: OutputFormat,
    config: RenderConfig,
    strict: bool,
) -> anyhow::Result<String> {
    let interpreter = DocumentInterpreter::with_config(config);

    if strict {
        interpreter
            .parse(content)
            .context("Document could not be interpreted")?;
    }

    let result = interpreter.render(content);
    let output = format
        .renderer()
        .render(&result)
        .with_context(|| format!("Failed to render {format}"))?;

    Ok(output)
}

/// Collapsed preview text
pub fn plain_text(content: &str, config: RenderConfig) -> String {
    DocumentInterpreter::with_config(config).plain_text(content)
}

pub fn document_stats(content: &str, config: RenderConfig) -> DocumentStats {
    match DocumentInterpreter::with_config(config).parse(content) {
        Ok(doc) => DocumentStats {
            word_count: doc.word_count(),
            char_count: doc.char_count(),
            depth: doc.depth(),
            fallback: false,
        },
        Err(err) => {
            tracing::warn!(error = %err, "counting raw text");
            DocumentStats {
                word_count: content.split_whitespace().count(),
                char_count: content.graphemes(true).count(),
                depth: 0,
                fallback: true,
            }
        }
    }
}
