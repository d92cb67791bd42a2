// SPDX-License-Identifier: AGPL-3.0-or-later
//! Renderers painting interpreted documents into text formats

pub mod json;
pub mod markdown;
pub mod plaintext;

pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;
pub use plaintext::PlainTextRenderer;

use crate::traits::{Renderer, RichTextError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "text", alias = "plaintext", alias = "txt")]
    PlainText,
    #[serde(alias = "md")]
    Markdown,
    Json,
}

impl OutputFormat {
    /// File extension for this format
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }

    /// Short name accepted on the command line
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Markdown => "markdown",
            Self::Json => "json",
        }
    }

    pub const ALL: [Self; 3] = [Self::PlainText, Self::Markdown, Self::Json];

    pub fn renderer(&self) -> Box<dyn Renderer> {
        match self {
            Self::PlainText => Box::new(PlainTextRenderer::new()),
            Self::Markdown => Box::new(MarkdownRenderer::new()),
            Self::Json => Box::new(JsonRenderer::new()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputFormat {
    type Err = RichTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.label() == s || format.extension() == s)
            .ok_or(RichTextError::UnsupportedFormat(s))
    }
}
