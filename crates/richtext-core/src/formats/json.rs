// SPDX-License-Identifier: AGPL-3.0-or-later
//! JSON renderer for painters living outside the process

use crate::formats::OutputFormat;
use crate::interpreter::RenderResult;
use crate::traits::{Renderer, Result, RichTextError};

/// Serializes the interpretation result as pretty-printed JSON
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for JsonRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn render(&self, result: &RenderResult) -> Result<String> {
        serde_json::to_string_pretty(result)
            .map_err(|e| RichTextError::SerializationError(e.to_string()))
    }
}
