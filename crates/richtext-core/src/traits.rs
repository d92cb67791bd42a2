// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error, configuration and renderer traits

use crate::formats::OutputFormat;
use crate::interpreter::RenderResult;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Error type for interpreting and rendering documents
#[derive(Debug, thiserror::Error)]
pub enum RichTextError {
    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Document nesting exceeds depth limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error("Document of {len} bytes exceeds size limit of {limit}")]
    InputTooLarge { len: usize, limit: usize },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, RichTextError>;

/// Limits applied before a document is interpreted.
///
/// Input rejected by a limit renders through the fallback path like any
/// other malformed input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Deepest node nesting accepted (root = 1); `None` = unbounded
    pub max_depth: Option<usize>,
    /// Longest serialized input accepted, in bytes; `None` = unbounded
    pub max_input_bytes: Option<usize>,
}

impl RenderConfig {
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = Some(limit);
        self
    }
}

/// Renderer trait: paint an interpreted document into a target text format
pub trait Renderer: Send + Sync {
    /// The format this renderer produces
    fn format(&self) -> OutputFormat;

    /// Render an interpretation result to a string
    fn render(&self, result: &RenderResult) -> Result<String>;
}

/// Extension trait for streaming operations (not dyn-compatible)
pub trait RendererExt: Renderer {
    /// Render to a writer
    fn render_writer<W: Write>(&self, result: &RenderResult, writer: &mut W) -> Result<()> {
        let output = self.render(result)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}

impl<T: Renderer> RendererExt for T {}
