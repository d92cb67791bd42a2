// SPDX-License-Identifier: AGPL-3.0-or-later
//! TOML configuration for the command line painter
//!
//! ```toml
//! [render]
//! max_depth = 32
//! max_input_bytes = 1048576
//!
//! [output]
//! format = "markdown"
//! ```

use anyhow::Context;
use richtext_core::{OutputFormat, RenderConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub render: RenderConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl CliConfig {
    /// Load from `path`, or defaults when no file was given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        tracing::debug!(?config, path = %path.display(), "loaded config");
        Ok(config)
    }

    /// File limits overridden by command line flags
    pub fn render_config(
        &self,
        max_depth: Option<usize>,
        max_input_bytes: Option<usize>,
    ) -> RenderConfig {
        RenderConfig {
            max_depth: max_depth.or(self.render.max_depth),
            max_input_bytes: max_input_bytes.or(self.render.max_input_bytes),
        }
    }
}
