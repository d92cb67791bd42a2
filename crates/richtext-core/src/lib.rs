// SPDX-License-Identifier: AGPL-3.0-or-later
//! richtext Core - Interpreter for serialized rich-text document trees
//!
//! This crate provides:
//! - A typed node tree read leniently from editor JSON (`{"root": {...}}`)
//! - The interpreter turning that tree into styled text fragments, with a
//!   verbatim plain-text fallback for anything it cannot read
//! - Renderers painting fragments as plain text, Markdown or JSON
//! - C FFI exports for native painters

pub mod ast;
pub mod formats;
pub mod interpreter;
pub mod traits;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use ast::{Document, DocumentNode, TextFormat};
pub use formats::OutputFormat;
pub use interpreter::{interpret, render, DocumentInterpreter, Fragment, RenderResult};
pub use traits::{RenderConfig, Renderer, RendererExt, Result, RichTextError};
