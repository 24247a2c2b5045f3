//! Format trait and implementations for different manuscript file types.
//!
//! This module defines the `Format` trait which abstracts over the file types a manuscript can be
//! written in. Each format turns source text into the paragraph blocks of a [`Document`]; none of
//! them write documents back.

pub mod markdown;
pub mod plain;

use crate::config::Config;
use crate::document::Document;
use crate::error::Result;
use std::path::Path;

/// Turns source text into a document.
pub trait Format {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Reads `source` into paragraph blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed.
    fn parse(&self, source: &str, config: &Config) -> Result<Document>;
}

#[must_use]
/// Picks the format for a file by its extension. Anything that is not Markdown is plain text.
pub fn for_path(path: &Path) -> Box<dyn Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if markdown::EXTENSIONS.contains(&ext) => Box::new(markdown::MarkdownFormat),
        _ => Box::new(plain::PlainFormat),
    }
}
