//! Plain text format: one body paragraph per line.

use crate::config::Config;
use crate::document::{Block, Document};
use crate::error::Result;
use crate::formats::Format;

/// Reads every line as a paragraph and the configured marker lines as scene breaks.
pub struct PlainFormat;

impl Format for PlainFormat {
    fn name(&self) -> &'static str {
        "plain text"
    }

    fn parse(&self, source: &str, config: &Config) -> Result<Document> {
        let blocks = source
            .lines()
            .map(|line| {
                if line.trim() == config.scene_break {
                    Block::scene_break(line.trim())
                } else {
                    Block::paragraph(line)
                }
            })
            .collect();
        Ok(Document::from_blocks(blocks))
    }
}

#[cfg(test)]
#[path = "../tests/plain.rs"]
mod tests;
