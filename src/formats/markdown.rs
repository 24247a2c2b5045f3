//! Markdown format implementation using tree-sitter-md.
//!
//! This module reads ATX-style headings (# syntax) as heading blocks, paragraphs as body blocks
//! and thematic breaks as scene breaks. Code blocks, HTML and link definitions are not prose and
//! are skipped. A paragraph wrapped over several source lines becomes a single block.

use crate::config::Config;
use crate::document::{Block, Document};
use crate::error::{Error, Result};
use crate::formats::Format;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

/// File extensions read as Markdown.
pub const EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Tree-sitter queries for the prose blocks of a Markdown document.
pub struct MarkdownFormat;

impl MarkdownFormat {
    fn language() -> Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn block_query() -> &'static str {
        "(atx_heading) @heading (paragraph) @paragraph (thematic_break) @scene_break"
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn parse(&self, source: &str, config: &Config) -> Result<Document> {
        let language = Self::language();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::Parse("markdown source".to_string()))?;

        let query = Query::new(&language, Self::block_query())?;
        let capture_names = query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());

        let mut found: Vec<(usize, Block)> = Vec::new();
        while let Some(found_match) = matches.next() {
            for capture in found_match.captures {
                let node = capture.node;
                let block = match capture_names[capture.index as usize] {
                    "heading" => heading_block(node, source),
                    "paragraph" => {
                        let text = paragraph_text(node, source);
                        if text == config.scene_break {
                            Block::scene_break(text)
                        } else {
                            Block::paragraph(text)
                        }
                    }
                    "scene_break" => Block::scene_break(config.scene_break.clone()),
                    _ => continue,
                };
                found.push((node.start_byte(), block));
            }
        }
        found.sort_by_key(|(start, _)| *start);

        log::debug!("read {} markdown blocks", found.len());
        Ok(Document::from_blocks(
            found.into_iter().map(|(_, block)| block).collect(),
        ))
    }
}

fn heading_block(node: Node, source: &str) -> Block {
    let mut cursor = node.walk();
    let level = node
        .children(&mut cursor)
        .find_map(|child| marker_level(child.kind()))
        .unwrap_or(1);
    let title = node
        .child_by_field_name("heading_content")
        .and_then(|content| content.utf8_text(source.as_bytes()).ok())
        .map(|text| text.trim().trim_end_matches('#').trim_end())
        .unwrap_or_default();
    Block::heading(level, title)
}

/// Level of an `atx_hN_marker` node kind.
fn marker_level(kind: &str) -> Option<u8> {
    kind.strip_prefix("atx_h")?
        .strip_suffix("_marker")?
        .parse()
        .ok()
}

fn paragraph_text(node: Node, source: &str) -> String {
    let text = node.utf8_text(source.as_bytes()).unwrap_or_default();
    text.lines()
        .map(|line| line.trim().trim_start_matches('>').trim_start())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
