//! Outline and count reports for the command line.
//!
//! A report is a snapshot of one document's segments and counts. It renders either as a
//! box-drawn outline tree for people or as JSON for other tools.

use crate::counter::Counts;
use crate::document::TextDocument;
use crate::error::Result;
use crate::structure::DocumentStructure;
use serde::Serialize;
use std::fmt::Write;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One outline entry.
pub struct SegmentReport {
    /// Heading text, empty for a segment without a heading.
    pub heading: String,
    /// Paired subheading text, or empty.
    pub subheading: String,
    /// Nesting depth, 1 for top level.
    pub depth: usize,
    /// Character offset of the segment start.
    pub position: usize,
    /// Words in the segment.
    pub words: usize,
}

impl SegmentReport {
    fn title(&self) -> String {
        match (self.heading.is_empty(), self.subheading.is_empty()) {
            (true, _) => "(untitled)".to_string(),
            (false, true) => self.heading.clone(),
            (false, false) => format!("{}: {}", self.heading, self.subheading),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Outline and counts of one document.
pub struct DocumentReport {
    /// Where the document was loaded from.
    pub path: String,
    /// Whole-document counts.
    pub counts: Counts,
    /// Outline entries in document order.
    pub segments: Vec<SegmentReport>,
}

impl DocumentReport {
    #[must_use]
    /// Snapshots the structure of `doc`. Pending background recounts are not waited for.
    pub fn new(
        path: impl Into<String>,
        doc: &dyn TextDocument,
        structure: &DocumentStructure,
    ) -> Self {
        let segments = structure
            .segments()
            .iter()
            .enumerate()
            .map(|(index, segment)| SegmentReport {
                heading: structure.heading(doc, index),
                subheading: structure.subheading(doc, index),
                depth: segment.depth,
                position: segment.position,
                words: segment.word_count,
            })
            .collect();
        Self {
            path: path.into(),
            counts: structure.document_counts(),
            segments,
        }
    }

    #[must_use]
    /// Renders the outline as a tree, one line per segment.
    pub fn render_outline(&self) -> String {
        let levels: Vec<usize> = self.segments.iter().map(|s| s.depth).collect();
        let is_last_at_level = last_at_level(&levels);

        let mut out = format!(
            "{} ({}, {}, {})\n",
            self.path,
            plural(self.counts.words, "word"),
            plural(self.counts.paragraphs, "paragraph"),
            plural(self.counts.pages, "page"),
        );

        // Track which parent levels still have siblings coming
        let mut parent_has_siblings: Vec<bool> = Vec::new();
        for (index, segment) in self.segments.iter().enumerate() {
            parent_has_siblings.truncate(segment.depth);
            parent_has_siblings.resize(segment.depth, false);
            if let Some(own) = parent_has_siblings.last_mut() {
                *own = !is_last_at_level[index];
            }

            let prefix = tree_prefix(
                segment.depth,
                is_last_at_level[index],
                &parent_has_siblings,
            );
            let _ = writeln!(
                out,
                "{prefix}{} ({})",
                segment.title(),
                plural(segment.words, "word")
            );
        }
        out
    }
}

/// Serialises reports as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn to_json(reports: &[DocumentReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

/// For each node, whether no later node shares its level before the tree climbs above it.
fn last_at_level(levels: &[usize]) -> Vec<bool> {
    levels
        .iter()
        .enumerate()
        .map(|(index, &level)| {
            !levels[index + 1..]
                .iter()
                .take_while(|&&later| later >= level)
                .any(|&later| later == level)
        })
        .collect()
}

/// Generate box-drawing prefix for tree structure
fn tree_prefix(level: usize, is_last: bool, parent_states: &[bool]) -> String {
    if level == 0 {
        return String::new();
    }

    let mut prefix = String::new();

    for has_siblings in (0..level - 1).map(|i| parent_states.get(i).copied().unwrap_or(false)) {
        prefix.push_str(if has_siblings { "│   " } else { "    " });
    }
    prefix.push_str(if is_last { "└── " } else { "├── " });

    prefix
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
#[path = "tests/report.rs"]
mod tests;
