//! Paragraph blocks and the document they form.
//!
//! The segmentation engine only ever reads a document through [`TextDocument`]: a sequence of
//! blocks with positions, heading levels and cached comment ranges, plus lookup of the block
//! holding a position. [`Document`] is the in-memory implementation used by the command line and
//! the tests. It applies edits, splits and merges blocks the way a rich-text widget does, and
//! keeps the comment cache of every touched block up to date.
//!
//! All positions and lengths are counted in characters. Blocks are joined by a single newline in
//! the plain text, so a block owns the newline slot right after its text.

use crate::comments::{self, CommentScan};
use crate::symbols::{is_newline, sanitize};
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Distinguished block formats the engine cares about.
pub enum BlockKind {
    #[default]
    /// Regular paragraph or heading.
    Paragraph,
    /// Marker separating two scenes of a chapter.
    SceneBreak,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A paragraph of the document.
pub struct Block {
    /// Text of the paragraph without its trailing newline.
    pub text: String,
    /// Character offset of the first character in the document.
    pub position: usize,
    /// Heading level from 1 to 6, or 0 for body text.
    pub heading_level: u8,
    /// Paragraph or scene break.
    pub kind: BlockKind,
    /// Cached comment ranges in block-local character offsets.
    pub comments: Vec<Range<usize>>,
    /// The block ends inside a comment that continues into the next block.
    pub ends_in_comment: bool,
}

impl Block {
    #[must_use]
    /// Creates a body paragraph.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    /// Creates a heading paragraph of the given level.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self {
            heading_level: level,
            ..Self::paragraph(text)
        }
    }

    #[must_use]
    /// Creates a scene break marker.
    pub fn scene_break(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::SceneBreak,
            ..Self::paragraph(text)
        }
    }

    #[must_use]
    /// Number of characters in the block's text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    /// Returns true for blocks with a heading level.
    pub fn is_heading(&self) -> bool {
        self.heading_level > 0
    }

    #[must_use]
    /// Returns true if both blocks carry the same paragraph format.
    pub fn same_format(&self, other: &Self) -> bool {
        self.heading_level == other.heading_level && self.kind == other.kind
    }
}

/// Read-only view of a document's blocks.
pub trait TextDocument {
    /// Number of blocks. A document always has at least one block.
    fn block_count(&self) -> usize;

    /// Block at `index`, if any.
    fn block(&self, index: usize) -> Option<&Block>;

    /// Index of the block holding `position`, or `None` past the end of the document.
    ///
    /// The newline slot after a block's text belongs to that block.
    fn find_block(&self, position: usize) -> Option<usize>;

    /// Number of characters in the plain text of the document.
    fn character_count(&self) -> usize;

    /// Plain text between two character offsets, blocks joined by newlines.
    fn text_range(&self, from: usize, to: usize) -> String;

    /// Whole plain text of the document.
    fn plain_text(&self) -> String {
        self.text_range(0, self.character_count())
    }

    /// Absolute comment ranges of every block overlapping `from..to`.
    fn comment_ranges(&self, from: usize, to: usize) -> Vec<Range<usize>> {
        let Some(first) = self.find_block(from) else {
            return Vec::new();
        };
        (first..self.block_count())
            .map_while(|index| {
                self.block(index)
                    .filter(|block| block.position < to || index == first)
            })
            .flat_map(|block| {
                block
                    .comments
                    .iter()
                    .map(move |range| range.start + block.position..range.end + block.position)
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// A change to the document, in characters.
///
/// Mirrors the `(position, charsRemoved, charsAdded)` notification of a rich-text widget. A
/// format-only change reports the block as both removed and added.
pub struct EditDelta {
    /// Where the change starts.
    pub position: usize,
    /// Characters inserted at `position`.
    pub added: usize,
    /// Characters removed from `position` onward, measured before the change.
    pub removed: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// An applied edit as reported to the segmentation engine.
pub struct Edit {
    /// Position and size of the change.
    pub delta: EditDelta,
    /// A heading level changed, which always alters the outline.
    pub heading_changed: bool,
    /// Blocks whose comment ranges were recomputed because of the change.
    pub comments: CommentScan,
}

impl Edit {
    #[must_use]
    /// Describes a text change that happened at `position`.
    pub fn new(position: usize, added: usize, removed: usize) -> Self {
        Self {
            delta: EditDelta {
                position,
                added,
                removed,
            },
            ..Self::default()
        }
    }

    #[must_use]
    /// Net change in document length.
    pub fn length_delta(&self) -> isize {
        isize::try_from(self.delta.added).unwrap_or(isize::MAX)
            - isize::try_from(self.delta.removed).unwrap_or(isize::MAX)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// In-memory document made of paragraph blocks.
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    /// Creates a document holding one empty paragraph.
    pub fn new() -> Self {
        Self::from_blocks(Vec::new())
    }

    #[must_use]
    /// Creates a document from blocks, recomputing positions and comment ranges.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut document = Self { blocks };
        if document.blocks.is_empty() {
            document.blocks.push(Block::default());
        }
        for block in &mut document.blocks {
            block.text = sanitize(&block.text).replace(is_newline, " ");
        }
        document.update_positions(0);
        let count = document.blocks.len();
        comments::rescan(&mut document.blocks, 0..count);
        document
    }

    #[must_use]
    /// Creates a document of body paragraphs, one per line.
    pub fn from_plain_text(text: &str) -> Self {
        Self::from_blocks(split_lines(text).into_iter().map(Block::paragraph).collect())
    }

    #[must_use]
    /// All blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn update_positions(&mut self, from: usize) {
        let mut position = match from.checked_sub(1).and_then(|i| self.blocks.get(i)) {
            Some(previous) => previous.position + previous.char_len() + 1,
            None => 0,
        };
        for block in self.blocks.iter_mut().skip(from) {
            block.position = position;
            position += block.char_len() + 1;
        }
    }

    fn locate(&self, position: usize) -> (usize, usize) {
        let index = self.find_block(position).unwrap_or(self.blocks.len() - 1);
        let local = position.saturating_sub(self.blocks[index].position);
        (index, local.min(self.blocks[index].char_len()))
    }

    /// Inserts text at `position`, splitting the block at every newline.
    ///
    /// New blocks take over the format of the block they were split from. Positions past the end
    /// of the document insert at the end.
    pub fn insert(&mut self, position: usize, text: &str) -> Edit {
        let position = position.min(self.character_count());
        let lines = split_lines(&sanitize(text));
        let added = lines.iter().map(|line| line.chars().count()).sum::<usize>() + lines.len() - 1;
        let (index, local) = self.locate(position);

        let block = &mut self.blocks[index];
        let split = byte_offset(&block.text, local);
        let tail = block.text.split_off(split);
        let template = Block {
            text: String::new(),
            position: 0,
            heading_level: block.heading_level,
            kind: block.kind,
            comments: Vec::new(),
            ends_in_comment: false,
        };

        let mut lines = lines.into_iter();
        if let Some(first) = lines.next() {
            block.text.push_str(&first);
        }
        let mut inserted: Vec<Block> = lines
            .map(|line| Block {
                text: line,
                ..template.clone()
            })
            .collect();
        match inserted.last_mut() {
            Some(last) => last.text.push_str(&tail),
            None => self.blocks[index].text.push_str(&tail),
        }

        let created = inserted.len();
        self.blocks.splice(index + 1..index + 1, inserted);
        self.update_positions(index);

        let mut edit = Edit::new(position, added, 0);
        edit.comments = comments::rescan(&mut self.blocks, index..index + created + 1);
        edit
    }

    /// Removes `length` characters starting at `position`, merging blocks across newlines.
    ///
    /// The merged block keeps the format of the first block. The range is clamped to the document.
    pub fn remove(&mut self, position: usize, length: usize) -> Edit {
        let count = self.character_count();
        let start = position.min(count);
        let end = position.saturating_add(length).min(count);

        let (first, from) = self.locate(start);
        let (last, to) = self.locate(end);

        let tail = {
            let block = &self.blocks[last];
            block.text[byte_offset(&block.text, to)..].to_string()
        };
        let block = &mut self.blocks[first];
        block.text.truncate(byte_offset(&block.text, from));
        block.text.push_str(&tail);
        self.blocks.drain(first + 1..=last);
        self.update_positions(first);

        let mut edit = Edit::new(start, 0, end - start);
        edit.comments = comments::rescan(&mut self.blocks, first..first + 1);
        edit
    }

    /// Replaces `length` characters at `position` with `text`, reported as a single edit.
    pub fn replace(&mut self, position: usize, length: usize, text: &str) -> Edit {
        let removal = self.remove(position, length);
        let insertion = self.insert(removal.delta.position, text);
        let rescanned = removal.comments.rescanned.start.min(insertion.comments.rescanned.start)
            ..insertion.comments.rescanned.end.max(removal.comments.rescanned.end);
        let mut invalidated = removal.comments.invalidated;
        invalidated.extend(insertion.comments.invalidated);
        invalidated.sort_unstable();
        invalidated.dedup();

        Edit {
            delta: EditDelta {
                position: removal.delta.position,
                added: insertion.delta.added,
                removed: removal.delta.removed,
            },
            heading_changed: false,
            comments: CommentScan {
                rescanned,
                invalidated,
            },
        }
    }

    /// Changes the heading level of a block. Returns `None` for unknown blocks or no change.
    pub fn set_heading_level(&mut self, index: usize, level: u8) -> Option<Edit> {
        let block = self.blocks.get_mut(index)?;
        if block.heading_level == level {
            return None;
        }
        block.heading_level = level;
        let length = block.char_len();
        let mut edit = Edit::new(block.position, length, length);
        edit.heading_changed = true;
        edit.comments.rescanned = index..index;
        Some(edit)
    }

    /// Marks or unmarks a block as a scene break. Returns `None` for unknown blocks or no change.
    pub fn set_scene_break(&mut self, index: usize, scene_break: bool) -> Option<Edit> {
        let block = self.blocks.get_mut(index)?;
        let kind = if scene_break {
            BlockKind::SceneBreak
        } else {
            BlockKind::Paragraph
        };
        if block.kind == kind {
            return None;
        }
        block.kind = kind;
        let length = block.char_len();
        let mut edit = Edit::new(block.position, length, length);
        edit.comments.rescanned = index..index;
        Some(edit)
    }
}

impl TextDocument for Document {
    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    fn find_block(&self, position: usize) -> Option<usize> {
        if position > self.character_count() {
            return None;
        }
        let index = self
            .blocks
            .partition_point(|block| block.position <= position);
        index.checked_sub(1)
    }

    fn character_count(&self) -> usize {
        self.blocks
            .last()
            .map_or(0, |block| block.position + block.char_len())
    }

    fn text_range(&self, from: usize, to: usize) -> String {
        let mut text = String::new();
        let Some(first) = self.find_block(from) else {
            return text;
        };
        let last_index = self.blocks.len() - 1;

        for (index, block) in self.blocks.iter().enumerate().skip(first) {
            if block.position >= to && index != first {
                break;
            }
            let length = block.char_len();
            let local_from = from.saturating_sub(block.position);
            let local_to = to.saturating_sub(block.position).min(length);
            if local_from < local_to {
                text.extend(
                    block
                        .text
                        .chars()
                        .skip(local_from)
                        .take(local_to - local_from),
                );
            }
            if index != last_index && to > block.position + length {
                text.push('\n');
            }
        }

        text
    }
}

/// Splits text into lines at any newline character, treating CRLF as one break.
fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split(is_newline)
        .map(ToString::to_string)
        .collect()
}

/// Byte index of the `chars`-th character, or the end of the string.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte)
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
