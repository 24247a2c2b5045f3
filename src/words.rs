//! Word iteration over borrowed text.
//!
//! The iterator walks the text one character at a time and yields [`Word`] views into the source
//! rather than copies. A word begins at the first letter or number after a separator and ends
//! after the last letter or number before the next separator, so surrounding quotes and trailing
//! punctuation never become part of a word, and free-standing symbol runs such as `...` are
//! consumed without being reported.
//!
//! Comment exclusion hides whole character positions from the scan: an excluded position is
//! neither a separator nor part of a word.

use crate::document::Block;
use crate::symbols::{is_apostrophe, is_multi_separator, is_word_separator};
use std::ops::Range;
use std::str::CharIndices;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A single word found by a [`WordIterator`].
pub struct Word<'a> {
    /// The word as it appears in the source text.
    pub text: &'a str,
    /// Absolute character offset of the first character of the word.
    pub position: usize,
}

impl Word<'_> {
    #[must_use]
    /// Number of characters spanned by the word.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    /// Absolute character offset just past the word.
    pub fn end(&self) -> usize {
        self.position + self.char_len()
    }
}

#[derive(Clone, Debug)]
/// Forward-only, single-pass iterator over the words of a text range.
///
/// Restarting means constructing a new iterator. Iterators over independent text can run on
/// different threads at the same time.
pub struct WordIterator<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
    /// Absolute character offset of the next character to read.
    position: usize,
    previous: Option<char>,
    exclude_comments: bool,
    ignored: Vec<Range<usize>>,
    ignored_cursor: usize,
}

impl<'a> WordIterator<'a> {
    #[must_use]
    /// Iterates a standalone string starting at offset zero, without comment exclusion.
    pub fn new(text: &'a str) -> Self {
        Self::with_offset(text, 0)
    }

    #[must_use]
    /// Iterates a text range whose first character sits at `offset` in the document.
    pub fn with_offset(text: &'a str, offset: usize) -> Self {
        Self {
            text,
            chars: text.char_indices(),
            position: offset,
            previous: None,
            exclude_comments: false,
            ignored: Vec::new(),
            ignored_cursor: 0,
        }
    }

    #[must_use]
    /// Iterates a single paragraph block, skipping its cached comment ranges.
    pub fn for_block(block: &'a Block) -> Self {
        let offset = block.position;
        Self::with_offset(&block.text, offset).ignoring(
            block
                .comments
                .iter()
                .map(|range| range.start + offset..range.end + offset),
        )
    }

    #[must_use]
    /// Supplies absolute ranges to skip and turns comment exclusion on.
    pub fn ignoring(mut self, ranges: impl IntoIterator<Item = Range<usize>>) -> Self {
        self.ignored = ranges.into_iter().filter(|r| r.start < r.end).collect();
        self.ignored.sort_by_key(|range| range.start);
        self.ignored_cursor = 0;
        self.exclude_comments = true;
        self
    }

    #[must_use]
    /// Enables or disables skipping of the ignored ranges.
    pub fn comment_exclusion(mut self, enabled: bool) -> Self {
        self.exclude_comments = enabled;
        self
    }

    #[must_use]
    /// Returns true once every character of the range has been consumed.
    pub fn at_end(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    fn is_ignored(&mut self, position: usize) -> bool {
        if !self.exclude_comments {
            return false;
        }
        while let Some(range) = self.ignored.get(self.ignored_cursor) {
            if range.end <= position {
                self.ignored_cursor += 1;
                continue;
            }
            return range.start <= position;
        }
        false
    }

    fn separates(previous: Option<char>, character: char, next: Option<char>) -> bool {
        if is_multi_separator(character) {
            return previous == Some(character) || next == Some(character);
        }
        if is_apostrophe(character) {
            let joins = previous.is_some_and(char::is_alphanumeric)
                && next.is_some_and(char::is_alphanumeric);
            return !joins;
        }
        is_word_separator(character)
    }
}

impl<'a> Iterator for WordIterator<'a> {
    type Item = Word<'a>;

    fn next(&mut self) -> Option<Word<'a>> {
        let mut start: Option<(usize, usize)> = None;
        let mut end = 0;

        while let Some((byte, character)) = self.chars.next() {
            let position = self.position;
            self.position += 1;
            let previous = self.previous.replace(character);

            if self.is_ignored(position) {
                continue;
            }

            let next = self.chars.clone().next().map(|(_, c)| c);
            if Self::separates(previous, character, next) {
                if start.is_some() {
                    break;
                }
                continue;
            }

            if character.is_alphanumeric() {
                if start.is_none() {
                    start = Some((byte, position));
                }
                end = byte + character.len_utf8();
            }
        }

        start.map(|(byte, position)| Word {
            text: &self.text[byte..end],
            position,
        })
    }
}

#[must_use]
/// Counts the words of a string without comment exclusion.
pub fn count_words(text: &str) -> usize {
    WordIterator::new(text).count()
}

#[must_use]
/// Counts the words of a text range starting at `offset`, skipping the absolute `ignored` ranges.
pub fn count_words_ignoring(text: &str, offset: usize, ignored: &[Range<usize>]) -> usize {
    WordIterator::with_offset(text, offset)
        .ignoring(ignored.iter().cloned())
        .count()
}

#[cfg(test)]
#[path = "tests/words.rs"]
mod tests;
