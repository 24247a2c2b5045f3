//! Word-wise caret movement and word selection.
//!
//! The editor's own word movement stops on a fixed set of punctuation. These helpers stop where
//! the word counter draws its boundaries instead, so selecting a word selects exactly what was
//! counted as one. Positions are character offsets into the plain text.

use crate::symbols::{is_apostrophe, is_word_separator};
use crate::words::WordIterator;
use std::ops::Range;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// What happens to the anchor when the caret moves.
pub enum MoveMode {
    #[default]
    /// The anchor follows the caret, clearing the selection.
    MoveAnchor,
    /// The anchor stays put, extending the selection.
    KeepAnchor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// A caret with an anchor, as in a text editor.
pub struct Cursor {
    /// Where the selection started.
    pub anchor: usize,
    /// Where the caret is.
    pub position: usize,
}

impl Cursor {
    #[must_use]
    /// A caret at `position` with nothing selected.
    pub fn at(position: usize) -> Self {
        Self {
            anchor: position,
            position,
        }
    }

    #[must_use]
    /// Returns true if the anchor and the caret differ.
    pub fn has_selection(&self) -> bool {
        self.anchor != self.position
    }

    #[must_use]
    /// The selected range in document order.
    pub fn range(&self) -> Range<usize> {
        self.anchor.min(self.position)..self.anchor.max(self.position)
    }

    #[must_use]
    /// The selected text.
    pub fn selected_text(&self, text: &str) -> String {
        let range = self.range();
        text.chars().skip(range.start).take(range.len()).collect()
    }

    fn move_to(&mut self, position: usize, mode: MoveMode) {
        self.position = position;
        if mode == MoveMode::MoveAnchor {
            self.anchor = position;
        }
    }

    /// Moves the caret to the end of the current or next word.
    pub fn move_to_next_word(&mut self, text: &str, mode: MoveMode) {
        self.move_to(next_word_boundary(text, self.position), mode);
    }

    /// Moves the caret to the start of the current or previous word.
    pub fn move_to_previous_word(&mut self, text: &str, mode: MoveMode) {
        self.move_to(previous_word_boundary(text, self.position), mode);
    }

    /// Selects the word under the caret. Leaves the cursor alone if there is nothing to select.
    pub fn select_word(&mut self, text: &str) {
        if let Some(range) = word_at(text, self.position) {
            self.anchor = range.start;
            self.position = range.end;
        }
    }
}

/// Character view with the word-joining rules applied.
struct Chars(Vec<char>);

impl Chars {
    fn new(text: &str) -> Self {
        Self(text.chars().collect())
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, position: usize) -> Option<char> {
        self.0.get(position).copied()
    }

    fn before(&self, position: usize) -> Option<char> {
        position.checked_sub(1).and_then(|index| self.get(index))
    }

    fn is_word(&self, position: usize) -> bool {
        match self.get(position) {
            Some(character) if is_apostrophe(character) => {
                self.before(position).is_some_and(char::is_alphanumeric)
                    && self.get(position + 1).is_some_and(char::is_alphanumeric)
            }
            Some(character) => character.is_alphanumeric(),
            None => false,
        }
    }

    fn is_space(&self, position: usize) -> bool {
        self.get(position).is_none_or(char::is_whitespace)
    }

    fn is_symbol(&self, position: usize) -> bool {
        !self.is_space(position) && !self.is_word(position)
    }

    /// Word ends, and ends of symbol runs in front of whitespace.
    fn is_forward_stop(&self, position: usize) -> bool {
        let Some(previous) = position.checked_sub(1) else {
            return false;
        };
        (self.is_word(previous) && !self.is_word(position))
            || (!self.is_space(previous) && self.is_space(position))
    }

    /// Word starts, starts of symbol runs after whitespace, and punctuation right after a word.
    fn is_backward_stop(&self, position: usize) -> bool {
        if position == 0 {
            return true;
        }
        let previous = position - 1;
        (self.is_word(position) && !self.is_word(previous))
            || (!self.is_space(position) && self.is_space(previous))
            || (self.is_symbol(position)
                && self.get(position).is_some_and(is_word_separator)
                && self.is_word(previous))
    }
}

#[must_use]
/// Where the caret lands when moving one word forward from `position`.
///
/// Stops at the end of a word, and at the end of punctuation standing before whitespace or the end
/// of a paragraph. A single hyphen is a stop, so `dash-separated` takes two moves.
pub fn next_word_boundary(text: &str, position: usize) -> usize {
    let chars = Chars::new(text);
    let end = chars.len();
    (position.min(end) + 1..=end)
        .find(|&candidate| candidate == end || chars.is_forward_stop(candidate))
        .unwrap_or(end)
}

#[must_use]
/// Where the caret lands when moving one word backward from `position`.
pub fn previous_word_boundary(text: &str, position: usize) -> usize {
    let chars = Chars::new(text);
    let start = position.min(chars.len());
    (0..start)
        .rev()
        .find(|&candidate| chars.is_backward_stop(candidate))
        .unwrap_or(0)
}

#[must_use]
/// Range of the word under the caret at `position`.
///
/// A caret touching a word at either edge selects it. Otherwise the run of punctuation touching
/// the caret is selected, and a caret surrounded by whitespace selects nothing.
pub fn word_at(text: &str, position: usize) -> Option<Range<usize>> {
    if let Some(word) = WordIterator::new(text)
        .take_while(|word| word.position <= position)
        .find(|word| position <= word.end())
    {
        return Some(word.position..word.end());
    }

    let chars = Chars::new(text);
    let mut start = position.min(chars.len());
    let mut end = start;
    while start > 0 && chars.is_symbol(start - 1) {
        start -= 1;
    }
    while chars.is_symbol(end) {
        end += 1;
    }
    (start < end).then_some(start..end)
}

#[cfg(test)]
#[path = "tests/selection.rs"]
mod tests;
