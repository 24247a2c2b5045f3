//! Character classification shared by word iteration, comment scanning and selection.
//!
//! Word boundaries are not plain whitespace. Any character that is neither a letter nor a number
//! ends a word, except the multi-separators (the hyphen), which only split words when they appear
//! at least twice in a row. `dash-separated` is one word; `a--b` is two.

use std::ops::RangeInclusive;

/// Opens a bracketed comment that is excluded from word counts.
pub const OPENING_COMMENT: char = '[';
/// Closes a bracketed comment.
pub const CLOSING_COMMENT: char = ']';
/// U+2013, always a word separator.
pub const EN_DASH: char = '\u{2013}';
/// U+2014, always a word separator.
pub const EM_DASH: char = '\u{2014}';

/// Characters that only separate words when repeated.
const MULTI_SEPARATORS: [char; 1] = ['-'];

/// Characters that join the letters around them into one word (`There's`, `it’s`).
const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];

#[must_use]
/// Returns true if the character ends a word on its own.
pub fn is_word_separator(character: char) -> bool {
    !character.is_alphanumeric() && !is_multi_separator(character)
}

#[must_use]
/// Returns true for characters that only separate words when flanked by themselves.
pub fn is_multi_separator(character: char) -> bool {
    MULTI_SEPARATORS.contains(&character)
}

#[must_use]
/// Returns true for straight and typographic apostrophes.
pub fn is_apostrophe(character: char) -> bool {
    APOSTROPHES.contains(&character)
}

#[must_use]
/// Returns true for line and paragraph terminators.
pub fn is_newline(character: char) -> bool {
    matches!(
        character,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Invisible formatting characters (general category `Cf`), such as the soft hyphen, zero-width
/// space, bidirectional marks and the byte order mark.
const FORMAT_CHARACTERS: [RangeInclusive<char>; 21] = [
    '\u{00AD}'..='\u{00AD}',
    '\u{0600}'..='\u{0605}',
    '\u{061C}'..='\u{061C}',
    '\u{06DD}'..='\u{06DD}',
    '\u{070F}'..='\u{070F}',
    '\u{0890}'..='\u{0891}',
    '\u{08E2}'..='\u{08E2}',
    '\u{180E}'..='\u{180E}',
    '\u{200B}'..='\u{200F}',
    '\u{202A}'..='\u{202E}',
    '\u{2060}'..='\u{2064}',
    '\u{2066}'..='\u{206F}',
    '\u{FEFF}'..='\u{FEFF}',
    '\u{FFF9}'..='\u{FFFB}',
    '\u{110BD}'..='\u{110BD}',
    '\u{110CD}'..='\u{110CD}',
    '\u{13430}'..='\u{1343F}',
    '\u{1BCA0}'..='\u{1BCA3}',
    '\u{1D173}'..='\u{1D17A}',
    '\u{E0001}'..='\u{E0001}',
    '\u{E0020}'..='\u{E007F}',
];

#[must_use]
/// Returns true for invisible formatting characters like the soft hyphen or zero-width space.
pub fn is_format_character(character: char) -> bool {
    FORMAT_CHARACTERS
        .iter()
        .any(|range| range.contains(&character))
}

#[must_use]
/// Removes characters that are neither printable nor whitespace: control codes and invisible
/// formatting characters.
pub fn sanitize(string: &str) -> String {
    string
        .chars()
        .filter(|&character| {
            character.is_whitespace()
                || !(character.is_control() || is_format_character(character))
        })
        .collect()
}

#[must_use]
/// Returns true if any character of the string is a word separator.
pub fn contains_word_separator(string: &str) -> bool {
    string.chars().any(is_word_separator)
}

#[cfg(test)]
#[path = "tests/symbols.rs"]
mod tests;
