//! Bracketed comment tracking.
//!
//! Text between `[` and `]` is a comment: it stays in the document but is muted when painted and
//! left out of word counts. Ranges are cached on each block in block-local character offsets. A
//! comment that is still open at the end of a block continues into the next block, and keeps
//! going until some later block closes it, possibly at the very end of the document.

use crate::document::Block;
use crate::symbols::{CLOSING_COMMENT, OPENING_COMMENT};
use std::ops::Range;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Comment ranges found in a single block.
pub struct BlockComments {
    /// Half-open, non-overlapping ranges in block-local character offsets.
    pub ranges: Vec<Range<usize>>,
    /// The block ends inside a comment that has not been closed.
    pub ends_open: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Outcome of re-scanning a run of blocks.
pub struct CommentScan {
    /// Blocks whose comment ranges were recomputed.
    pub rescanned: Range<usize>,
    /// Blocks whose comment ranges differ from before and need repainting.
    pub invalidated: Vec<usize>,
}

#[must_use]
/// Finds the comment ranges of one block's text.
///
/// `starts_inside` carries the open-comment state of the previous block, in which case the scan
/// treats position zero as already inside a comment.
pub fn scan_comments(text: &str, starts_inside: bool) -> BlockComments {
    let chars: Vec<char> = text.chars().collect();
    let find = |from: usize, target: char| {
        chars
            .get(from..)
            .and_then(|rest| rest.iter().position(|&c| c == target))
            .map(|index| index + from)
    };

    let mut comments = BlockComments::default();
    let mut start = if starts_inside {
        Some(0)
    } else {
        find(0, OPENING_COMMENT)
    };

    while let Some(from) = start {
        if let Some(close) = find(from, CLOSING_COMMENT) {
            comments.ends_open = false;
            comments.ranges.push(from..close + 1);
            start = find(close + 1, OPENING_COMMENT);
        } else {
            comments.ends_open = true;
            if from < chars.len() {
                comments.ranges.push(from..chars.len());
            }
            start = None;
        }
    }

    comments
}

/// Re-scans the `touched` blocks and keeps going while the carried open-comment state changes.
///
/// Blocks after the touched run only need a new scan if the block before them changed whether it
/// ends inside a comment.
pub fn rescan(blocks: &mut [Block], touched: Range<usize>) -> CommentScan {
    let first = touched.start.min(blocks.len());
    let mut scan = CommentScan {
        rescanned: first..first,
        invalidated: Vec::new(),
    };

    let mut index = first;
    while index < blocks.len() {
        let starts_inside = index > 0 && blocks[index - 1].ends_in_comment;
        let block = &mut blocks[index];
        let found = scan_comments(&block.text, starts_inside);
        let carry_changed = block.ends_in_comment != found.ends_open;

        if block.comments != found.ranges {
            scan.invalidated.push(index);
        }
        block.comments = found.ranges;
        block.ends_in_comment = found.ends_open;

        index += 1;
        if index >= touched.end && !carry_changed {
            break;
        }
    }

    scan.rescanned = first..index;
    scan
}

#[cfg(test)]
#[path = "tests/comments.rs"]
mod tests;
