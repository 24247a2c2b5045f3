//! Segment representation for the document outline.
//!
//! A segment is one node of the outline. It begins at a heading block and runs until the next
//! segment begins or the document ends. Segments know their position and nesting depth and cache
//! the number of words they contain, but they do not own any text: the text is always read from
//! the document through the position.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
/// Stable identity of a segment for as long as it exists.
///
/// Positions shift with every edit, so background recount results are matched by id.
pub struct SegmentId(pub u64);

#[derive(Clone, Debug, Serialize)]
/// Hierarchical document division anchored at a heading.
pub struct Segment {
    /// Identity used to route recount results back to this segment.
    pub id: SegmentId,
    /// Character offset where the segment begins.
    pub position: usize,
    /// Nesting depth in the outline (1 for top-level).
    pub depth: usize,
    /// Words contained in the segment, as of the last applied recount.
    pub word_count: usize,
    /// Latest recount requested for this segment.
    #[serde(skip)]
    pub(crate) requested: u64,
    /// Recount whose result is currently in `word_count`.
    #[serde(skip)]
    pub(crate) applied: u64,
}

impl Segment {
    #[must_use]
    /// Creates a segment that has not been counted yet.
    pub fn new(id: SegmentId, position: usize, depth: usize) -> Self {
        Self {
            id,
            position,
            depth,
            word_count: 0,
            requested: 0,
            applied: 0,
        }
    }

    #[must_use]
    /// Returns true while a requested recount has not been applied.
    pub fn is_stale(&self) -> bool {
        self.requested > self.applied
    }
}

/// Segments compare by outline shape and count, never by identity.
impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.depth == other.depth
            && self.word_count == other.word_count
    }
}

impl Eq for Segment {}
