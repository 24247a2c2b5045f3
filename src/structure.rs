//! The document outline: an ordered sequence of segments kept in step with the document.
//!
//! A full [`DocumentStructure::rebuild`] scans every block for headings. Edits go through
//! [`DocumentStructure::on_edit`], which shifts segment positions and recounts only the segments
//! whose text changed, unless the edit could have created, removed or re-paired a heading, in
//! which case it falls back to a rebuild.
//!
//! Two headings directly after each other form one segment when the second is one level deeper
//! and of even level (a chapter title followed by its subtitle, say `#` then `##`).

use crate::config::Config;
use crate::counter::{page_count, Counts, RecountJob, RecountResult, Recounter};
use crate::document::{Edit, TextDocument};
use crate::events::{Notification, Notifier, Scope};
use crate::segment::{Segment, SegmentId};
use crate::words::count_words_ignoring;
use crossbeam_channel::Receiver;
use std::ops::Range;

#[derive(Debug)]
/// Segment sequence, cached counts and recount bookkeeping for one document.
pub struct DocumentStructure {
    segments: Vec<Segment>,
    attached: bool,
    next_id: u64,
    /// Block count as of the last edit, used to spot splits and merges.
    block_count: usize,
    characters: usize,
    words_per_page: usize,
    comment_exclusion: bool,
    recounter: Recounter,
    notifier: Notifier,
    document_counts: Counts,
    selection_counts: Counts,
    cursor: Option<usize>,
    current: Option<SegmentId>,
}

impl DocumentStructure {
    #[must_use]
    /// Creates a detached structure using the counting preferences of `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            segments: Vec::new(),
            attached: false,
            next_id: 0,
            block_count: 0,
            characters: 0,
            words_per_page: config.words_per_page,
            comment_exclusion: config.comment_exclusion,
            recounter: Recounter::new(config.background_recount),
            notifier: Notifier::default(),
            document_counts: Counts::default(),
            selection_counts: Counts::default(),
            cursor: None,
            current: None,
        }
    }

    #[must_use]
    /// Creates a structure attached to `doc` and fully built.
    pub fn with_document(config: &Config, doc: &dyn TextDocument) -> Self {
        let mut structure = Self::new(config);
        structure.attach(doc);
        structure
    }

    /// Registers an observer for structure and count notifications.
    pub fn subscribe(&mut self) -> Receiver<Notification> {
        self.notifier.subscribe()
    }

    #[must_use]
    /// Returns true while a document is attached.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Attaches a document and builds its outline.
    pub fn attach(&mut self, doc: &dyn TextDocument) {
        self.attached = true;
        self.rebuild(doc);
    }

    /// Detaches the document. Navigation yields nothing and every count drops to zero.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        log::debug!("detaching document with {} segments", self.segments.len());
        self.attached = false;
        self.segments.clear();
        self.block_count = 0;
        self.characters = 0;
        self.notifier.publish(&Notification::StructureChanged);
        self.publish_counts(Counts::default(), Scope::Document);
        self.publish_counts(Counts::default(), Scope::Selection);
        self.update_current();
    }

    fn new_segment(&mut self, position: usize, depth: usize) -> Segment {
        self.next_id += 1;
        Segment::new(SegmentId(self.next_id), position, depth)
    }

    /// Discards every segment and rebuilds the outline from the document's headings.
    pub fn rebuild(&mut self, doc: &dyn TextDocument) {
        if !self.attached {
            return;
        }

        let mut segments = vec![self.new_segment(0, 1)];
        let mut previous_level = 0u8;
        let mut boundary_level: Option<u8> = None;

        for index in 0..doc.block_count() {
            let Some(block) = doc.block(index) else {
                break;
            };
            let level = block.heading_level;
            let subheading =
                level >= 1 && previous_level.checked_add(1) == Some(level) && level % 2 == 0;

            if level > 0 && !subheading {
                // A heading in the first block is represented by the root segment.
                if index > 0 {
                    let previous_depth = segments.last().map_or(1, |segment| segment.depth);
                    let depth = match boundary_level {
                        Some(boundary) => to_i64(previous_depth) + i64::from(level)
                            - i64::from(boundary),
                        None => to_i64(previous_depth),
                    };
                    let depth = usize::try_from(depth.max(1)).unwrap_or(1);
                    segments.push(self.new_segment(block.position, depth));
                }
                boundary_level = Some(level);
            }
            previous_level = level;
        }

        log::debug!(
            "rebuilt outline: {} segments over {} blocks",
            segments.len(),
            doc.block_count()
        );
        self.segments = segments;
        self.block_count = doc.block_count();
        self.characters = doc.character_count();
        self.notifier.publish(&Notification::StructureChanged);

        let all: Vec<usize> = (0..self.segments.len()).collect();
        self.recount(doc, &all);
        self.update_current();
    }

    /// Brings the outline up to date after `edit` was applied to `doc`.
    pub fn on_edit(&mut self, doc: &dyn TextDocument, edit: &Edit) {
        if !self.attached {
            return;
        }
        self.invalidate_blocks(edit);

        if edit.heading_changed {
            log::debug!("heading level changed, rebuilding");
            self.rebuild(doc);
            return;
        }
        if self.reshapes_headings(doc, edit) {
            log::debug!(
                "edit at {} splits or merges heading blocks, rebuilding",
                edit.delta.position
            );
            self.rebuild(doc);
            return;
        }

        let delta = edit.delta;
        let first = self.containing(delta.position);
        if delta.removed > 0 {
            let last = self.containing(delta.position + delta.removed);
            if first != last {
                log::debug!(
                    "deletion {}..{} crosses segments {first}..={last}, rebuilding",
                    delta.position,
                    delta.position + delta.removed
                );
                self.rebuild(doc);
                return;
            }
        }

        let shift = edit.length_delta();
        for segment in self.segments.iter_mut().skip(first + 1) {
            segment.position = segment.position.saturating_add_signed(shift);
        }
        log::debug!(
            "shifted {} segments after segment {first} by {shift}",
            self.segments.len() - first - 1
        );

        self.block_count = doc.block_count();
        self.characters = doc.character_count();

        let mut dirty = vec![first];
        dirty.extend(self.segments_over_blocks(doc, &edit.comments.rescanned));
        dirty.sort_unstable();
        dirty.dedup();
        self.recount(doc, &dirty);
        self.update_current();
    }

    /// An edit that splits or merges blocks next to a heading can create, remove or re-pair a
    /// heading without touching any heading level.
    fn reshapes_headings(&self, doc: &dyn TextDocument, edit: &Edit) -> bool {
        let delta = edit.delta;
        let Some(first) = doc.find_block(delta.position) else {
            return true;
        };
        let last = doc
            .find_block(delta.position + delta.added)
            .unwrap_or(first);
        if doc.block_count() == self.block_count && first == last {
            return false;
        }
        (first..=last + 1)
            .filter_map(|index| doc.block(index))
            .any(|block| block.is_heading())
    }

    fn invalidate_blocks(&mut self, edit: &Edit) {
        let (Some(&from), Some(&to)) = (
            edit.comments.invalidated.first(),
            edit.comments.invalidated.last(),
        ) else {
            return;
        };
        self.notifier
            .publish(&Notification::BlocksInvalidated(from..to + 1));
    }

    /// Index of the segment holding `position`, clamped to the outline.
    fn containing(&self, position: usize) -> usize {
        self.segments
            .partition_point(|segment| segment.position <= position)
            .saturating_sub(1)
    }

    fn segments_over_blocks(
        &self,
        doc: &dyn TextDocument,
        blocks: &Range<usize>,
    ) -> Range<usize> {
        if blocks.is_empty() {
            return 0..0;
        }
        let (Some(first), Some(last)) = (doc.block(blocks.start), doc.block(blocks.end - 1)) else {
            return 0..0;
        };
        self.containing(first.position)..self.containing(last.position + last.char_len()) + 1
    }

    /// Character range covered by a segment, up to the start of the next one.
    fn bounds(&self, index: usize) -> Option<Range<usize>> {
        let start = self.segments.get(index)?.position;
        let end = self
            .segments
            .get(index + 1)
            .map_or(self.characters, |next| next.position);
        Some(start..end.max(start))
    }

    fn recount(&mut self, doc: &dyn TextDocument, indices: &[usize]) {
        let mut finished = Vec::new();
        for &index in indices {
            let Some(range) = self.bounds(index) else {
                continue;
            };
            let ignored = if self.comment_exclusion {
                doc.comment_ranges(range.start, range.end)
            } else {
                Vec::new()
            };
            let segment = &mut self.segments[index];
            segment.requested += 1;
            let job = RecountJob {
                id: segment.id,
                revision: segment.requested,
                text: doc.text_range(range.start, range.end),
                offset: range.start,
                ignored,
            };
            finished.extend(self.recounter.submit(job));
        }
        for result in finished {
            self.apply(result);
        }
        self.aggregate();
    }

    fn apply(&mut self, result: RecountResult) {
        let Some(segment) = self.segments.iter_mut().find(|segment| segment.id == result.id)
        else {
            log::trace!("dropping recount of removed segment {:?}", result.id);
            return;
        };
        if result.revision <= segment.applied {
            log::trace!(
                "dropping stale recount {} of segment {:?}, already at {}",
                result.revision,
                result.id,
                segment.applied
            );
            return;
        }
        segment.applied = result.revision;
        if segment.word_count != result.words {
            segment.word_count = result.words;
            self.notifier.publish(&Notification::SegmentWordsChanged {
                id: result.id,
                words: result.words,
            });
        }
    }

    fn aggregate(&mut self) {
        let counts = if self.attached {
            let words = self.segments.iter().map(|segment| segment.word_count).sum();
            Counts {
                characters: self.characters,
                words,
                paragraphs: self.block_count,
                pages: page_count(words, self.words_per_page),
            }
        } else {
            Counts::default()
        };
        self.publish_counts(counts, Scope::Document);
    }

    fn publish_counts(&mut self, counts: Counts, scope: Scope) {
        let previous = match scope {
            Scope::Document => std::mem::replace(&mut self.document_counts, counts),
            Scope::Selection => std::mem::replace(&mut self.selection_counts, counts),
        };
        for notification in counts.changes(previous, scope) {
            self.notifier.publish(&notification);
        }
    }

    /// Applies background recount results that already arrived, without blocking.
    pub fn process_pending(&mut self) {
        let results = self.recounter.try_collect();
        if results.is_empty() {
            return;
        }
        for result in results {
            self.apply(result);
        }
        self.aggregate();
    }

    /// Blocks until every submitted recount has been applied.
    pub fn wait_idle(&mut self) {
        while let Some(result) = self.recounter.wait_one() {
            self.apply(result);
        }
        self.aggregate();
    }

    #[must_use]
    /// Returns true while background recounts have not reported back.
    pub fn is_busy(&self) -> bool {
        self.recounter.in_flight() > 0
    }

    /// Recomputes the selection counts. `None` or an empty range clears them.
    pub fn set_selection(&mut self, doc: &dyn TextDocument, selection: Option<Range<usize>>) {
        let counts = match selection {
            Some(range) if self.attached && range.start < range.end => {
                let end = range.end.min(doc.character_count());
                let start = range.start.min(end);
                let text = doc.text_range(start, end);
                let words = if self.comment_exclusion {
                    count_words_ignoring(&text, start, &doc.comment_ranges(start, end))
                } else {
                    count_words_ignoring(&text, start, &[])
                };
                let paragraphs = match (doc.find_block(start), doc.find_block(end)) {
                    (Some(first), Some(last)) if start < end => last - first + 1,
                    _ => 0,
                };
                Counts {
                    characters: end - start,
                    words,
                    paragraphs,
                    pages: page_count(words, self.words_per_page),
                }
            }
            _ => Counts::default(),
        };
        self.publish_counts(counts, Scope::Selection);
    }

    /// Moves the caret, announcing when it enters a different segment.
    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = Some(position);
        self.update_current();
    }

    fn update_current(&mut self) {
        let current = self
            .cursor
            .and_then(|position| self.find_segment(position))
            .map(|index| self.segments[index].id);
        if current != self.current {
            self.current = current;
            self.notifier
                .publish(&Notification::CurrentSegmentChanged(current));
        }
    }

    #[must_use]
    /// Index of the segment holding the caret.
    pub fn current_segment(&self) -> Option<usize> {
        let id = self.current?;
        self.segments.iter().position(|segment| segment.id == id)
    }

    #[must_use]
    /// Counts over the whole document.
    pub fn document_counts(&self) -> Counts {
        self.document_counts
    }

    #[must_use]
    /// Counts over the current selection.
    pub fn selection_counts(&self) -> Counts {
        self.selection_counts
    }

    #[must_use]
    /// All segments in document order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    /// Returns true when there are no segments, which only happens while detached.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    /// Segment at `index`.
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    #[must_use]
    /// Index of the segment holding `position`, or `None` past the end of the document.
    pub fn find_segment(&self, position: usize) -> Option<usize> {
        if !self.attached || position > self.characters {
            return None;
        }
        Some(self.containing(position))
    }

    #[must_use]
    /// Index of the segment after `index`.
    pub fn next(&self, index: usize) -> Option<usize> {
        (index + 1 < self.segments.len()).then_some(index + 1)
    }

    #[must_use]
    /// Index of the segment before `index`.
    pub fn previous(&self, index: usize) -> Option<usize> {
        index
            .checked_sub(1)
            .filter(|&previous| previous < self.segments.len())
    }

    #[must_use]
    /// Nesting depth of the segment at `index`.
    pub fn depth(&self, index: usize) -> Option<usize> {
        self.segment(index).map(|segment| segment.depth)
    }

    #[must_use]
    /// Characters from the segment's start up to the next segment or the end of the document.
    pub fn length(&self, index: usize) -> Option<usize> {
        self.bounds(index).map(|range| range.len())
    }

    #[must_use]
    /// Plain text of the segment, including the newline before the next segment.
    pub fn segment_text(&self, doc: &dyn TextDocument, index: usize) -> Option<String> {
        self.bounds(index)
            .map(|range| doc.text_range(range.start, range.end))
    }

    #[must_use]
    /// Text of the heading block that starts the segment, or an empty string.
    pub fn heading(&self, doc: &dyn TextDocument, index: usize) -> String {
        self.heading_block(doc, index)
            .and_then(|block| doc.block(block))
            .map(|block| block.text.clone())
            .unwrap_or_default()
    }

    #[must_use]
    /// Text of the heading paired with the segment's heading, or an empty string.
    pub fn subheading(&self, doc: &dyn TextDocument, index: usize) -> String {
        let Some(heading) = self.heading_block(doc, index) else {
            return String::new();
        };
        match (doc.block(heading), doc.block(heading + 1)) {
            (Some(heading), Some(next))
                if next.heading_level == heading.heading_level + 1
                    && next.heading_level % 2 == 0 =>
            {
                next.text.clone()
            }
            _ => String::new(),
        }
    }

    fn heading_block(&self, doc: &dyn TextDocument, index: usize) -> Option<usize> {
        let segment = self.segment(index)?;
        let block = doc.find_block(segment.position)?;
        doc.block(block)?.is_heading().then_some(block)
    }

    #[must_use]
    /// Returns true if the segment starts at a heading strictly inside the attached document.
    ///
    /// The synthetic root segment at position 0 is never valid.
    pub fn is_valid(&self, doc: &dyn TextDocument, index: usize) -> bool {
        let Some(segment) = self.segment(index) else {
            return false;
        };
        self.attached
            && segment.depth >= 1
            && segment.position > 0
            && segment.position < doc.character_count()
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "tests/structure.rs"]
mod tests;
