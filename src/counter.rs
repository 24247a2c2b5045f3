//! Character, word, paragraph and page counting.
//!
//! Character and paragraph counts come straight from the document and are cheap. Word counts are
//! cached per segment and only recomputed for segments whose text changed. Recounts either run
//! inline or are handed to the rayon pool with an owned snapshot of the segment text, and their
//! results come back over a channel to be applied by the thread that owns the structure.

use crate::events::{Metric, Notification, Scope};
use crate::segment::SegmentId;
use crate::words::count_words_ignoring;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Serialize;
use std::ops::Range;

/// Words per manuscript page unless configured otherwise.
pub const WORDS_PER_PAGE: usize = 250;

#[must_use]
/// Number of pages needed for `words`, rounding partial pages up.
///
/// Exact multiples do not round up: 250 words are one page, 251 are two.
pub fn page_count(words: usize, words_per_page: usize) -> usize {
    if words_per_page == 0 {
        return 0;
    }
    words.div_ceil(words_per_page)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
/// The four counted quantities of a document or selection.
pub struct Counts {
    /// Characters of plain text.
    pub characters: usize,
    /// Words outside comments.
    pub words: usize,
    /// Paragraph blocks.
    pub paragraphs: usize,
    /// Manuscript pages.
    pub pages: usize,
}

impl Counts {
    fn metrics(self) -> [(Metric, usize); 4] {
        [
            (Metric::Characters, self.characters),
            (Metric::Words, self.words),
            (Metric::Paragraphs, self.paragraphs),
            (Metric::Pages, self.pages),
        ]
    }

    /// Notifications for every metric that differs from `previous`.
    pub(crate) fn changes(self, previous: Self, scope: Scope) -> Vec<Notification> {
        self.metrics()
            .into_iter()
            .zip(previous.metrics())
            .filter(|((_, new), (_, old))| new != old)
            .map(|((metric, value), _)| Notification::CountChanged {
                scope,
                metric,
                value,
            })
            .collect()
    }
}

#[derive(Clone, Debug)]
/// Owned input of one segment recount.
pub(crate) struct RecountJob {
    pub id: SegmentId,
    pub revision: u64,
    pub text: String,
    pub offset: usize,
    pub ignored: Vec<Range<usize>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Result of a recount, posted back to the owning thread.
pub(crate) struct RecountResult {
    pub id: SegmentId,
    pub revision: u64,
    pub words: usize,
}

impl RecountJob {
    fn run(self) -> RecountResult {
        let words = count_words_ignoring(&self.text, self.offset, &self.ignored);
        log::trace!(
            "recounted segment {:?} revision {}: {words} words",
            self.id,
            self.revision
        );
        RecountResult {
            id: self.id,
            revision: self.revision,
            words,
        }
    }
}

#[derive(Debug)]
/// Runs segment recounts inline or on the rayon pool.
///
/// Background jobs are fire-and-forget: there is no cancellation, and a job that never reports
/// back leaves its segment stale until the next recount.
pub(crate) struct Recounter {
    background: bool,
    tx: Sender<RecountResult>,
    rx: Receiver<RecountResult>,
    in_flight: usize,
}

impl Recounter {
    pub fn new(background: bool) -> Self {
        let (tx, rx) = unbounded();
        Self {
            background,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Starts a recount. Inline recounts return their result immediately.
    pub fn submit(&mut self, job: RecountJob) -> Option<RecountResult> {
        if !self.background {
            return Some(job.run());
        }

        let tx = self.tx.clone();
        self.in_flight += 1;
        rayon::spawn(move || {
            log_send_error("recount", tx.send(job.run()));
        });
        None
    }

    /// Collects results that already arrived without blocking.
    pub fn try_collect(&mut self) -> Vec<RecountResult> {
        let results: Vec<RecountResult> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(results.len());
        results
    }

    /// Blocks for the next result if any recount is still running.
    pub fn wait_one(&mut self) -> Option<RecountResult> {
        if self.in_flight == 0 {
            return None;
        }
        let result = self.rx.recv().ok()?;
        self.in_flight -= 1;
        Some(result)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

fn log_send_error<T>(chan: &'static str, res: Result<(), crossbeam_channel::SendError<T>>) -> bool {
    res.map_err(|err| log::warn!("Recounter: send to {chan} error: {err}"))
        .is_ok()
}

#[cfg(test)]
#[path = "tests/counter.rs"]
mod tests;
