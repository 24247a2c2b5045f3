//! Change notifications published to observers such as the user interface.
//!
//! Observers subscribe once and receive every later notification over a channel. Notifications
//! are only published when a value actually changed.

use crate::segment::SegmentId;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Serialize;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Which text a count refers to.
pub enum Scope {
    /// The whole document.
    Document,
    /// The current selection.
    Selection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// One of the counted quantities.
pub enum Metric {
    /// Characters of plain text.
    Characters,
    /// Words as found by the word iterator.
    Words,
    /// Paragraph blocks.
    Paragraphs,
    /// Manuscript pages.
    Pages,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Something observers may want to react to.
pub enum Notification {
    /// Segments were created or destroyed.
    StructureChanged,
    /// A segment finished a recount with a different result.
    SegmentWordsChanged {
        /// The recounted segment.
        id: SegmentId,
        /// Its new word count.
        words: usize,
    },
    /// The caret moved into a different segment.
    CurrentSegmentChanged(Option<SegmentId>),
    /// A document or selection count changed.
    CountChanged {
        /// Document or selection.
        scope: Scope,
        /// Which count.
        metric: Metric,
        /// The new value.
        value: usize,
    },
    /// Comment ranges of these blocks changed and they need repainting.
    BlocksInvalidated(Range<usize>),
}

#[derive(Debug, Default)]
/// Fans notifications out to every live subscriber.
pub struct Notifier {
    subscribers: Vec<Sender<Notification>>,
}

impl Notifier {
    /// Registers a new observer.
    pub fn subscribe(&mut self) -> Receiver<Notification> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Sends a notification, forgetting subscribers whose receiver was dropped.
    pub fn publish(&mut self, notification: &Notification) {
        self.subscribers
            .retain(|subscriber| subscriber.send(notification.clone()).is_ok());
    }
}
