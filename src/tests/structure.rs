use super::DocumentStructure;
use crate::config::Config;
use crate::counter::Counts;
use crate::document::{Block, Document, TextDocument};
use crate::events::{Metric, Notification, Scope};
use crate::words::count_words_ignoring;
use proptest::prelude::*;

fn inline() -> Config {
    Config {
        background_recount: false,
        ..Config::default()
    }
}

fn background() -> Config {
    Config {
        background_recount: true,
        ..Config::default()
    }
}

fn sample() -> Document {
    Document::from_blocks(vec![
        Block::paragraph("Prologue text here"),
        Block::heading(1, "Chapter One"),
        Block::heading(2, "A subtitle"),
        Block::paragraph("It was a dark night."),
        Block::heading(3, "Scene"),
        Block::paragraph("More [hidden words] words."),
        Block::heading(1, "Chapter Two"),
        Block::paragraph("The end."),
    ])
}

fn positions(structure: &DocumentStructure) -> Vec<usize> {
    structure.segments().iter().map(|s| s.position).collect()
}

fn depths(structure: &DocumentStructure) -> Vec<usize> {
    structure.segments().iter().map(|s| s.depth).collect()
}

fn word_counts(structure: &DocumentStructure) -> Vec<usize> {
    structure.segments().iter().map(|s| s.word_count).collect()
}

fn assert_matches_rebuild(doc: &Document, structure: &DocumentStructure) {
    let fresh = DocumentStructure::with_document(&inline(), doc);
    assert_eq!(structure.segments(), fresh.segments());
    assert_eq!(structure.document_counts(), fresh.document_counts());
}

#[test]
fn test_rebuild_outline() {
    let doc = sample();
    let structure = DocumentStructure::with_document(&inline(), &doc);
    assert_eq!(positions(&structure), vec![0, 19, 63, 96]);
    assert_eq!(depths(&structure), vec![1, 1, 3, 1]);
    assert_eq!(word_counts(&structure), vec![3, 9, 3, 4]);
}

#[test]
fn test_rebuild_is_idempotent() {
    let doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);
    let first = structure.segments().to_vec();
    structure.rebuild(&doc);
    assert_eq!(structure.segments(), first.as_slice());
    structure.rebuild(&doc);
    assert_eq!(structure.segments(), first.as_slice());
}

#[test]
fn test_word_counts_are_additive() {
    let doc = sample();
    let structure = DocumentStructure::with_document(&inline(), &doc);
    let whole = count_words_ignoring(
        &doc.plain_text(),
        0,
        &doc.comment_ranges(0, doc.character_count()),
    );
    assert_eq!(whole, 19);
    assert_eq!(word_counts(&structure).iter().sum::<usize>(), whole);
}

#[test]
fn test_document_counts() {
    let doc = sample();
    let structure = DocumentStructure::with_document(&inline(), &doc);
    assert_eq!(
        structure.document_counts(),
        Counts {
            characters: 116,
            words: 19,
            paragraphs: 8,
            pages: 1,
        }
    );
}

#[test]
fn test_comment_exclusion_can_be_disabled() {
    let doc = sample();
    let config = Config {
        comment_exclusion: false,
        ..inline()
    };
    let structure = DocumentStructure::with_document(&config, &doc);
    assert_eq!(word_counts(&structure), vec![3, 9, 5, 4]);
}

#[test]
fn test_heading_pairing() {
    let doc = Document::from_blocks(vec![
        Block::paragraph("Intro"),
        Block::heading(1, "Title"),
        Block::heading(2, "Sub"),
        Block::paragraph("Text"),
    ]);
    let structure = DocumentStructure::with_document(&inline(), &doc);
    assert_eq!(positions(&structure), vec![0, 6]);
    assert_eq!(structure.heading(&doc, 1), "Title");
    assert_eq!(structure.subheading(&doc, 1), "Sub");
}

#[test]
fn test_leading_heading_is_the_root_segment() {
    let doc = Document::from_blocks(vec![
        Block::heading(1, "Title"),
        Block::heading(2, "Sub"),
        Block::paragraph("Text"),
    ]);
    let structure = DocumentStructure::with_document(&inline(), &doc);
    assert_eq!(structure.len(), 1);
    assert_eq!(structure.heading(&doc, 0), "Title");
    assert_eq!(structure.subheading(&doc, 0), "Sub");
}

#[test]
fn test_odd_levels_never_pair() {
    let doc = Document::from_blocks(vec![
        Block::paragraph("Intro"),
        Block::heading(2, "Part"),
        Block::heading(3, "Chapter"),
    ]);
    let structure = DocumentStructure::with_document(&inline(), &doc);
    assert_eq!(positions(&structure), vec![0, 6, 11]);
    assert_eq!(depths(&structure), vec![1, 1, 2]);
}

#[test]
fn test_depth_never_drops_below_one() {
    let doc = Document::from_blocks(vec![
        Block::paragraph("Intro"),
        Block::heading(3, "Deep"),
        Block::heading(1, "Shallow"),
    ]);
    let structure = DocumentStructure::with_document(&inline(), &doc);
    assert_eq!(depths(&structure), vec![1, 1, 1]);
}

#[test]
fn test_headings_and_text() {
    let doc = sample();
    let structure = DocumentStructure::with_document(&inline(), &doc);
    assert_eq!(structure.heading(&doc, 0), "");
    assert_eq!(structure.heading(&doc, 1), "Chapter One");
    assert_eq!(structure.subheading(&doc, 1), "A subtitle");
    assert_eq!(structure.heading(&doc, 2), "Scene");
    assert_eq!(structure.subheading(&doc, 2), "");
    assert_eq!(structure.heading(&doc, 9), "");
    assert_eq!(
        structure.segment_text(&doc, 2).as_deref(),
        Some("Scene\nMore [hidden words] words.\n")
    );
    assert_eq!(structure.length(2), Some(33));
    assert_eq!(
        structure.segment_text(&doc, 3).as_deref(),
        Some("Chapter Two\nThe end.")
    );
    assert_eq!(structure.length(3), Some(20));
    assert_eq!(structure.segment_text(&doc, 4), None);
}

#[test]
fn test_navigation() {
    let doc = sample();
    let structure = DocumentStructure::with_document(&inline(), &doc);
    assert_eq!(structure.find_segment(0), Some(0));
    assert_eq!(structure.find_segment(18), Some(0));
    assert_eq!(structure.find_segment(19), Some(1));
    assert_eq!(structure.find_segment(62), Some(1));
    assert_eq!(structure.find_segment(63), Some(2));
    assert_eq!(structure.find_segment(116), Some(3));
    assert_eq!(structure.find_segment(117), None);
    assert_eq!(structure.next(0), Some(1));
    assert_eq!(structure.next(3), None);
    assert_eq!(structure.previous(0), None);
    assert_eq!(structure.previous(2), Some(1));
    assert_eq!(structure.depth(2), Some(3));
    assert!((1..4).all(|index| structure.is_valid(&doc, index)));
    assert!(!structure.is_valid(&doc, 0), "The root segment sits at 0");
    assert!(!structure.is_valid(&doc, 4));
}

#[test]
fn test_segment_text_runs_to_next_segment() {
    let doc = Document::from_blocks(vec![
        Block::paragraph("intro"),
        Block::heading(1, "Chapter"),
        Block::paragraph("body"),
    ]);
    let structure = DocumentStructure::with_document(&inline(), &doc);
    assert_eq!(positions(&structure), vec![0, 6]);
    assert_eq!(structure.segment_text(&doc, 0).as_deref(), Some("intro\n"));
    assert_eq!(structure.length(0), Some(6));
    assert_eq!(structure.segment_text(&doc, 1).as_deref(), Some("Chapter\nbody"));
    assert_eq!(structure.length(1), Some(12));
    assert_eq!(word_counts(&structure), vec![1, 2]);
    assert!(!structure.is_valid(&doc, 0));
    assert!(structure.is_valid(&doc, 1));
}

#[test]
fn test_insertion_shifts_later_segments() {
    let mut doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);
    let edit = doc.insert(61, " extra words");
    structure.on_edit(&doc, &edit);

    assert_eq!(positions(&structure), vec![0, 19, 75, 108]);
    assert_eq!(word_counts(&structure), vec![3, 11, 3, 4]);
    assert_matches_rebuild(&doc, &structure);
}

#[test]
fn test_deletion_within_segment() {
    let mut doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);
    let ids: Vec<_> = structure.segments().iter().map(|s| s.id).collect();
    let edit = doc.remove(51, 5);
    structure.on_edit(&doc, &edit);

    assert_eq!(positions(&structure), vec![0, 19, 58, 91]);
    assert_eq!(word_counts(&structure), vec![3, 8, 3, 4]);
    let kept: Vec<_> = structure.segments().iter().map(|s| s.id).collect();
    assert_eq!(kept, ids, "Fast path keeps segment identities");
    assert_matches_rebuild(&doc, &structure);
}

#[test]
fn test_deletion_across_segments_rebuilds() {
    let mut doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);
    let notifications = structure.subscribe();
    let edit = doc.remove(50, 20);
    structure.on_edit(&doc, &edit);

    assert_eq!(positions(&structure), vec![0, 19, 76]);
    assert_eq!(depths(&structure), vec![1, 1, 1]);
    assert_eq!(word_counts(&structure), vec![3, 8, 4]);
    assert!(notifications
        .try_iter()
        .any(|n| n == Notification::StructureChanged));
    assert_matches_rebuild(&doc, &structure);
}

#[test]
fn test_deleting_up_to_a_segment_start_rebuilds() {
    let mut doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);
    let edit = doc.remove(62, 1);
    structure.on_edit(&doc, &edit);

    assert_eq!(structure.len(), 3);
    assert_matches_rebuild(&doc, &structure);
}

#[test]
fn test_splitting_a_heading_rebuilds() {
    let mut doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);
    let edit = doc.insert(26, "\n");
    structure.on_edit(&doc, &edit);

    assert_eq!(structure.len(), 5);
    assert_matches_rebuild(&doc, &structure);
}

#[test]
fn test_heading_level_change_rebuilds() {
    let mut doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);

    let edit = doc.set_heading_level(3, 1).unwrap();
    structure.on_edit(&doc, &edit);
    assert_eq!(positions(&structure), vec![0, 19, 42, 63, 96]);
    assert_eq!(depths(&structure), vec![1, 1, 1, 3, 1]);
    assert_matches_rebuild(&doc, &structure);

    let edit = doc.set_heading_level(7, 2).unwrap();
    structure.on_edit(&doc, &edit);
    assert_eq!(structure.len(), 5);
    assert_eq!(structure.subheading(&doc, 4), "The end.");
}

#[test]
fn test_comment_carry_recounts_following_segments() {
    let mut doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);
    let notifications = structure.subscribe();
    let edit = doc.insert(42, "[");
    structure.on_edit(&doc, &edit);

    assert_eq!(edit.comments.invalidated, vec![3, 4, 5]);
    assert_eq!(word_counts(&structure), vec![3, 4, 1, 4]);
    assert_eq!(structure.document_counts().words, 12);
    assert!(notifications
        .try_iter()
        .any(|n| n == Notification::BlocksInvalidated(3..6)));
    assert_matches_rebuild(&doc, &structure);
}

#[test]
fn test_notifications_only_on_change() {
    let mut doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);
    let notifications = structure.subscribe();
    let edit = doc.insert(48, ",");
    structure.on_edit(&doc, &edit);

    let received: Vec<Notification> = notifications.try_iter().collect();
    assert_eq!(
        received,
        vec![Notification::CountChanged {
            scope: Scope::Document,
            metric: Metric::Characters,
            value: 117,
        }]
    );
}

#[test]
fn test_selection_counts() {
    let doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);

    structure.set_selection(&doc, Some(42..62));
    assert_eq!(
        structure.selection_counts(),
        Counts {
            characters: 20,
            words: 5,
            paragraphs: 1,
            pages: 1,
        }
    );

    structure.set_selection(&doc, Some(69..95));
    assert_eq!(structure.selection_counts().words, 2);
    assert_eq!(structure.selection_counts().paragraphs, 1);

    structure.set_selection(&doc, Some(40..70));
    assert_eq!(structure.selection_counts().characters, 30);
    assert_eq!(structure.selection_counts().words, 8);
    assert_eq!(structure.selection_counts().paragraphs, 4);

    let notifications = structure.subscribe();
    structure.set_selection(&doc, None);
    assert_eq!(structure.selection_counts(), Counts::default());
    assert_eq!(notifications.try_iter().count(), 4);

    structure.set_selection(&doc, Some(10..10));
    assert_eq!(notifications.try_iter().count(), 0);
}

#[test]
fn test_current_segment_tracking() {
    let doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);
    let notifications = structure.subscribe();
    let second = structure.segment(1).unwrap().id;

    structure.set_cursor(20);
    assert_eq!(
        notifications.try_recv().unwrap(),
        Notification::CurrentSegmentChanged(Some(second))
    );
    assert_eq!(structure.current_segment(), Some(1));

    structure.set_cursor(25);
    assert!(notifications.try_recv().is_err());

    structure.set_cursor(500);
    assert_eq!(
        notifications.try_recv().unwrap(),
        Notification::CurrentSegmentChanged(None)
    );
    assert_eq!(structure.current_segment(), None);
}

#[test]
fn test_detached_structure() {
    let mut doc = sample();
    let mut structure = DocumentStructure::with_document(&inline(), &doc);
    structure.detach();

    assert!(!structure.is_attached());
    assert!(structure.is_empty());
    assert_eq!(structure.find_segment(0), None);
    assert_eq!(structure.next(0), None);
    assert!(!structure.is_valid(&doc, 0));
    assert_eq!(structure.document_counts(), Counts::default());

    let edit = doc.insert(0, "More ");
    structure.on_edit(&doc, &edit);
    assert!(structure.is_empty());

    structure.attach(&doc);
    assert_eq!(structure.len(), 4);
    assert_eq!(structure.document_counts().words, 20);
}

#[test]
fn test_background_recount_converges() {
    let mut doc = sample();
    let mut structure = DocumentStructure::with_document(&background(), &doc);
    structure.wait_idle();
    assert!(!structure.is_busy());
    assert_matches_rebuild(&doc, &structure);

    for (position, text) in [(61, " and stormy"), (61, " very"), (0, "A ")] {
        let edit = doc.insert(position, text);
        structure.on_edit(&doc, &edit);
    }
    structure.wait_idle();
    assert_matches_rebuild(&doc, &structure);
    assert_eq!(structure.document_counts().words, 23);
}

#[test]
fn test_process_pending_applies_results() {
    let doc = sample();
    let mut structure = DocumentStructure::with_document(&background(), &doc);
    while structure.is_busy() {
        structure.process_pending();
        std::thread::yield_now();
    }
    assert_eq!(structure.document_counts().words, 19);
}

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, &'static str),
    Remove(usize, usize),
    Heading(usize, u8),
}

fn arb_op() -> impl Strategy<Value = Op> {
    let texts = prop::sample::select(vec!["a", " word", "\n", "x\ny", "[", "]", "--", "it's "]);
    prop_oneof![
        (any::<usize>(), texts).prop_map(|(at, text)| Op::Insert(at, text)),
        (any::<usize>(), 0..15usize).prop_map(|(at, len)| Op::Remove(at, len)),
        (any::<usize>(), 0..4u8).prop_map(|(block, level)| Op::Heading(block, level)),
    ]
}

proptest! {
    #[test]
    fn prop_incremental_matches_rebuild(ops in prop::collection::vec(arb_op(), 1..25)) {
        let mut doc = sample();
        let mut structure = DocumentStructure::with_document(&inline(), &doc);

        for op in ops {
            let end = doc.character_count() + 1;
            let edit = match op {
                Op::Insert(at, text) => Some(doc.insert(at % end, text)),
                Op::Remove(at, len) => Some(doc.remove(at % end, len)),
                Op::Heading(block, level) => {
                    let block = block % doc.block_count();
                    doc.set_heading_level(block, level)
                }
            };
            if let Some(edit) = edit {
                structure.on_edit(&doc, &edit);
            }

            let fresh = DocumentStructure::with_document(&inline(), &doc);
            prop_assert_eq!(structure.segments(), fresh.segments());

            let whole = count_words_ignoring(
                &doc.plain_text(),
                0,
                &doc.comment_ranges(0, doc.character_count()),
            );
            prop_assert_eq!(structure.document_counts().words, whole);
        }
    }
}
