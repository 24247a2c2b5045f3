use super::{next_word_boundary, previous_word_boundary, word_at, Cursor, MoveMode};

const SAMPLE: &str = "A word.\nWith multiple periods...\nCombined with a dash-separated word. There's also an apostrophe.\n“I hate you,” Anakin said.";

fn forward(from: usize, moves: usize) -> Vec<String> {
    let mut cursor = Cursor::at(from);
    (0..moves)
        .map(|_| {
            cursor.move_to_next_word(SAMPLE, MoveMode::KeepAnchor);
            cursor.selected_text(SAMPLE)
        })
        .collect()
}

fn backward(from: usize, moves: usize) -> Vec<String> {
    let mut cursor = Cursor::at(from);
    (0..moves)
        .map(|_| {
            cursor.move_to_previous_word(SAMPLE, MoveMode::KeepAnchor);
            cursor.selected_text(SAMPLE)
        })
        .collect()
}

fn selected_word(position: usize) -> String {
    let mut cursor = Cursor::at(position);
    cursor.select_word(SAMPLE);
    cursor.selected_text(SAMPLE)
}

#[test]
fn test_no_movement_past_the_ends() {
    let mut cursor = Cursor::at(0);
    cursor.move_to_previous_word(SAMPLE, MoveMode::KeepAnchor);
    assert!(!cursor.has_selection());
    assert_eq!(cursor.position, 0);

    let mut cursor = Cursor::at(124);
    cursor.move_to_next_word(SAMPLE, MoveMode::KeepAnchor);
    assert!(!cursor.has_selection());
    assert_eq!(next_word_boundary(SAMPLE, 500), 124);
}

#[test]
fn test_forward_stops_at_word_ends() {
    assert_eq!(forward(0, 1), vec!["A"]);
    assert_eq!(forward(1, 1), vec![" word"]);
    assert_eq!(forward(7, 1), vec!["\nWith"]);
    assert_eq!(forward(70, 1), vec!["There's"]);
}

#[test]
fn test_forward_stops_after_trailing_punctuation() {
    assert_eq!(forward(6, 1), vec!["."]);
    assert_eq!(
        forward(22, 3),
        vec!["periods", "periods...", "periods...\nCombined"]
    );
    assert_eq!(forward(105, 2), vec![" you", " you,”"]);
    assert_eq!(forward(97, 1), vec!["\n“I"]);
}

#[test]
fn test_forward_stops_at_single_hyphen() {
    assert_eq!(forward(49, 2), vec!["dash", "dash-separated"]);
}

#[test]
fn test_backward_stops_at_word_starts() {
    assert_eq!(backward(2, 1), vec!["A "]);
    assert_eq!(backward(6, 1), vec!["word"]);
    assert_eq!(backward(12, 1), vec!["With"]);
    assert_eq!(backward(63, 2), vec!["separated", "dash-separated"]);
    assert_eq!(backward(101, 1), vec!["I "]);
}

#[test]
fn test_backward_stops_at_punctuation() {
    assert_eq!(backward(8, 1), vec![".\n"]);
    assert_eq!(
        backward(41, 3),
        vec!["Combined", "...\nCombined", "periods...\nCombined"]
    );
    assert_eq!(backward(99, 1), vec!["“"]);
}

#[test]
fn test_move_anchor_clears_selection() {
    let mut cursor = Cursor::at(2);
    cursor.move_to_next_word(SAMPLE, MoveMode::MoveAnchor);
    assert_eq!(cursor, Cursor::at(6));
    cursor.move_to_previous_word(SAMPLE, MoveMode::MoveAnchor);
    assert_eq!(cursor, Cursor::at(2));
    assert_eq!(previous_word_boundary(SAMPLE, 2), 0);
}

#[test]
fn test_select_word() {
    assert_eq!(selected_word(0), "A");
    assert_eq!(selected_word(1), "A");
    assert_eq!(selected_word(2), "word");
    assert_eq!(selected_word(4), "word");
    assert_eq!(selected_word(6), "word");
    assert_eq!(selected_word(52), "dash-separated");
    assert_eq!(selected_word(72), "There's");
    assert_eq!(selected_word(99), "I");
}

#[test]
fn test_select_punctuation_outside_words() {
    assert_eq!(selected_word(7), ".");
    assert_eq!(selected_word(32), "...");
    assert_eq!(selected_word(110), ",”");
}

#[test]
fn test_nothing_to_select_between_spaces() {
    assert_eq!(word_at("a  b", 2), None);
    let mut cursor = Cursor::at(2);
    cursor.select_word("a  b");
    assert!(!cursor.has_selection());
}
