mod common;
use common::*;

use proptest::prelude::*;
use turing_console::core::ConsoleError;
use turing_console::term::Pen;
use turing_console::types::Theme;

fn tape_pens(console: &Buffered, len: usize) -> Vec<(char, Pen)> {
    (0..len)
        .map(|i| visible(console, console.layout().tape_cell(i)))
        .collect()
}

fn highlighted(cells: &[(char, Pen)]) -> Vec<usize> {
    let cursor = pen(&[Theme::default().tape_cursor]);
    cells
        .iter()
        .enumerate()
        .filter(|(_, (_, p))| *p == cursor)
        .map(|(i, _)| i)
        .collect()
}

fn tape_strategy() -> impl Strategy<Value = String> {
    // Viewport is 30 cells wide at the shared test size.
    proptest::collection::vec(prop_oneof![Just('0'), Just('1'), Just('_')], 1..=30)
        .prop_map(|v| v.into_iter().collect())
}

proptest! {
    #[test]
    fn move_cursor_leaves_exactly_one_highlight(
        (tape, p) in tape_strategy().prop_flat_map(|t| {
            let len = t.chars().count();
            (Just(t), 0..len)
        })
    ) {
        let mut console = buffered_console(&closed_stream());
        console.set_tape_value(&tape).unwrap();
        console.set_tape_cursor(p, &tape).unwrap();

        let cells = tape_pens(&console, tape.len());
        prop_assert_eq!(highlighted(&cells), vec![p]);
        let shown: String = cells.iter().map(|(c, _)| *c).collect();
        prop_assert_eq!(shown, tape);
    }

    #[test]
    fn second_move_restores_first_cell(
        (tape, p1, p2) in tape_strategy()
            .prop_filter("need two cells", |t| t.len() >= 2)
            .prop_flat_map(|t| {
                let len = t.chars().count();
                (Just(t), 0..len, 0..len)
            })
            .prop_filter("distinct positions", |(_, a, b)| a != b)
    ) {
        let mut console = buffered_console(&closed_stream());
        console.set_tape_value(&tape).unwrap();
        console.set_tape_cursor(p1, &tape).unwrap();
        console.set_tape_cursor(p2, &tape).unwrap();

        let cells = tape_pens(&console, tape.len());
        prop_assert!(cells[p1].1.is_default());
        prop_assert_eq!(highlighted(&cells), vec![p2]);
        prop_assert_eq!(console.tape_cursor(), p2);
    }
}

#[test]
fn paint_full_is_idempotent() {
    let mut console = buffered_console(&closed_stream());
    let tape = "10_01";
    console.set_tape_cursor(2, tape).unwrap();

    console.set_tape_value(tape).unwrap();
    let first = console.backend().presented().unwrap().clone();
    console.set_tape_value(tape).unwrap();
    let second = console.backend().presented().unwrap().clone();

    assert_eq!(first, second);
    assert_eq!(highlighted(&tape_pens(&console, 5)), vec![2]);
}

#[test]
fn write_at_updates_symbol_without_moving_highlight() {
    let mut console = buffered_console(&closed_stream());
    console.set_tape_value("000").unwrap();
    console.set_tape_cursor(2, "000").unwrap();

    console.write_at('1', 0).unwrap();
    console.write_at('1', 2).unwrap();

    let cells = tape_pens(&console, 3);
    assert_eq!(cells[0], ('1', Pen::default()));
    assert_eq!(cells[1], ('0', Pen::default()));
    assert_eq!(cells[2], ('1', pen(&[Theme::default().tape_cursor])));
    assert_eq!(highlighted(&cells), vec![2]);
}

#[test]
fn tape_wider_than_viewport_is_rejected() {
    let mut console = buffered_console(&closed_stream());
    let width = console.layout().tape_width as usize;
    let wide = "1".repeat(width + 1);

    let err = console.set_tape_value(&wide).unwrap_err();
    assert!(matches!(err, ConsoleError::TapeExceedsViewport { .. }));
    assert_eq!(visible(&console, console.layout().tape_start).0, ' ');

    let err = console.write_at('1', width).unwrap_err();
    assert!(matches!(err, ConsoleError::TapeExceedsViewport { .. }));
}

#[test]
fn cursor_out_of_range_changes_nothing() {
    let mut console = buffered_console(&closed_stream());
    console.set_tape_value("0101").unwrap();
    console.set_tape_cursor(3, "0101").unwrap();
    let before = console.backend().presented().unwrap().clone();

    let err = console.set_tape_cursor(4, "0101").unwrap_err();
    assert!(matches!(err, ConsoleError::CursorOutOfRange { position: 4, len: 4 }));
    assert_eq!(console.tape_cursor(), 3);
    assert_eq!(console.backend().presented().unwrap(), &before);
}

#[test]
fn shrunk_tape_blanks_old_head() {
    let mut console = buffered_console(&closed_stream());
    console.set_tape_value("01010").unwrap();
    console.set_tape_cursor(4, "01010").unwrap();

    // Old head (4) is past the new tape; it is blanked, not left lit.
    console.set_tape_cursor(0, "01").unwrap();
    assert_eq!(console.tape_cursor(), 0);
    let cells = tape_pens(&console, 5);
    assert_eq!(cells[0], ('0', pen(&[Theme::default().tape_cursor])));
    assert_eq!(cells[4], (' ', Pen::default()));
    assert_eq!(highlighted(&cells), vec![0]);
}

#[test]
fn write_at_huge_position_is_an_error() {
    let mut console = buffered_console(&closed_stream());
    let err = console.write_at('1', usize::MAX).unwrap_err();
    assert!(matches!(err, ConsoleError::TapeExceedsViewport { .. }));
    assert_eq!(console.errors().try_iter().count(), 1);
}
