use super::*;

#[test]
fn merge_covers_both() {
    let merged = Span::new(10, 20).merge(Span::new(15, 30));
    assert_eq!(merged, Span::new(10, 30));
    assert_eq!(merged.len(), 20);
}

#[test]
fn from_range_keeps_offsets() {
    let span = Span::from_range(3..9);
    assert_eq!(span.to_range(), 3..9);
    assert!(!span.is_empty());
    assert!(Span::DUMMY.is_empty());
}

#[test]
fn positions_are_one_based() {
    let index = LineIndex::new("main", "x = 1\ny = x + 2\n");
    assert_eq!(
        index.position(0),
        Position {
            offset: 0,
            line: 1,
            column: 1
        }
    );
    // `x` on the second line
    assert_eq!(
        index.position(10),
        Position {
            offset: 10,
            line: 2,
            column: 5
        }
    );
}

#[test]
fn newline_belongs_to_its_line() {
    let index = LineIndex::new("m", "ab\ncd");
    assert_eq!(index.position(2).line, 1);
    assert_eq!(index.position(3).line, 2);
    assert_eq!(index.position(3).column, 1);
}

#[test]
fn offsets_past_end_are_clamped() {
    let index = LineIndex::new("m", "ab");
    assert_eq!(index.position(100).offset, 2);
}

#[test]
fn location_display_names_module() {
    let index = LineIndex::new("main", "a\n  bc");
    let loc = index.location(Span::new(4, 6));
    assert_eq!(loc.to_string(), "line 2, column 3, file main");
    assert_eq!(loc.span(), Span::new(4, 6));
}
