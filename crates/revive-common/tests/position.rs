use super::*;
use crate::span::Span;

#[test]
fn first_line_starts_at_origin() {
    let map = LineMap::new("abc\ndef\nghi");
    assert_eq!(map.position(0), Position { line: 0, column: 0 });
    assert_eq!(map.position(1), Position { line: 0, column: 1 });
}

#[test]
fn position_after_newline_is_next_line() {
    let map = LineMap::new("abc\ndef\nghi");
    // 'd' is at byte offset 4
    assert_eq!(map.position(4), Position { line: 1, column: 0 });
    // 'g' is at byte offset 8
    assert_eq!(map.position(8), Position { line: 2, column: 0 });
}

#[test]
fn range_covers_a_span_across_lines() {
    let map = LineMap::new("abc\ndef\nghi");
    let span = Span::new(2, 9);
    let range = map.range(span);
    assert_eq!(range.start, Position { line: 0, column: 2 });
    assert_eq!(range.end, Position { line: 2, column: 1 });
}
