use super::*;

#[test]
fn merge_takes_the_outer_bounds() {
    let a = Span::new(4, 10);
    let b = Span::new(2, 6);
    assert_eq!(a.merge(b), Span::new(2, 10));
}

#[test]
fn synthetic_span_has_no_text() {
    let s = Span::synthetic();
    assert!(s.is_synthetic());
    assert_eq!(s.slice("hello world"), "");
}

#[test]
fn slice_extracts_the_byte_range() {
    let span = Span::new(6, 11);
    assert_eq!(span.slice("hello world"), "world");
}

#[test]
fn empty_span_reports_zero_length() {
    let span = Span::at(3);
    assert!(span.is_empty());
    assert_eq!(span.len(), 0);
}
