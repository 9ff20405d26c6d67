use super::*;
use crate::span::Span;

#[test]
fn parse_error_carries_its_span() {
    let diag = Diagnostic::parse_error(Span::new(3, 5), "unexpected token");
    assert_eq!(diag.kind, DiagnosticKind::ParseError);
    assert_eq!(diag.span, Span::new(3, 5));
}

#[test]
fn missing_capture_names_the_identifier() {
    let diag = Diagnostic::missing_capture(Span::at(0), "outer");
    assert!(diag.message.contains("outer"));
    assert_eq!(diag.kind, DiagnosticKind::MissingCapture);
}

#[test]
fn display_includes_kind_and_span() {
    let diag = Diagnostic::name_collision(Span::new(1, 2), "__revive_0");
    let text = diag.to_string();
    assert!(text.contains("NameCollision"));
    assert!(text.contains("1..2"));
}
