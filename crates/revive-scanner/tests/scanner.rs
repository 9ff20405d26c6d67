use super::*;

fn kinds(source: &str) -> Vec<SyntaxKind> {
    let mut scanner = ScannerState::new(source);
    let mut out = Vec::new();
    loop {
        let kind = scanner.scan(true);
        if kind == SyntaxKind::EndOfFile {
            out.push(kind);
            break;
        }
        out.push(kind);
    }
    out
}

#[test]
fn scans_identifiers_and_keywords() {
    let mut scanner = ScannerState::new("let x = foo;");
    assert_eq!(scanner.scan(true), SyntaxKind::LetKeyword);
    assert_eq!(scanner.scan(true), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value(), "x");
    assert_eq!(scanner.scan(true), SyntaxKind::EqualsToken);
    assert_eq!(scanner.scan(true), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value(), "foo");
    assert_eq!(scanner.scan(true), SyntaxKind::SemicolonToken);
    assert_eq!(scanner.scan(true), SyntaxKind::EndOfFile);
}

#[test]
fn scans_numeric_and_bigint_literals() {
    let mut scanner = ScannerState::new("123 4.5 1e10 10n");
    assert_eq!(scanner.scan(true), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.get_token_value(), "123");
    assert_eq!(scanner.scan(true), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.get_token_value(), "4.5");
    assert_eq!(scanner.scan(true), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.get_token_value(), "1e10");
    assert_eq!(scanner.scan(true), SyntaxKind::BigIntLiteral);
    assert_eq!(scanner.get_token_value(), "10n");
}

#[test]
fn scans_string_literals_with_escapes() {
    let mut scanner = ScannerState::new(r#" "a\"b" 'c\'d' "#);
    assert_eq!(scanner.scan(true), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value(), r#""a\"b""#);
    assert!(!scanner.is_unterminated());
    assert_eq!(scanner.scan(true), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value(), r#"'c\'d'"#);
}

#[test]
fn flags_unterminated_string() {
    let mut scanner = ScannerState::new("\"abc");
    assert_eq!(scanner.scan(true), SyntaxKind::StringLiteral);
    assert!(scanner.is_unterminated());
}

#[test]
fn scans_template_literal_without_substitution() {
    let mut scanner = ScannerState::new("`hello world`");
    assert_eq!(scanner.scan(true), SyntaxKind::NoSubstitutionTemplateLiteral);
    assert_eq!(scanner.get_token_value(), "`hello world`");
}

#[test]
fn scans_template_literal_with_substitution() {
    let mut scanner = ScannerState::new("`a${x}b`");
    assert_eq!(scanner.scan(true), SyntaxKind::TemplateHead);
    assert_eq!(scanner.get_token_value(), "`a${");
    assert_eq!(scanner.scan(true), SyntaxKind::Identifier);
    assert_eq!(scanner.re_scan_template_continuation(), SyntaxKind::TemplateTail);
    assert_eq!(scanner.get_token_value(), "}b`");
}

#[test]
fn scans_regex_literal_when_allowed() {
    let mut scanner = ScannerState::new("/ab\\/c[d/]e/gi");
    assert_eq!(scanner.scan(true), SyntaxKind::RegularExpressionLiteral);
    assert_eq!(scanner.get_token_value(), "/ab\\/c[d/]e/gi");
}

#[test]
fn re_scans_slash_as_division() {
    let mut scanner = ScannerState::new("a / b");
    assert_eq!(scanner.scan(true), SyntaxKind::Identifier);
    // Parser decided, from grammatical position, that a regex cannot start
    // here, and asks the scanner to treat the slash as a division operator.
    let slash_start = scanner.scan(false);
    assert_eq!(slash_start, SyntaxKind::SlashToken);
}

#[test]
fn validates_regex_flags() {
    assert!(ScannerState::validate_regex_flags("gi").is_ok());
    assert_eq!(
        ScannerState::validate_regex_flags("gg").unwrap_err().1,
        RegexFlagErrorKind::Duplicate
    );
    assert_eq!(
        ScannerState::validate_regex_flags("q").unwrap_err().1,
        RegexFlagErrorKind::InvalidFlag
    );
    assert_eq!(
        ScannerState::validate_regex_flags("uv").unwrap_err().1,
        RegexFlagErrorKind::IncompatibleFlags
    );
}

#[test]
fn tracks_punctuation_including_multichar_operators() {
    let all = kinds("=> === !== **= >>>= ?. ??=");
    assert_eq!(
        all,
        vec![
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::ExclamationEqualsEqualsToken,
            SyntaxKind::AsteriskAsteriskEqualsToken,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::QuestionQuestionEqualsToken,
            SyntaxKind::EndOfFile,
        ]
    );
}

#[test]
fn tracks_preceding_newline_for_asi() {
    let mut scanner = ScannerState::new("a\nb");
    scanner.scan(true);
    assert!(!scanner.preceded_by_newline());
    scanner.scan(true);
    assert!(scanner.preceded_by_newline());
}

#[test]
fn skips_line_and_block_comments() {
    let mut scanner = ScannerState::new("a // comment\n/* block */ b");
    assert_eq!(scanner.scan(true), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value(), "a");
    assert_eq!(scanner.scan(true), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value(), "b");
}
