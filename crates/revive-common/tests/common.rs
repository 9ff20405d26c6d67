use super::*;

#[test]
fn strictest_prefers_strict() {
    assert!(Strictness::Sloppy.strictest(Strictness::Strict).is_strict());
    assert!(!Strictness::Sloppy.strictest(Strictness::Sloppy).is_strict());
}

#[test]
fn default_source_kind_is_script() {
    assert_eq!(SourceKind::default(), SourceKind::Script);
}
