use super::*;
use revive_common::SourceKind;

fn analyze(source: &str) -> (revive_ast::NodeArena, revive_common::Interner, revive_scope::AnalysisResult) {
    let (arena, mut interner, root) = revive_parser::parse(source, SourceKind::Script).unwrap();
    let eval_atom = interner.intern("eval");
    let result = revive_scope::analyze(&arena, root, SourceKind::Script, eval_atom);
    (arena, interner, result)
}

#[test]
fn captured_variable_scope_escapes() {
    let (_arena, _interner, result) =
        analyze("function outer() { var x = 1; function inner() { return x; } return inner; }");
    let escaping = compute_escaping_scopes(&result.scopes, &result);
    let outer_scope = result
        .scopes
        .iter()
        .find(|(_, s)| s.kind == ScopeKind::Function)
        .unwrap()
        .0;
    assert!(escaping.contains(&outer_scope));
}

#[test]
fn scope_with_no_nested_closures_does_not_escape() {
    let (_arena, _interner, result) = analyze("function lonely(a) { return a + 1; }");
    let escaping = compute_escaping_scopes(&result.scopes, &result);
    assert!(escaping.is_empty());
}

#[test]
fn with_statement_forces_escape() {
    let (_arena, _interner, result) = analyze("with (obj) { x = 1; }");
    let escaping = compute_escaping_scopes(&result.scopes, &result);
    let program_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Program).unwrap().0;
    assert!(escaping.contains(&program_scope));
}

#[test]
fn sibling_block_scope_is_not_marked_escaping_by_unrelated_closure() {
    let (_arena, _interner, result) = analyze("{ var a = 1; } { function f() { return 1; } }");
    let escaping = compute_escaping_scopes(&result.scopes, &result);
    assert!(escaping.is_empty());
}
