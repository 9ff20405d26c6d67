use super::*;
use revive_common::SourceKind;

fn analyze_source(source: &str) -> (revive_ast::NodeArena, revive_common::Interner, NodeId, AnalysisResult) {
    let (arena, mut interner, root) = revive_parser::parse(source, SourceKind::Script).expect("parse should succeed");
    let eval_atom = interner.intern("eval");
    let result = analyze(&arena, root, SourceKind::Script, eval_atom);
    (arena, interner, root, result)
}

#[test]
fn hoists_var_out_of_nested_block_to_program_scope() {
    let (_arena, mut interner, _root, result) = analyze_source("if (true) { var x = 1; } x;");
    let program_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Program).unwrap().0;
    let x = interner.intern("x");
    assert!(result.scopes.get(program_scope).bindings.contains_key(&x));
}

#[test]
fn let_is_block_scoped_not_hoisted_to_program() {
    let (_arena, mut interner, _root, result) = analyze_source("{ let y = 1; }");
    let program_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Program).unwrap().0;
    let y = interner.intern("y");
    assert!(!result.scopes.get(program_scope).bindings.contains_key(&y));
    let block_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Block).unwrap().0;
    assert!(result.scopes.get(block_scope).bindings.contains_key(&y));
}

#[test]
fn block_without_lexical_declarations_reuses_parent_scope() {
    let (_arena, _interner, _root, result) = analyze_source("{ x = 1; }");
    assert!(result.scopes.iter().all(|(_, s)| s.kind != ScopeKind::Block));
}

#[test]
fn function_declaration_params_bind_in_function_scope() {
    let (_arena, mut interner, _root, result) = analyze_source("function f(a) { return a; }");
    let fn_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Function).unwrap().0;
    let a = interner.intern("a");
    assert!(result.scopes.get(fn_scope).bindings.contains_key(&a));
}

#[test]
fn named_function_expression_binds_own_name_only_inside_itself() {
    let (_arena, mut interner, _root, result) = analyze_source("var g = function named() { return named; };");
    let fn_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Function).unwrap().0;
    let named = interner.intern("named");
    assert!(result.scopes.get(fn_scope).bindings.contains_key(&named));

    let program_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Program).unwrap().0;
    assert!(!result.scopes.get(program_scope).bindings.contains_key(&named));
}

#[test]
fn with_statement_sets_has_with_on_enclosing_scope_and_creates_with_scope() {
    let (_arena, _interner, _root, result) = analyze_source("with (obj) { x = 1; }");
    let program_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Program).unwrap().0;
    assert!(result.scopes.get(program_scope).has_with);
    assert!(result.scopes.iter().any(|(_, s)| s.kind == ScopeKind::With));
}

#[test]
fn direct_eval_call_is_flagged_on_containing_scope() {
    let (_arena, _interner, _root, result) = analyze_source("eval('1');");
    let program_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Program).unwrap().0;
    assert!(result.scopes.get(program_scope).has_direct_eval);
}

#[test]
fn try_catch_binds_param_in_its_own_scope() {
    let (_arena, mut interner, _root, result) = analyze_source("try { risky(); } catch (e) { log(e); }");
    let catch_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Catch).unwrap().0;
    let e = interner.intern("e");
    assert!(result.scopes.get(catch_scope).bindings.contains_key(&e));
}

#[test]
fn class_body_is_always_strict_even_in_sloppy_program() {
    let (_arena, _interner, _root, result) = analyze_source("class C { method() { return 1; } }");
    let class_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Class).unwrap().0;
    assert!(result.scopes.get(class_scope).strict.is_strict());
}

#[test]
fn use_strict_directive_makes_program_scope_strict() {
    let (_arena, _interner, _root, result) = analyze_source("\"use strict\";\nvar x = 1;");
    let program_scope = result.scopes.iter().find(|(_, s)| s.kind == ScopeKind::Program).unwrap().0;
    assert!(result.scopes.get(program_scope).strict.is_strict());
}

#[test]
fn free_identifier_reference_resolves_to_free() {
    let (arena, _interner, root, result) = analyze_source("undeclaredName;");
    let NodeKind::Program { body } = arena.kind(root) else { panic!("expected program") };
    let NodeKind::ExpressionStmt { expression } = arena.kind(body[0]) else { panic!("expected expr stmt") };
    let resolution = result.resolutions.get(*expression).expect("identifier should be resolved");
    assert!(matches!(resolution, Resolution::Free(_)));
}

#[test]
fn bound_identifier_reference_resolves_to_its_declaring_scope() {
    let (arena, _interner, root, result) = analyze_source("var x = 1; x;");
    let NodeKind::Program { body } = arena.kind(root) else { panic!("expected program") };
    let NodeKind::ExpressionStmt { expression } = arena.kind(body[1]) else { panic!("expected expr stmt") };
    let resolution = result.resolutions.get(*expression).expect("identifier should be resolved");
    assert!(matches!(resolution, Resolution::Bound { .. }));
}
