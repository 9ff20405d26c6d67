use super::*;
use revive_ast::{FunctionFlavor, Literal, NodeKind, VarKind};
use revive_common::SourceKind;

fn program_body(source: &str) -> (NodeArena, Interner, Vec<NodeId>) {
    let (arena, interner, root) = parse(source, SourceKind::Script).expect("parse should succeed");
    let body = match arena.kind(root) {
        NodeKind::Program { body } => body.to_vec(),
        _ => panic!("expected Program"),
    };
    (arena, interner, body)
}

#[test]
fn parses_var_declaration_with_initializer() {
    let (arena, interner, body) = program_body("var x = 1 + 2;");
    assert_eq!(body.len(), 1);
    match arena.kind(body[0]) {
        NodeKind::VarDecl { kind: VarKind::Var, declarators } => {
            assert_eq!(declarators.len(), 1);
            let (target, init) = &declarators[0];
            match target {
                revive_ast::BindingTarget::Identifier(atom) => assert_eq!(atom.as_str(&interner), "x"),
                _ => panic!("expected identifier target"),
            }
            assert!(init.is_some());
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn parses_function_declaration_with_params_and_body() {
    let (arena, _interner, body) = program_body("function add(a, b) { return a + b; }");
    assert_eq!(body.len(), 1);
    match arena.kind(body[0]) {
        NodeKind::Function(f) => {
            assert_eq!(f.flavor, FunctionFlavor::Plain);
            assert_eq!(f.params.len(), 2);
            match arena.kind(f.body) {
                NodeKind::Block { body } => assert_eq!(body.len(), 1),
                other => panic!("unexpected body: {other:?}"),
            }
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn parses_arrow_function_single_identifier_param() {
    let (arena, _interner, body) = program_body("var f = x => x * 2;");
    match arena.kind(body[0]) {
        NodeKind::VarDecl { declarators, .. } => {
            let (_, init) = &declarators[0];
            match arena.kind(init.unwrap()) {
                NodeKind::Function(f) => {
                    assert_eq!(f.flavor, FunctionFlavor::Arrow);
                    assert!(f.is_concise_arrow_body);
                    assert_eq!(f.params.len(), 1);
                }
                other => panic!("unexpected init: {other:?}"),
            }
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn parses_parenthesized_arrow_with_destructured_param_and_default() {
    let (arena, _interner, body) = program_body("var f = ({ a, b = 2 }, ...rest) => a;");
    match arena.kind(body[0]) {
        NodeKind::VarDecl { declarators, .. } => {
            let (_, init) = &declarators[0];
            match arena.kind(init.unwrap()) {
                NodeKind::Function(f) => {
                    assert_eq!(f.params.len(), 2);
                    assert!(f.has_non_simple_parameters);
                    assert!(matches!(arena.kind(f.params[0]), NodeKind::ObjectPattern { .. }));
                    assert!(matches!(arena.kind(f.params[1]), NodeKind::RestElement { .. }));
                }
                other => panic!("unexpected init: {other:?}"),
            }
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn distinguishes_parenthesized_expression_from_arrow_params() {
    let (arena, _interner, body) = program_body("var x = (a, b);");
    match arena.kind(body[0]) {
        NodeKind::VarDecl { declarators, .. } => {
            let (_, init) = &declarators[0];
            assert!(matches!(arena.kind(init.unwrap()), NodeKind::Sequence { .. }));
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn parses_class_with_method_and_field() {
    let (arena, _interner, body) = program_body(
        "class Point extends Base { x = 0; constructor(x) { super(); this.x = x; } get total() { return this.x; } }",
    );
    match arena.kind(body[0]) {
        NodeKind::Class(c) => {
            assert!(c.super_class.is_some());
            assert_eq!(c.members.len(), 3);
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn parses_template_literal_with_substitution() {
    let (arena, interner, body) = program_body("var s = `a${1 + 1}b`;");
    match arena.kind(body[0]) {
        NodeKind::VarDecl { declarators, .. } => {
            let (_, init) = &declarators[0];
            match arena.kind(init.unwrap()) {
                NodeKind::TemplateLiteral { quasis, expressions } => {
                    assert_eq!(quasis.len(), 2);
                    assert_eq!(quasis[0].as_str(&interner), "a");
                    assert_eq!(quasis[1].as_str(&interner), "b");
                    assert_eq!(expressions.len(), 1);
                }
                other => panic!("unexpected init: {other:?}"),
            }
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn disambiguates_division_from_regex_literal() {
    let (arena, _interner, body) = program_body("var a = b / c / d;");
    match arena.kind(body[0]) {
        NodeKind::VarDecl { declarators, .. } => {
            let (_, init) = &declarators[0];
            assert!(matches!(arena.kind(init.unwrap()), NodeKind::Binary { .. }));
        }
        other => panic!("unexpected node: {other:?}"),
    }

    let (arena, _interner, body) = program_body("var re = /ab+c/gi;");
    match arena.kind(body[0]) {
        NodeKind::VarDecl { declarators, .. } => {
            let (_, init) = &declarators[0];
            assert!(matches!(arena.kind(init.unwrap()), NodeKind::Literal(Literal::Regex { .. })));
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn parses_for_of_and_try_catch() {
    let (arena, _interner, body) = program_body(
        "for (const item of items) { try { use(item); } catch (e) { log(e); } finally { cleanup(); } }",
    );
    assert!(matches!(arena.kind(body[0]), NodeKind::ForOf { .. }));
}

#[test]
fn parses_use_strict_directive() {
    let (arena, _interner, body) = program_body("\"use strict\";\nvar x = 1;");
    match arena.kind(body[0]) {
        NodeKind::Directive { is_use_strict, .. } => assert!(*is_use_strict),
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn parses_with_statement_preserved() {
    let (arena, _interner, body) = program_body("with (obj) { x = 1; }");
    assert!(matches!(arena.kind(body[0]), NodeKind::With { .. }));
}

#[test]
fn parses_optional_chaining_and_nullish_coalescing() {
    let (arena, _interner, body) = program_body("var v = a?.b?.[c] ?? d;");
    match arena.kind(body[0]) {
        NodeKind::VarDecl { declarators, .. } => {
            let (_, init) = &declarators[0];
            assert!(matches!(arena.kind(init.unwrap()), NodeKind::Logical { .. }));
        }
        other => panic!("unexpected node: {other:?}"),
    }
}
