use super::*;
use revive_ast::{FunctionFlavor, NodeKind};
use revive_common::SourceKind;

fn function_record<'a>(
    instrumented: &'a Instrumented,
    name: &str,
) -> (revive_ast::NodeId, &'a InfoRecord) {
    let (node_id, function) = instrumented
        .arena
        .iter()
        .find_map(|(id, n)| match &n.kind {
            NodeKind::Function(f) if f.name.is_some() => {
                let text = f.name.unwrap().as_str(&instrumented.interner);
                (text == name).then_some((id, (**f).clone()))
            }
            _ => None,
        })
        .unwrap_or_else(|| panic!("no function named `{name}`"));
    (node_id, instrumented.info_records.get(&function.id).unwrap())
}

#[test]
fn free_variable_is_recorded_as_captured() {
    let src = "function outer() { var x = 1; function inner() { return x; } return inner; }";
    let instrumented = instrument(src, SourceKind::Script).unwrap();
    let (_, record) = function_record(&instrumented, "inner");
    assert!(record.free_names.iter().any(|f| f.name.as_str(&instrumented.interner) == "x"));
}

#[test]
fn own_parameter_is_not_captured() {
    let src = "function f(a) { return a; }";
    let instrumented = instrument(src, SourceKind::Script).unwrap();
    let (_, record) = function_record(&instrumented, "f");
    assert!(record.free_names.is_empty());
}

#[test]
fn enclosing_scope_gets_runtime_identity_when_captured() {
    let src = "function outer() { var x = 1; function inner() { return x; } return inner; }";
    let instrumented = instrument(src, SourceKind::Script).unwrap();
    let outer_scope = instrumented
        .scopes
        .iter()
        .find(|(_, s)| {
            s.kind == revive_scope::ScopeKind::Function
                && matches!(
                    instrumented.arena.kind(s.declaration_site),
                    NodeKind::Function(f) if f.name.map(|n| n.as_str(&instrumented.interner) == "outer").unwrap_or(false)
                )
        })
        .unwrap()
        .0;
    assert!(instrumented.scope_bindings.contains_key(&outer_scope));
}

#[test]
fn non_escaping_scope_gets_no_runtime_identity() {
    let src = "function lonely(a) { return a + 1; }";
    let instrumented = instrument(src, SourceKind::Script).unwrap();
    assert!(instrumented.scope_bindings.is_empty());
}

#[test]
fn direct_eval_sets_wildcard_capture_and_flag() {
    let src = "function f() { eval('1'); }";
    let instrumented = instrument(src, SourceKind::Script).unwrap();
    let (_, record) = function_record(&instrumented, "f");
    assert!(record.uses_direct_eval);
    assert!(record.wildcard_capture);
}

#[test]
fn with_statement_sets_wildcard_capture() {
    let src = "function f() { with (obj) { x = 1; } }";
    let instrumented = instrument(src, SourceKind::Script).unwrap();
    let (_, record) = function_record(&instrumented, "f");
    assert!(record.wildcard_capture);
}

#[test]
fn arrow_capturing_this_marks_enclosing_function_escaping() {
    let src = "function outer() { return () => this.x; }";
    let instrumented = instrument(src, SourceKind::Script).unwrap();
    let outer_scope = instrumented
        .scopes
        .iter()
        .find(|(_, s)| {
            s.kind == revive_scope::ScopeKind::Function
                && matches!(
                    instrumented.arena.kind(s.declaration_site),
                    NodeKind::Function(f) if f.flavor == FunctionFlavor::Plain
                )
        })
        .unwrap()
        .0;
    assert!(instrumented.scope_bindings.contains_key(&outer_scope));
}

#[test]
fn every_function_gets_a_registration_with_an_info_record_name() {
    let src = "function a() { function b() { return 1; } return b; }";
    let instrumented = instrument(src, SourceKind::Script).unwrap();
    assert_eq!(instrumented.registrations.len(), 2);
    for registration in instrumented.registrations.values() {
        assert!(instrumented.interner.resolve(registration.info_record_name).starts_with(&instrumented.namespace_prefix));
    }
}

#[test]
fn scope_chain_is_outermost_first() {
    let src = "function a() { var x = 1; function b() { var y = 2; function c() { return x + y; } return c; } return b; }";
    let instrumented = instrument(src, SourceKind::Script).unwrap();
    let (c_id, _) = function_record(&instrumented, "c");
    let registration = instrumented.registrations.get(&c_id).unwrap();
    assert_eq!(registration.scope_ids.len(), 2);
}

#[test]
fn parse_error_is_surfaced_not_panicked() {
    let result = instrument("function (", SourceKind::Script);
    assert!(result.is_err());
}
