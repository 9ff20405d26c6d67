use super::*;
use rustc_hash::FxHashMap;

#[test]
fn substitutes_a_free_identifier_in_a_function_expression() {
    let mut subs = FxHashMap::default();
    subs.insert("x".to_string(), "frame0.x".to_string());
    let rewritten = rewrite_closure_source("function() { return x + 1; }", &subs, false, None, None, None);
    assert_eq!(rewritten, "function() { return frame0.x + 1; }");
}

#[test]
fn leaves_bound_identifiers_alone() {
    let mut subs = FxHashMap::default();
    subs.insert("x".to_string(), "frame0.x".to_string());
    let rewritten = rewrite_closure_source("function(x) { return x + 1; }", &subs, false, None, None, None);
    assert_eq!(rewritten, "function(x) { return x + 1; }", "the parameter `x` shadows the free `x` and must not be substituted");
}

#[test]
fn arrow_this_is_replaced_when_requested() {
    let rewritten = rewrite_closure_source("() => this.value", &FxHashMap::default(), true, Some("frame0.this_value"), None, None);
    assert_eq!(rewritten, "() => frame0.this_value.value");
}

#[test]
fn non_arrow_this_is_never_touched() {
    let rewritten =
        rewrite_closure_source("function() { return this.value; }", &FxHashMap::default(), false, Some("frame0.this_value"), None, None);
    assert_eq!(rewritten, "function() { return this.value; }", "a regular function's `this` is dynamic, not captured");
}

#[test]
fn arrow_arguments_is_replaced_when_requested() {
    let rewritten = rewrite_closure_source("() => arguments[0]", &FxHashMap::default(), true, None, Some("frame0.arguments_value"), None);
    assert_eq!(rewritten, "() => frame0.arguments_value[0]");
}

#[test]
fn unparseable_source_falls_back_to_verbatim() {
    let rewritten = rewrite_closure_source("function( { return; }", &FxHashMap::default(), false, None, None, None);
    assert_eq!(rewritten, "function( { return; }");
}

#[test]
fn empty_substitutions_and_no_arrow_replacements_is_a_no_op_without_reparsing() {
    // No substitution and not an arrow: the fast path should return the
    // input unchanged rather than attempting (and potentially failing) a
    // reparse of source that may not even be valid standalone syntax on
    // its own, such as a method literal.
    let rewritten = rewrite_closure_source("method() { return 1; }", &FxHashMap::default(), false, None, None, None);
    assert_eq!(rewritten, "method() { return 1; }");
}
