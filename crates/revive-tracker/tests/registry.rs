use super::*;
use revive_ast::FunctionId;
use revive_common::{SourceKind, Strictness};
use revive_instrument::InfoRecord;
use std::sync::Arc;

fn info(id: u32) -> Arc<InfoRecord> {
    Arc::new(InfoRecord::new(FunctionId(id), Strictness::Sloppy))
}

#[test]
fn register_scope_returns_distinct_ids() {
    let tracker = Tracker::new();
    let a = tracker.register_scope(None);
    let b = tracker.register_scope(None);
    assert_ne!(a, b);
}

#[test]
fn register_function_is_queryable_by_key() {
    let tracker = Tracker::new();
    let key = HostFunctionKey(1);
    tracker.register_function(key, FunctionId(0), vec![], info(0));
    let descriptor = tracker.lookup(key).unwrap();
    assert_eq!(descriptor.function, FunctionId(0));
}

#[test]
fn unregistered_key_returns_none() {
    let tracker = Tracker::new();
    assert!(tracker.lookup(HostFunctionKey(999)).is_none());
}

#[test]
fn reregistering_identical_descriptor_is_idempotent() {
    let tracker = Tracker::new();
    let key = HostFunctionKey(2);
    let frame = tracker.register_scope(None);
    let first = tracker.register_function(key, FunctionId(1), vec![frame], info(1));
    let second = tracker.register_function(key, FunctionId(1), vec![frame], info(1));
    assert_eq!(first.function, second.function);
    assert_eq!(first.scope_ids, second.scope_ids);
}

#[test]
fn reregistering_with_different_scope_ids_updates_the_descriptor() {
    let tracker = Tracker::new();
    let key = HostFunctionKey(3);
    let frame_a = tracker.register_scope(None);
    let frame_b = tracker.register_scope(None);
    tracker.register_function(key, FunctionId(2), vec![frame_a], info(2));
    let updated = tracker.register_function(key, FunctionId(2), vec![frame_a, frame_b], info(2));
    assert_eq!(updated.scope_ids, vec![frame_a, frame_b]);
}

#[test]
fn binding_writes_accumulate_per_frame() {
    let tracker = Tracker::new();
    let frame = tracker.register_scope(None);
    let mut interner = revive_common::Interner::new();
    let x = interner.intern("x");
    tracker.register_binding_write(frame, x);
    assert_eq!(tracker.observed_writes(frame), vec![x]);
}

#[test]
fn instrumented_eval_runs_evaluator_with_instrumented_result() {
    let tracker = Tracker::new();
    let ctx = EvalContext::new(SourceKind::Script, None);
    let saw_function = tracker
        .instrumented_eval("function f() { return 1; }", ctx, |instrumented| {
            instrumented.registrations.len()
        })
        .unwrap();
    assert_eq!(saw_function, 1);
}

#[test]
fn instrumented_eval_surfaces_parse_errors() {
    let tracker = Tracker::new();
    let ctx = EvalContext::new(SourceKind::Script, None);
    let result = tracker.instrumented_eval("function (", ctx, |_| ());
    assert!(result.is_err());
}

#[test]
fn global_tracker_is_the_same_instance_across_calls() {
    let a = global() as *const Tracker;
    let b = global() as *const Tracker;
    assert_eq!(a, b);
}
