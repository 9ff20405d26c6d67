use super::*;
use revive_common::SourceKind;
use revive_tracker::EvalContext;

fn run(source: &str) -> (std::rc::Rc<TreeWalkHost>, HostValue) {
    let host = TreeWalkHost::new();
    let value = Host::evaluate(&*host, source, EvalContext::new(SourceKind::Script, None)).unwrap();
    (host, value)
}

fn get(host: &TreeWalkHost, value: &HostValue, key: &str) -> HostValue {
    host.get_property_chain(value, &PropertyKey::String(std::rc::Rc::from(key)), value).unwrap()
}

#[test]
fn object_literal_round_trip_via_get_property() {
    let (host, value) = run("({ a: 1, b: 2 })");
    assert!(matches!(get(&host, &value, "a"), HostValue::Number(n) if n == 1.0));
    assert!(matches!(get(&host, &value, "b"), HostValue::Number(n) if n == 2.0));
}

#[test]
fn own_keys_preserve_insertion_order() {
    let (host, value) = run("({ c: 1, a: 2, b: 3 })");
    let keys: Vec<String> = Host::own_keys(&*host, &value)
        .into_iter()
        .map(|k| match k {
            PropertyKey::String(s) => s.to_string(),
            PropertyKey::Symbol(_) => "<symbol>".into(),
        })
        .collect();
    assert_eq!(keys, vec!["c", "a", "b"]);
}

#[test]
fn closures_sharing_a_scope_frame_observe_each_others_mutation() {
    let source = r"
        function makePair() {
            var count = 0;
            return [function () { count += 1; return count; }, function () { return count; }];
        }
        makePair();
    ";
    let (host, pair) = run(source);
    let ObjectKind::Array(items) = &pair.as_object().unwrap().borrow().kind else { panic!("expected array") };
    let increment = items[0].clone().unwrap();
    let read = items[1].clone().unwrap();
    host.call(&increment, HostValue::Undefined, vec![]).unwrap();
    host.call(&increment, HostValue::Undefined, vec![]).unwrap();
    let seen = host.call(&read, HostValue::Undefined, vec![]).unwrap();
    assert!(matches!(seen, HostValue::Number(n) if n == 2.0));
}

#[test]
fn closure_capture_descriptor_lists_the_free_variable() {
    let source = r"
        function outer() {
            var x = 41;
            return function inner() { return x + 1; };
        }
        outer();
    ";
    let (_host, closure) = run(source);
    let obj = closure.as_object().unwrap();
    let ObjectKind::Function(data) = &obj.borrow().kind else { panic!("expected function") };
    assert!(data.capture.is_some(), "instrumented closure should have a capture descriptor");
    assert!(data.resolved_free_names.iter().any(|(name, _)| name.as_ref() == "x"));
}

#[test]
fn frame_bindings_resolves_captured_variable_by_frame_id() {
    let source = r"
        function outer() {
            var x = 7;
            return function inner() { return x; };
        }
        outer();
    ";
    let (host, closure) = run(source);
    let obj = closure.as_object().unwrap();
    let frame_id = {
        let b = obj.borrow();
        let ObjectKind::Function(data) = &b.kind else { panic!("expected function") };
        *data.capture.as_ref().unwrap().scope_ids.last().unwrap()
    };
    let frame = host.frame_bindings(frame_id).expect("frame should still be alive via the closure");
    let binding = frame.bindings.iter().find(|b| b.name.as_ref() == "x").expect("x should be bound in this frame");
    assert!(matches!(binding.value, HostValue::Number(n) if n == 7.0));
    assert!(binding.mutable, "var bindings are mutable");
}

#[test]
fn with_statement_resolves_free_name_from_bound_object() {
    let source = r"
        function makeGetter(obj) {
            var fn;
            with (obj) { fn = function () { return value; }; }
            return fn;
        }
        makeGetter({ value: 99 });
    ";
    let (host, closure) = run(source);
    let result = host.call(&closure, HostValue::Undefined, vec![]).unwrap();
    assert!(matches!(result, HostValue::Number(n) if n == 99.0));
}

#[test]
fn class_super_chain_runs_base_then_derived_constructor() {
    let source = r"
        class Base { constructor() { this.x = 1; } }
        class Derived extends Base { constructor() { super(); this.y = 2; } }
        new Derived();
    ";
    let (host, instance) = run(source);
    assert!(matches!(get(&host, &instance, "x"), HostValue::Number(n) if n == 1.0));
    assert!(matches!(get(&host, &instance, "y"), HostValue::Number(n) if n == 2.0));
}

#[test]
fn typed_array_round_trips_through_buffer() {
    let (host, view) = run("new Uint8Array([100, 0, 200])");
    let obj = view.as_object().unwrap();
    let b = obj.borrow();
    let ObjectKind::BufferView(v) = &b.kind else { panic!("expected buffer view") };
    assert_eq!(v.length, 3);
    let ObjectKind::Buffer(buf) = &v.buffer.as_object().unwrap().borrow().kind else { panic!("expected buffer") };
    assert_eq!(buf.bytes.borrow().as_slice(), &[100, 0, 200]);
    let _ = host;
}

#[test]
fn global_roots_exposes_builtin_constructors() {
    let host = TreeWalkHost::new();
    let names: Vec<String> = Host::global_roots(&*host).into_iter().map(|(n, _)| n.to_string()).collect();
    for expected in ["Object", "Array", "Map", "Set", "Symbol", "Error"] {
        assert!(names.iter().any(|n| n == expected), "missing global `{expected}`");
    }
}

#[test]
fn frozen_object_rejects_new_own_properties() {
    let source = r"
        var o = { a: 1 };
        Object.freeze(o);
        o.b = 2;
        o;
    ";
    let (host, value) = run(source);
    assert_eq!(Host::extensibility(&*host, &value), ExtensibilityState::Frozen);
    assert!(matches!(get(&host, &value, "b"), HostValue::Undefined));
}
