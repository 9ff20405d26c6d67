use super::*;
use revive_common::SourceKind;
use revive_host::{Host, TreeWalkHost};
use revive_tracker::EvalContext;
use std::rc::Rc;

fn eval(source: &str) -> (Rc<TreeWalkHost>, revive_host::HostValue) {
    let host = TreeWalkHost::new();
    let value = host
        .evaluate(source, EvalContext::new(SourceKind::Script, None))
        .unwrap_or_else(|e| panic!("evaluate failed: {e}"));
    (host, value)
}

fn graph_for(source: &str) -> ValueGraph {
    let (host, value) = eval(source);
    build_value_graph(host.as_ref(), vec![(Rc::from("root"), value)]).expect("build_value_graph")
}

#[test]
fn plain_object_preserves_property_order() {
    let graph = graph_for("({ a: 1, b: 2, c: 3 })");
    let root = graph.roots[0].node;
    let GraphNode::PlainObject(shape) = graph.get(root) else { panic!("expected plain object") };
    let names: Vec<&str> = shape
        .properties
        .iter()
        .map(|(k, _)| match k {
            PropertyKeyNode::String(s) => s.as_ref(),
            PropertyKeyNode::Symbol(_) => "<symbol>",
        })
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn self_referential_object_round_trips_through_one_node() {
    let graph = graph_for("(function(){ var o = {}; o.self = o; return o; })()");
    let root = graph.roots[0].node;
    let GraphNode::PlainObject(shape) = graph.get(root) else { panic!("expected plain object") };
    let (_, descriptor) = shape.properties.iter().find(|(k, _)| matches!(k, PropertyKeyNode::String(s) if &**s == "self")).unwrap();
    let PropertyDescriptorNode::Data { value, .. } = descriptor else { panic!("expected data property") };
    assert_eq!(*value, root, "o.self must point back at the same node, not a copy");
}

#[test]
fn shared_sub_value_is_deduplicated() {
    let graph = graph_for("(function(){ var shared = { n: 1 }; return [shared, shared]; })()");
    let root = graph.roots[0].node;
    let GraphNode::Array { elements, .. } = graph.get(root) else { panic!("expected array") };
    assert_eq!(elements[0], elements[1], "both array slots must reference the same node id");
}

#[test]
fn array_holes_are_preserved() {
    let graph = graph_for("(function(){ var a = [1]; a[2] = 3; return a; })()");
    let root = graph.roots[0].node;
    let GraphNode::Array { elements, .. } = graph.get(root) else { panic!("expected array") };
    assert_eq!(elements.len(), 3);
    assert!(elements[0].is_some());
    assert!(elements[1].is_none(), "index 1 was never written and must be a hole");
    assert!(elements[2].is_some());
}

#[test]
fn negative_zero_is_distinguished_from_positive_zero() {
    let graph = graph_for("[0, -0]");
    let root = graph.roots[0].node;
    let GraphNode::Array { elements, .. } = graph.get(root) else { panic!("expected array") };
    let zero = elements[0].unwrap();
    let neg_zero = elements[1].unwrap();
    assert_ne!(zero, neg_zero);
    assert!(matches!(graph.get(zero), GraphNode::Number(n) if *n == 0.0));
    assert!(matches!(graph.get(neg_zero), GraphNode::NegativeZero));
}

#[test]
fn identical_strings_share_one_node() {
    let graph = graph_for("(function(){ var a = 'x' + 'y'; var b = 'xy'; return [a, b]; })()");
    let root = graph.roots[0].node;
    let GraphNode::Array { elements, .. } = graph.get(root) else { panic!("expected array") };
    assert_eq!(elements[0], elements[1]);
}

#[test]
fn closure_captures_enclosing_binding_as_a_frame() {
    let graph = graph_for("(function(){ var x = 42; function inner() { return x; } return inner; })()");
    let root = graph.roots[0].node;
    let GraphNode::Closure(closure) = graph.get(root) else { panic!("expected closure") };
    assert!(!closure.missing_capture);
    assert_eq!(closure.frames.len(), 1);
    let GraphNode::Frame(frame) = graph.get(closure.frames[0]) else { panic!("expected frame") };
    assert!(frame.bindings.iter().any(|b| &*b.name == "x"));
}

#[test]
fn sibling_closures_share_the_same_frame_node() {
    let src = "(function(){ \
        var x = 1; \
        function a() { return x; } \
        function b() { return x; } \
        return [a, b]; \
    })()";
    let graph = graph_for(src);
    let root = graph.roots[0].node;
    let GraphNode::Array { elements, .. } = graph.get(root) else { panic!("expected array") };
    let GraphNode::Closure(a) = graph.get(elements[0].unwrap()) else { panic!("expected closure") };
    let GraphNode::Closure(b) = graph.get(elements[1].unwrap()) else { panic!("expected closure") };
    assert_eq!(a.frames[0], b.frames[0], "both closures must resolve to one shared frame node");
}

#[test]
fn typed_buffer_view_records_element_kind_and_bytes() {
    let host = TreeWalkHost::new();
    let buffer = revive_host::HostValue::object(
        revive_host::ObjectKind::Buffer(revive_host::BufferData {
            bytes: Rc::new(std::cell::RefCell::new(vec![100u8, 0, 200])),
            shared: false,
        }),
        None,
    );
    let view = revive_host::HostValue::object(
        revive_host::ObjectKind::BufferView(revive_host::BufferViewData {
            buffer: buffer.clone(),
            element_kind: revive_host::TypedElementKind::U8,
            byte_offset: 0,
            length: 3,
        }),
        None,
    );
    let graph = build_value_graph(host.as_ref(), vec![(Rc::from("root"), view)]).unwrap();
    let root = graph.roots[0].node;
    let GraphNode::BufferView { buffer, element_kind, length, .. } = graph.get(root) else {
        panic!("expected buffer view")
    };
    assert_eq!(*length, 3);
    assert_eq!(*element_kind, revive_host::TypedElementKind::U8);
    let GraphNode::Buffer { bytes, .. } = graph.get(*buffer) else { panic!("expected buffer") };
    assert_eq!(&**bytes, &[100u8, 0, 200][..]);
}

#[test]
fn frozen_object_records_extensibility_state() {
    let graph = graph_for("Object.freeze({ a: 1 })");
    let root = graph.roots[0].node;
    let GraphNode::PlainObject(shape) = graph.get(root) else { panic!("expected plain object") };
    assert_eq!(shape.extensibility, revive_host::ExtensibilityState::Frozen);
}

#[test]
fn collection_entries_are_enumerated_in_insertion_order() {
    let graph = graph_for("(function(){ var m = new Map(); m.set('a', 1); m.set('b', 2); return m; })()");
    let root = graph.roots[0].node;
    let GraphNode::Collection { kind, entries, .. } = graph.get(root) else { panic!("expected collection") };
    assert_eq!(*kind, revive_host::CollectionKind::Map);
    assert_eq!(entries.len(), 2);
}
