use super::*;
use crate::options::SerializeOptions;
use crate::printer::print;
use revive_common::SourceKind;
use revive_host::{Host, PropertyKey, TreeWalkHost};
use revive_tracker::EvalContext;
use std::rc::Rc;

fn graph_for(source: &str) -> ValueGraph {
    let host = TreeWalkHost::new();
    let value = host.evaluate(source, EvalContext::new(SourceKind::Script, None)).unwrap_or_else(|e| panic!("evaluate failed: {e}"));
    revive_graph::build_value_graph(host.as_ref(), vec![(Rc::from("root"), value)]).expect("build_value_graph")
}

#[test]
fn single_use_acyclic_node_has_refcount_one() {
    let graph = graph_for("({ a: 1 })");
    let info = analyze_usage(&graph);
    let root = graph.roots[0].node;
    assert_eq!(info.count(root), 1);
    assert!(!info.should_hoist(root, true), "a single-use node must not be hoisted when inlining is enabled");
}

#[test]
fn shared_sub_value_has_refcount_above_one() {
    let graph = graph_for("(function(){ var shared = { n: 1 }; return [shared, shared]; })()");
    let info = analyze_usage(&graph);
    let GraphNode::Array { elements, .. } = graph.get(graph.roots[0].node) else { panic!("expected array") };
    let shared = elements[0].unwrap();
    assert_eq!(info.count(shared), 2);
    assert!(info.should_hoist(shared, true));
}

#[test]
fn self_cycle_counts_as_more_than_one_reference() {
    let graph = graph_for("(function(){ var o = {}; o.self = o; return o; })()");
    let info = analyze_usage(&graph);
    let root = graph.roots[0].node;
    assert!(info.count(root) > 1, "a back-edge to the root must bump its refcount");
    assert!(info.should_hoist(root, true));
}

#[test]
fn inline_false_forces_every_node_to_hoist_regardless_of_refcount() {
    let graph = graph_for("({ a: 1 })");
    let info = analyze_usage(&graph);
    let root = graph.roots[0].node;
    assert_eq!(info.count(root), 1);
    assert!(info.should_hoist(root, false), "inline=false must hoist even single-use nodes");
}

#[test]
fn a_node_hoisted_for_its_refcount_still_round_trips_its_shared_identity() {
    let graph = graph_for("(function(){ var shared = { n: 1 }; return [shared, shared]; })()");
    let info = analyze_usage(&graph);
    let GraphNode::Array { elements, .. } = graph.get(graph.roots[0].node) else { panic!("expected array") };
    let shared = elements[0].unwrap();
    assert!(info.should_hoist(shared, true), "a doubly-referenced node must be hoisted, not inlined twice");

    let result = print(&graph, &SerializeOptions::default()).expect("print");
    let (_, expr) = &result.roots[0];
    let full_source = format!("(function() {{ {}\n return {expr};\n}})()", result.statements.join("\n"));
    let host = TreeWalkHost::new();
    let value = host
        .evaluate(&full_source, EvalContext::new(SourceKind::Script, None))
        .unwrap_or_else(|e| panic!("emitted output failed to evaluate: {e}\n---\n{full_source}"));
    let get = |v: &revive_host::HostValue, key: &str| {
        host.get_property_chain(v, &PropertyKey::String(Rc::from(key)), v).expect("property read")
    };
    let first = get(&value, "0");
    let second = get(&value, "1");
    let (Some(first_obj), Some(second_obj)) = (first.as_object(), second.as_object()) else {
        panic!("expected both array slots to hold objects");
    };
    assert!(Rc::ptr_eq(first_obj, second_obj), "hoisting a shared node to one local must not duplicate it on re-evaluation");
}
