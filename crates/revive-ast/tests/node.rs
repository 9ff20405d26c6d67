use super::*;
use revive_common::Span;

#[test]
fn alloc_assigns_sequential_ids() {
    let mut arena = NodeArena::new();
    let a = arena.alloc(NodeKind::Empty, Span::new(0, 0));
    let b = arena.alloc(NodeKind::Empty, Span::new(1, 1));
    assert_eq!(a, NodeId(0));
    assert_eq!(b, NodeId(1));
    assert_eq!(arena.len(), 2);
}

#[test]
fn synthetic_nodes_carry_no_span() {
    let mut arena = NodeArena::new();
    let id = arena.alloc_synthetic(NodeKind::Empty);
    assert!(arena.get(id).span.is_synthetic());
}

#[test]
fn attach_synthesized_appends_to_the_target_node() {
    let mut arena = NodeArena::new();
    let target = arena.alloc(NodeKind::Block { body: Default::default() }, Span::new(0, 10));
    let inserted = arena.alloc_synthetic(NodeKind::Empty);
    arena.attach_synthesized(target, inserted);
    assert_eq!(arena.get(target).synthesized.as_slice(), &[inserted]);
}
