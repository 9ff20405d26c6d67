use super::*;
use crate::node::NodeId;

#[test]
fn binary_expression_yields_both_operands() {
    let left = NodeId(0);
    let right = NodeId(1);
    let kind = NodeKind::Binary { operator: revive_common::Atom::default(), left, right };
    let kids = children(&kind);
    assert_eq!(kids.as_slice(), &[left, right]);
}

#[test]
fn leaf_nodes_have_no_children() {
    assert!(children(&NodeKind::ThisExpr).is_empty());
    assert!(children(&NodeKind::Empty).is_empty());
}

#[test]
fn with_statement_yields_object_then_body() {
    let object = NodeId(3);
    let body = NodeId(4);
    let kids = children(&NodeKind::With { object, body });
    assert_eq!(kids.as_slice(), &[object, body]);
}
