//! Reference-counting pre-pass.
//!
//! A DFS with an explicit on-stack set counts every edge traversal,
//! including edges back to a node currently on the stack. A back-edge is
//! exactly a cycle participation, and counting it as a reference bumps that
//! node's count above one, so "referenced more than once" and
//! "participates in a cycle" collapse into the single `refcount > 1` test —
//! no separate cycle-membership set is needed.

use revive_graph::{GraphNode, GraphNodeId, ValueGraph};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Default)]
pub struct UsageInfo {
    refcount: FxHashMap<GraphNodeId, u32>,
}

impl UsageInfo {
    pub fn count(&self, id: GraphNodeId) -> u32 {
        self.refcount.get(&id).copied().unwrap_or(0)
    }

    pub fn should_hoist(&self, id: GraphNodeId, inline: bool) -> bool {
        if !inline {
            return true;
        }
        self.count(id) > 1
    }
}

pub fn analyze_usage(graph: &ValueGraph) -> UsageInfo {
    let mut info = UsageInfo::default();
    let mut on_stack = FxHashSet::default();
    for root in &graph.roots {
        visit(graph, root.node, &mut info, &mut on_stack);
    }
    info
}

fn bump(info: &mut UsageInfo, id: GraphNodeId) -> u32 {
    let entry = info.refcount.entry(id).or_insert(0);
    *entry += 1;
    *entry
}

fn visit(graph: &ValueGraph, id: GraphNodeId, info: &mut UsageInfo, on_stack: &mut FxHashSet<GraphNodeId>) {
    let count = bump(info, id);
    if on_stack.contains(&id) {
        // Back edge: already counted above, never recurse into it again.
        return;
    }
    if count > 1 {
        // Already fully visited in an earlier traversal; its own children
        // were already counted then.
        return;
    }
    on_stack.insert(id);
    for child in edges_of(graph.get(id)) {
        visit(graph, child, info, on_stack);
    }
    on_stack.remove(&id);
}

/// Every `GraphNodeId` one node directly references, mirroring
/// `revive_ast::visit::children`'s role for the AST.
fn edges_of(node: &GraphNode) -> Vec<GraphNodeId> {
    let mut out = Vec::new();
    let mut shape_edges = |shape: &revive_graph::ObjectShape, out: &mut Vec<GraphNodeId>| {
        if let Some(p) = shape.prototype {
            out.push(p);
        }
        for (key, descriptor) in &shape.properties {
            if let revive_graph::PropertyKeyNode::Symbol(s) = key {
                out.push(*s);
            }
            match descriptor {
                revive_graph::PropertyDescriptorNode::Data { value, .. } => out.push(*value),
                revive_graph::PropertyDescriptorNode::Accessor { get, set, .. } => {
                    if let Some(g) = get {
                        out.push(*g);
                    }
                    if let Some(s) = set {
                        out.push(*s);
                    }
                }
            }
        }
    };
    match node {
        GraphNode::Undefined
        | GraphNode::Null
        | GraphNode::Boolean(_)
        | GraphNode::Number(_)
        | GraphNode::NegativeZero
        | GraphNode::String(_)
        | GraphNode::BigInt(_)
        | GraphNode::Symbol { .. }
        | GraphNode::Native { .. }
        | GraphNode::GlobalRef(_)
        | GraphNode::ModuleRef { .. } => {}
        GraphNode::PlainObject(shape) => shape_edges(shape, &mut out),
        GraphNode::Array { elements, shape } => {
            for e in elements.iter().flatten() {
                out.push(*e);
            }
            shape_edges(shape, &mut out);
        }
        GraphNode::Closure(c) => {
            out.extend(c.frames.iter().copied());
            shape_edges(&c.shape, &mut out);
        }
        GraphNode::Class(c) => {
            out.push(c.constructor);
            if let Some(s) = c.super_class {
                out.push(s);
            }
            shape_edges(&c.shape, &mut out);
        }
        GraphNode::Bound(b) => {
            out.push(b.target);
            out.push(b.bound_this);
            out.extend(b.bound_args.iter().copied());
            shape_edges(&b.shape, &mut out);
        }
        GraphNode::Collection { entries, shape, .. } => {
            for (k, v) in entries {
                out.push(*k);
                if let Some(v) = v {
                    out.push(*v);
                }
            }
            shape_edges(shape, &mut out);
        }
        GraphNode::Buffer { .. } => {}
        GraphNode::BufferView { buffer, shape, .. } => {
            out.push(*buffer);
            shape_edges(shape, &mut out);
        }
        GraphNode::Error(shape) => shape_edges(shape, &mut out),
        GraphNode::Regex { shape, .. } => shape_edges(shape, &mut out),
        GraphNode::Boxed { value, shape } => {
            out.push(*value);
            shape_edges(shape, &mut out);
        }
        GraphNode::Frame(f) => {
            if let Some(p) = f.parent {
                out.push(p);
            }
            for b in &f.bindings {
                out.push(b.value);
            }
            if let Some(t) = f.this_value {
                out.push(t);
            }
            if let Some(a) = f.arguments_object {
                out.push(a);
            }
            if let Some(n) = f.new_target {
                out.push(n);
            }
            if let Some(w) = f.with_object {
                out.push(w);
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/usage.rs"]
mod tests;
