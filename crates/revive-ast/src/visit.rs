//! Generic child enumeration over `NodeKind`, used by the scope analyzer and
//! the instrumenter so neither has to hand-write a traversal per node shape.

use crate::kind::{NodeKind, PropertyKind};
use crate::node::{BindingTarget, NodeId};
use smallvec::SmallVec;

/// Every `NodeId` a node directly references, in source order. Synthesized
/// children (attached via `Node::synthesized`) are not included here — they
/// are an emission concern, not a structural one.
pub fn children(kind: &NodeKind) -> SmallVec<[NodeId; 8]> {
    let mut out = SmallVec::new();
    match kind {
        NodeKind::Program { body } => out.extend(body.iter().copied()),
        NodeKind::Literal(_)
        | NodeKind::Identifier(_)
        | NodeKind::ThisExpr
        | NodeKind::SuperExpr
        | NodeKind::MetaProperty { .. }
        | NodeKind::Empty
        | NodeKind::Debugger
        | NodeKind::Directive { .. }
        | NodeKind::ScopeRegistration { .. }
        | NodeKind::Break { .. }
        | NodeKind::Continue { .. } => {}
        NodeKind::ArrayExpr { elements, .. } => out.extend(elements.iter().copied()),
        NodeKind::ObjectExpr { properties } => {
            for p in properties {
                out.push(p.key);
                out.push(p.value);
            }
        }
        NodeKind::TemplateLiteral { expressions, .. } => out.extend(expressions.iter().copied()),
        NodeKind::TaggedTemplate { tag, quasi } => {
            out.push(*tag);
            out.push(*quasi);
        }
        NodeKind::Function(f) => {
            out.extend(f.params.iter().copied());
            out.push(f.body);
        }
        NodeKind::Class(c) => {
            if let Some(sup) = c.super_class {
                out.push(sup);
            }
            for m in &c.members {
                out.push(m.key);
                if let Some(v) = m.value {
                    out.push(v);
                }
            }
        }
        NodeKind::Unary { argument, .. } => out.push(*argument),
        NodeKind::Binary { left, right, .. } | NodeKind::Logical { left, right, .. } => {
            out.push(*left);
            out.push(*right);
        }
        NodeKind::Assignment { target, value, .. } => {
            out.push(*target);
            out.push(*value);
        }
        NodeKind::Conditional { test, consequent, alternate } => {
            out.push(*test);
            out.push(*consequent);
            out.push(*alternate);
        }
        NodeKind::Call { callee, arguments, .. } => {
            out.push(*callee);
            out.extend(arguments.iter().copied());
        }
        NodeKind::New { callee, arguments } => {
            out.push(*callee);
            out.extend(arguments.iter().copied());
        }
        NodeKind::Member { object, property, computed, .. } => {
            out.push(*object);
            if *computed {
                out.push(*property);
            }
        }
        NodeKind::SuperMember { property, computed } => {
            if *computed {
                out.push(*property);
            }
        }
        NodeKind::SuperCall { arguments } => out.extend(arguments.iter().copied()),
        NodeKind::Sequence { expressions } => out.extend(expressions.iter().copied()),
        NodeKind::Spread { argument } | NodeKind::RestElement { argument } => out.push(*argument),
        NodeKind::Yield { argument, .. } => {
            if let Some(a) = argument {
                out.push(*a);
            }
        }
        NodeKind::Await { argument } => out.push(*argument),
        NodeKind::ArrayPattern { elements } => out.extend(elements.iter().copied()),
        NodeKind::ObjectPattern { properties, rest } => {
            for p in properties {
                if p.kind != PropertyKind::Spread {
                    out.push(p.key);
                }
                out.push(p.value);
            }
            if let Some(r) = rest {
                out.push(*r);
            }
        }
        NodeKind::AssignmentPattern { target, default } => {
            out.push(*target);
            out.push(*default);
        }
        NodeKind::Block { body } => out.extend(body.iter().copied()),
        NodeKind::ExpressionStmt { expression } => out.push(*expression),
        NodeKind::VarDecl { declarators, .. } => {
            for (target, init) in declarators {
                if let BindingTarget::Pattern(p) = target {
                    out.push(*p);
                }
                if let Some(i) = init {
                    out.push(*i);
                }
            }
        }
        NodeKind::If { test, consequent, alternate } => {
            out.push(*test);
            out.push(*consequent);
            if let Some(a) = alternate {
                out.push(*a);
            }
        }
        NodeKind::For { init, test, update, body } => {
            if let Some(i) = init {
                out.push(*i);
            }
            if let Some(t) = test {
                out.push(*t);
            }
            if let Some(u) = update {
                out.push(*u);
            }
            out.push(*body);
        }
        NodeKind::ForIn { left, right, body } | NodeKind::ForOf { left, right, body, .. } => {
            out.push(*left);
            out.push(*right);
            out.push(*body);
        }
        NodeKind::While { test, body } | NodeKind::DoWhile { test, body } => {
            out.push(*test);
            out.push(*body);
        }
        NodeKind::Switch { discriminant, cases } => {
            out.push(*discriminant);
            for (test, body) in cases {
                if let Some(t) = test {
                    out.push(*t);
                }
                out.extend(body.iter().copied());
            }
        }
        NodeKind::Return { argument } => {
            if let Some(a) = argument {
                out.push(*a);
            }
        }
        NodeKind::Throw { argument } => out.push(*argument),
        NodeKind::Try { block, handler, finalizer } => {
            out.push(*block);
            if let Some((binding, body)) = handler {
                if let Some(BindingTarget::Pattern(p)) = binding {
                    out.push(*p);
                }
                out.push(*body);
            }
            if let Some(f) = finalizer {
                out.push(*f);
            }
        }
        NodeKind::With { object, body } => {
            out.push(*object);
            out.push(*body);
        }
        NodeKind::Labeled { body, .. } => out.push(*body),
        NodeKind::FunctionRegistration { function, .. } => out.push(*function),
        NodeKind::InstrumentedEval { argument } => out.push(*argument),
    }
    out
}

#[cfg(test)]
#[path = "../tests/visit.rs"]
mod tests;
