//! Uniform AST model for the revive live-value serializer.
//!
//! A program is an arena of [`node::Node`]s keyed by [`node::NodeId`]; every
//! parent-child edge is an index rather than a direct ownership, the usual
//! discipline for ownership-constrained target languages. The
//! scope analyzer and instrumenter attach their own per-node annotations
//! (enclosing scope, binding resolution, synthesized insertions) as
//! side tables keyed by `NodeId` rather than as fields baked into every
//! variant.

pub mod kind;
pub mod node;
pub mod visit;

pub use kind::{
    ClassData, ClassMember, FunctionData, FunctionFlavor, FunctionId, Literal, NodeKind,
    Property, PropertyKind, SymbolCategory, VarKind,
};
pub use node::{BindingTarget, Node, NodeArena, NodeId, NodeList};
