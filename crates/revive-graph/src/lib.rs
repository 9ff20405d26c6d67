//! The value graph builder: a depth-first traversal that,
//! starting from a root host value, produces an arena of nodes (primitive,
//! object, function closure, class, collection, typed buffer, global
//! reference, scope frame) and edges for every property/prototype/capture
//! relationship between them.
//!
//! Built as a `TypeId`-style indexed arena: shared sub-values are
//! represented once and referenced by a `GraphNodeId` everywhere else,
//! rather than as a tree of boxed values that would have to duplicate
//! shared structure or fight the borrow checker over cycles.

pub mod builder;
pub mod node;

pub use builder::{build_value_graph, GraphError};
pub use node::{
    BoundNode, ClassNode, ClosureNode, FrameBindingNode, FrameNode, GraphNode, GraphNodeId, GraphRoot,
    ObjectShape, PropertyDescriptorNode, PropertyKeyNode, ValueGraph,
};
