//! The value graph arena. One `ValueGraph` per `serialize` call: a flat
//! `Vec` of node payloads addressed by a `u32` newtype index rather than a
//! tree of boxed values, so shared sub-values are represented once and
//! referenced by id everywhere else.

use revive_ast::{FunctionFlavor, FunctionId};
use revive_common::Strictness;
use revive_host::{CollectionKind, ExtensibilityState, SymbolCategory, TypedElementKind};
use revive_instrument::NameUsage;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphNodeId(pub u32);

/// A property key in the graph: string keys are carried inline (their
/// identity doesn't matter), symbol keys point back at the `Symbol` node
/// representing that exact symbol so two properties keyed by the same
/// symbol value share one key node.
#[derive(Clone, Debug)]
pub enum PropertyKeyNode {
    String(Rc<str>),
    Symbol(GraphNodeId),
}

#[derive(Clone, Debug)]
pub enum PropertyDescriptorNode {
    Data { value: GraphNodeId, writable: bool, enumerable: bool, configurable: bool },
    Accessor { get: Option<GraphNodeId>, set: Option<GraphNodeId>, enumerable: bool, configurable: bool },
}

/// Everything every object-shaped node has in common: its own properties in
/// host observation order, its prototype link,
/// and its extensibility state.
#[derive(Clone, Debug, Default)]
pub struct ObjectShape {
    pub properties: Vec<(PropertyKeyNode, PropertyDescriptorNode)>,
    pub prototype: Option<GraphNodeId>,
    pub extensibility: ExtensibilityState,
}

/// A function closure node.
#[derive(Clone, Debug)]
pub struct ClosureNode {
    pub identity: FunctionId,
    pub flavor: FunctionFlavor,
    pub strictness: Strictness,
    pub source_text: Rc<str>,
    /// Free names and their usages, in the order the info record declared
    /// them — the order the emitter's nested-arrow parameter list must
    /// match.
    pub free_names: Vec<(Rc<str>, Vec<NameUsage>)>,
    /// Resolved frame nodes, outermost first, mirroring
    /// `CaptureDescriptor::scope_ids` order.
    pub frames: Vec<GraphNodeId>,
    pub uses_this: bool,
    pub uses_arguments: bool,
    pub uses_new_target: bool,
    pub uses_super: bool,
    pub uses_direct_eval: bool,
    /// `true` when the host never registered a capture descriptor for this
    /// closure. `frames`/`free_names` are then always
    /// empty and the emitter must either report the error or fall back to
    /// verbatim source, per the caller's opt-in.
    pub missing_capture: bool,
    pub shape: ObjectShape,
}

/// A class node. Instance methods
/// live as ordinary own properties of the prototype object reachable via
/// `shape.properties`'s `"prototype"` entry; static members live as
/// ordinary own properties of `shape` itself — both walked generically,
/// since classes are recognized by shape rather than by a separate member
/// list.
#[derive(Clone, Debug)]
pub struct ClassNode {
    pub constructor: GraphNodeId,
    pub super_class: Option<GraphNodeId>,
    pub has_explicit_constructor: bool,
    pub shape: ObjectShape,
}

/// A bound function.
#[derive(Clone, Debug)]
pub struct BoundNode {
    pub target: GraphNodeId,
    pub bound_this: GraphNodeId,
    pub bound_args: Vec<GraphNodeId>,
    pub shape: ObjectShape,
}

/// One scope-frame activation. Shared by every
/// closure whose capture chain passes through it.
#[derive(Clone, Debug)]
pub struct FrameNode {
    pub parent: Option<GraphNodeId>,
    pub bindings: Vec<FrameBindingNode>,
    pub this_value: Option<GraphNodeId>,
    pub arguments_object: Option<GraphNodeId>,
    pub new_target: Option<GraphNodeId>,
    pub is_with: bool,
    pub with_object: Option<GraphNodeId>,
}

#[derive(Clone, Debug)]
pub struct FrameBindingNode {
    pub name: Rc<str>,
    pub value: GraphNodeId,
    pub mutable: bool,
}

/// One node in the value graph, plus two kinds (`Symbol`, `Frame`) that
/// read more naturally as primitives or scope state than as graph nodes but
/// which this arena must still address by id so they can be shared.
#[derive(Clone, Debug)]
pub enum GraphNode {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    NegativeZero,
    String(Rc<str>),
    BigInt(Rc<str>),
    Symbol { description: Option<Rc<str>>, category: SymbolCategory },
    PlainObject(ObjectShape),
    Array { elements: Vec<Option<GraphNodeId>>, shape: ObjectShape },
    Closure(ClosureNode),
    Class(ClassNode),
    Bound(BoundNode),
    /// A built-in host function with no source text. Kept in the enum
    /// for completeness and so a future host binding that *can* describe
    /// a native function structurally has somewhere to put it.
    Native { name: Rc<str> },
    Collection { kind: CollectionKind, entries: Vec<(GraphNodeId, Option<GraphNodeId>)>, shape: ObjectShape },
    Buffer { bytes: Rc<[u8]>, shared: bool },
    BufferView { buffer: GraphNodeId, element_kind: TypedElementKind, byte_offset: usize, length: usize, shape: ObjectShape },
    Error(ObjectShape),
    Regex { pattern: Rc<str>, flags: Rc<str>, shape: ObjectShape },
    Boxed { value: GraphNodeId, shape: ObjectShape },
    GlobalRef(Vec<Rc<str>>),
    ModuleRef { module: Rc<str>, export: Option<Rc<str>> },
    Frame(FrameNode),
}

/// One root value the caller asked to serialize, named for code-splitting.
#[derive(Clone, Debug)]
pub struct GraphRoot {
    pub name: Rc<str>,
    pub node: GraphNodeId,
}

/// The full output of one builder run: every node reachable from every
/// root, deduplicated by identity/structural equality #[derive(Clone, Debug, Default)]
pub struct ValueGraph {
    nodes: Vec<GraphNode>,
    pub roots: Vec<GraphRoot>,
}

impl ValueGraph {
    pub fn get(&self, id: GraphNodeId) -> &GraphNode {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GraphNodeId, &GraphNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (GraphNodeId(i as u32), n))
    }

    pub(crate) fn alloc(&mut self, node: GraphNode) -> GraphNodeId {
        let id = GraphNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub(crate) fn replace(&mut self, id: GraphNodeId, node: GraphNode) {
        self.nodes[id.0 as usize] = node;
    }
}
