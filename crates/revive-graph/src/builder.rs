//! The depth-first value graph builder. One `Builder` per
//! `build_value_graph` call; nothing survives past the call.

use crate::node::{
    BoundNode, ClassNode, ClosureNode, FrameBindingNode, FrameNode, GraphNode, GraphNodeId, GraphRoot,
    ObjectShape, PropertyDescriptorNode, PropertyKeyNode, ValueGraph,
};
use revive_ast::{FunctionFlavor, FunctionId};
use revive_common::Strictness;
use revive_host::{
    CollectionData, CollectionKind, Host, HostClassData, HostFunctionData, HostIdentity, HostValue, ObjectKind,
    PropertyDescriptor, PropertyKey, TypedElementKind,
};
use revive_instrument::NameUsage;
use revive_tracker::FrameId;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::rc::Rc;

/// An "unserializable value": a live resource with no structural
/// representation. Reported with the path from the root and the value kind,
/// the same shape the emitter later uses to report a missing capture.
#[derive(Clone, Debug)]
pub enum GraphError {
    Unserializable { path: Vec<String>, kind: &'static str },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::Unserializable { path, kind } => {
                write!(f, "unserializable value at {}: {kind}", if path.is_empty() { "<root>".to_string() } else { path.join(".") })
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Structural dedup key for primitives with value equality. `Number` carries the raw bit pattern rather than `f64` so that
/// the key itself can derive `Eq`/`Hash`.
#[derive(Clone, PartialEq, Eq, Hash)]
enum PrimKey {
    Undefined,
    Null,
    Boolean(bool),
    Number(u64),
    NegativeZero,
    String(Rc<str>),
    BigInt(Rc<str>),
}

/// How many property hops the global-object BFS follows before giving up on
/// a given branch. Built-in surfaces are shallow (a handful of constructors,
/// each with a handful of static members); this bounds the index-building
/// walk without needing a real depth limit in practice.
const MAX_GLOBAL_DEPTH: usize = 6;

/// A registered function's capture data, resolved once per function object
/// instead of being re-derived from its `CaptureDescriptor`/`InfoRecord`
/// pair at every use site.
struct ExtractedCapture {
    scope_ids: Vec<FrameId>,
    strictness: Strictness,
    uses_this: bool,
    uses_arguments: bool,
    uses_new_target: bool,
    uses_super: bool,
    uses_direct_eval: bool,
}

struct ExtractedFunction {
    identity: FunctionId,
    flavor: FunctionFlavor,
    source_text: Rc<str>,
    capture: Option<ExtractedCapture>,
    free_names: Vec<(Rc<str>, Vec<NameUsage>)>,
}

struct ExtractedClass {
    constructor: HostValue,
    super_class: Option<HostValue>,
    has_explicit_constructor: bool,
}

struct ExtractedBound {
    target: HostValue,
    bound_this: HostValue,
    bound_args: Vec<HostValue>,
}

enum Extracted {
    Plain,
    Array(Vec<Option<HostValue>>),
    Function(ExtractedFunction),
    Class(ExtractedClass),
    Bound(ExtractedBound),
    Native(Rc<str>),
    Collection(CollectionKind, Vec<(HostValue, Option<HostValue>)>),
    Buffer(Rc<[u8]>, bool),
    BufferView(HostValue, TypedElementKind, usize, usize),
    Error,
    Regex(Rc<str>, Rc<str>),
    Boxed(HostValue),
    GlobalRef(Vec<Rc<str>>),
    ModuleRef(Rc<str>, Option<Rc<str>>),
}

fn extract_function(data: &HostFunctionData) -> ExtractedFunction {
    let capture = data.capture.as_ref().map(|c| ExtractedCapture {
        scope_ids: c.scope_ids.clone(),
        strictness: c.info_record.strictness,
        uses_this: c.info_record.uses_this,
        uses_arguments: c.info_record.uses_arguments,
        uses_new_target: c.info_record.uses_new_target,
        uses_super: c.info_record.uses_super,
        uses_direct_eval: c.info_record.uses_direct_eval,
    });
    ExtractedFunction {
        identity: data.identity,
        flavor: data.flavor,
        source_text: data.source_text.clone(),
        capture,
        free_names: data.resolved_free_names.clone(),
    }
}

struct Builder<'h> {
    host: &'h dyn Host,
    graph: ValueGraph,
    identity_map: FxHashMap<HostIdentity, GraphNodeId>,
    prim_cache: FxHashMap<PrimKey, GraphNodeId>,
    frame_cache: FxHashMap<FrameId, GraphNodeId>,
    global_paths: FxHashMap<HostIdentity, Vec<Rc<str>>>,
}

/// Builds the value graph reachable from `roots`
/// against any `Host` implementation — a real engine binding or
/// `revive_host::tree_walk::TreeWalkHost`.
pub fn build_value_graph(host: &dyn Host, roots: Vec<(Rc<str>, HostValue)>) -> Result<ValueGraph, GraphError> {
    let global_paths = index_globals(host);
    let mut builder = Builder {
        host,
        graph: ValueGraph::default(),
        identity_map: FxHashMap::default(),
        prim_cache: FxHashMap::default(),
        frame_cache: FxHashMap::default(),
        global_paths,
    };
    for (name, value) in roots {
        let mut path = vec![name.to_string()];
        let node = builder.build_value(&value, &mut path)?;
        builder.graph.roots.push(GraphRoot { name, node });
    }
    Ok(builder.graph)
}

/// A breadth-first sweep over every value reachable from `Host::global_roots`
/// by own-property name, recording the *first* (shortest) path found to each
/// distinct identity. Well-known symbols fall out
/// of this for free: `Symbol.iterator` is just an own property of the
/// `Symbol` global like any other.
fn index_globals(host: &dyn Host) -> FxHashMap<HostIdentity, Vec<Rc<str>>> {
    let mut paths: FxHashMap<HostIdentity, Vec<Rc<str>>> = FxHashMap::default();
    let mut queue: VecDeque<(Vec<Rc<str>>, HostValue)> = VecDeque::new();
    for (name, value) in host.global_roots() {
        queue.push_back((vec![name], value));
    }
    while let Some((path, value)) = queue.pop_front() {
        let Some(identity) = value.identity() else { continue };
        if paths.contains_key(&identity) {
            continue;
        }
        paths.insert(identity, path.clone());
        if path.len() >= MAX_GLOBAL_DEPTH || !value.is_object() {
            continue;
        }
        for key in host.own_keys(&value) {
            let PropertyKey::String(name) = &key else { continue };
            let Some(descriptor) = host.get_own_property(&value, &key) else { continue };
            if let Some(child) = descriptor.value() {
                let mut next = path.clone();
                next.push(name.clone());
                queue.push_back((next, child.clone()));
            }
        }
    }
    paths
}

impl<'h> Builder<'h> {
    fn build_value(&mut self, value: &HostValue, path: &mut Vec<String>) -> Result<GraphNodeId, GraphError> {
        match value {
            HostValue::Undefined => return Ok(self.intern_prim(PrimKey::Undefined, GraphNode::Undefined)),
            HostValue::Null => return Ok(self.intern_prim(PrimKey::Null, GraphNode::Null)),
            HostValue::Boolean(b) => return Ok(self.intern_prim(PrimKey::Boolean(*b), GraphNode::Boolean(*b))),
            HostValue::Number(n) => return Ok(self.intern_prim(PrimKey::Number(n.to_bits()), GraphNode::Number(*n))),
            HostValue::NegativeZero => return Ok(self.intern_prim(PrimKey::NegativeZero, GraphNode::NegativeZero)),
            HostValue::String(s) => return Ok(self.intern_prim(PrimKey::String(s.clone()), GraphNode::String(s.clone()))),
            HostValue::BigInt(s) => return Ok(self.intern_prim(PrimKey::BigInt(s.clone()), GraphNode::BigInt(s.clone()))),
            HostValue::Symbol(_) | HostValue::Object(_) => {}
        }

        let identity = value.identity().expect("symbol/object values always carry an identity");
        if let Some(&id) = self.identity_map.get(&identity) {
            return Ok(id);
        }
        if let Some(global_path) = self.global_paths.get(&identity).cloned() {
            let id = self.graph.alloc(GraphNode::GlobalRef(global_path));
            self.identity_map.insert(identity, id);
            return Ok(id);
        }

        if let HostValue::Symbol(sym) = value {
            let id = self.graph.alloc(GraphNode::Symbol { description: sym.description.clone(), category: sym.category });
            self.identity_map.insert(identity, id);
            return Ok(id);
        }

        // Reserve the id before recursing so a cyclic own-property chain
        // resolves back to this same node instead of looping forever
        //.
        let placeholder = self.graph.alloc(GraphNode::Undefined);
        self.identity_map.insert(identity, placeholder);
        let node = self.build_object(value, path)?;
        self.graph.replace(placeholder, node);
        Ok(placeholder)
    }

    fn intern_prim(&mut self, key: PrimKey, node: GraphNode) -> GraphNodeId {
        if let Some(&id) = self.prim_cache.get(&key) {
            return id;
        }
        let id = self.graph.alloc(node);
        self.prim_cache.insert(key, id);
        id
    }

    fn build_object(&mut self, value: &HostValue, path: &mut Vec<String>) -> Result<GraphNode, GraphError> {
        let obj = value.as_object().expect("build_object is only called for Object-kind values").clone();

        // Owned data is cloned out of the `RefCell` borrow before any
        // recursive call, since a cyclic structure recursing back into this
        // same object would otherwise try to borrow it a second time.
        let extracted = {
            let b = obj.borrow();
            match &b.kind {
                ObjectKind::Plain => Extracted::Plain,
                ObjectKind::Array(elements) => Extracted::Array(elements.clone()),
                ObjectKind::Function(data) => Extracted::Function(extract_function(data)),
                ObjectKind::Class(HostClassData { constructor, super_class, has_explicit_constructor }) => {
                    Extracted::Class(ExtractedClass {
                        constructor: constructor.clone(),
                        super_class: super_class.clone(),
                        has_explicit_constructor: *has_explicit_constructor,
                    })
                }
                ObjectKind::Bound(bound) => Extracted::Bound(ExtractedBound {
                    target: bound.target.clone(),
                    bound_this: bound.bound_this.clone(),
                    bound_args: bound.bound_args.clone(),
                }),
                ObjectKind::Native(native) => Extracted::Native(native.name.clone()),
                ObjectKind::Collection(CollectionData { kind, entries }) => Extracted::Collection(*kind, entries.clone()),
                ObjectKind::Buffer(buffer) => Extracted::Buffer(Rc::from(buffer.bytes.borrow().as_slice()), buffer.shared),
                ObjectKind::BufferView(view) => {
                    Extracted::BufferView(view.buffer.clone(), view.element_kind, view.byte_offset, view.length)
                }
                ObjectKind::Error => Extracted::Error,
                ObjectKind::Regex { pattern, flags } => Extracted::Regex(pattern.clone(), flags.clone()),
                ObjectKind::Boxed(inner) => Extracted::Boxed(inner.clone()),
                ObjectKind::GlobalRef(segments) => Extracted::GlobalRef(segments.clone()),
                ObjectKind::ModuleRef { module, export } => Extracted::ModuleRef(module.clone(), export.clone()),
            }
        };

        match extracted {
            Extracted::Plain => Ok(GraphNode::PlainObject(self.build_shape(value, path)?)),
            Extracted::Array(elements) => {
                let mut nodes = Vec::with_capacity(elements.len());
                for (index, element) in elements.into_iter().enumerate() {
                    match element {
                        Some(v) => {
                            path.push(index.to_string());
                            let id = self.build_value(&v, path)?;
                            path.pop();
                            nodes.push(Some(id));
                        }
                        None => nodes.push(None),
                    }
                }
                let shape = self.build_shape(value, path)?;
                Ok(GraphNode::Array { elements: nodes, shape })
            }
            Extracted::Function(f) => {
                let missing_capture = f.capture.is_none();
                let (frames, strictness, uses_this, uses_arguments, uses_new_target, uses_super, uses_direct_eval) = match f.capture {
                    Some(capture) => {
                        path.push("<closure>".into());
                        let mut frame_ids = Vec::with_capacity(capture.scope_ids.len());
                        for frame_id in capture.scope_ids {
                            if let Some(frame) = self.build_frame(frame_id) {
                                frame_ids.push(frame);
                            }
                        }
                        path.pop();
                        (
                            frame_ids,
                            capture.strictness,
                            capture.uses_this,
                            capture.uses_arguments,
                            capture.uses_new_target,
                            capture.uses_super,
                            capture.uses_direct_eval,
                        )
                    }
                    None => (Vec::new(), Strictness::Sloppy, false, false, false, false, false),
                };
                let shape = self.build_shape(value, path)?;
                Ok(GraphNode::Closure(ClosureNode {
                    identity: f.identity,
                    flavor: f.flavor,
                    strictness,
                    source_text: f.source_text,
                    free_names: f.free_names,
                    frames,
                    uses_this,
                    uses_arguments,
                    uses_new_target,
                    uses_super,
                    uses_direct_eval,
                    missing_capture,
                    shape,
                }))
            }
            Extracted::Class(c) => {
                path.push("<constructor>".into());
                let constructor = self.build_value(&c.constructor, path)?;
                path.pop();
                let super_class = match c.super_class {
                    Some(sup) => {
                        path.push("<super>".into());
                        let id = self.build_value(&sup, path)?;
                        path.pop();
                        Some(id)
                    }
                    None => None,
                };
                let shape = self.build_shape(value, path)?;
                Ok(GraphNode::Class(ClassNode { constructor, super_class, has_explicit_constructor: c.has_explicit_constructor, shape }))
            }
            Extracted::Bound(b) => {
                path.push("<target>".into());
                let target = self.build_value(&b.target, path)?;
                path.pop();
                path.push("<this>".into());
                let bound_this = self.build_value(&b.bound_this, path)?;
                path.pop();
                let mut bound_args = Vec::with_capacity(b.bound_args.len());
                for (i, arg) in b.bound_args.into_iter().enumerate() {
                    path.push(format!("<bound-arg-{i}>"));
                    bound_args.push(self.build_value(&arg, path)?);
                    path.pop();
                }
                let shape = self.build_shape(value, path)?;
                Ok(GraphNode::Bound(BoundNode { target, bound_this, bound_args, shape }))
            }
            // Reachable only when a native function isn't resolvable via any
            // global path (e.g. an instance method value torn off and
            // handed to user code): it has neither source text nor a path,
            // so there is nothing to serialize it as.
            Extracted::Native(_name) => Err(GraphError::Unserializable { path: path.clone(), kind: "native function" }),
            Extracted::Collection(kind, entries) => {
                let mut nodes = Vec::with_capacity(entries.len());
                for (i, (k, v)) in entries.into_iter().enumerate() {
                    path.push(format!("<entry-{i}>"));
                    let key_id = self.build_value(&k, path)?;
                    let value_id = match v {
                        Some(v) => Some(self.build_value(&v, path)?),
                        None => None,
                    };
                    path.pop();
                    nodes.push((key_id, value_id));
                }
                let shape = self.build_shape(value, path)?;
                Ok(GraphNode::Collection { kind, entries: nodes, shape })
            }
            Extracted::Buffer(bytes, shared) => Ok(GraphNode::Buffer { bytes, shared }),
            Extracted::BufferView(buffer, element_kind, byte_offset, length) => {
                path.push("<buffer>".into());
                let buffer_id = self.build_value(&buffer, path)?;
                path.pop();
                let shape = self.build_shape(value, path)?;
                Ok(GraphNode::BufferView { buffer: buffer_id, element_kind, byte_offset, length, shape })
            }
            Extracted::Error => Ok(GraphNode::Error(self.build_shape(value, path)?)),
            Extracted::Regex(pattern, flags) => {
                let shape = self.build_shape(value, path)?;
                Ok(GraphNode::Regex { pattern, flags, shape })
            }
            Extracted::Boxed(inner) => {
                path.push("<boxed>".into());
                let value_id = self.build_value(&inner, path)?;
                path.pop();
                let shape = self.build_shape(value, path)?;
                Ok(GraphNode::Boxed { value: value_id, shape })
            }
            Extracted::GlobalRef(segments) => Ok(GraphNode::GlobalRef(segments)),
            Extracted::ModuleRef(module, export) => Ok(GraphNode::ModuleRef { module, export }),
        }
    }

    /// Walks `value`'s own properties generically through the `Host` trait
    ///. Used for every object-shaped node kind:
    /// plain objects, and the extra own properties a function/class/array/
    /// etc. carries beyond its kind-specific payload (e.g. a class's static
    /// members and `prototype` property, matched generically rather than
    /// through a separate member list — see `ClassNode`'s doc comment).
    fn build_shape(&mut self, value: &HostValue, path: &mut Vec<String>) -> Result<ObjectShape, GraphError> {
        let mut properties = Vec::new();
        for key in self.host.own_keys(value) {
            let Some(descriptor) = self.host.get_own_property(value, &key) else { continue };
            let key_node = match &key {
                PropertyKey::String(s) => {
                    path.push(s.to_string());
                    PropertyKeyNode::String(s.clone())
                }
                PropertyKey::Symbol(sym) => {
                    path.push(format!("[{}]", sym.description.as_deref().unwrap_or("Symbol()")));
                    let id = self.build_value(&HostValue::Symbol(sym.clone()), path)?;
                    PropertyKeyNode::Symbol(id)
                }
            };
            let descriptor_node = self.build_descriptor(descriptor, path)?;
            path.pop();
            properties.push((key_node, descriptor_node));
        }
        let prototype = match self.host.prototype_of(value) {
            Some(p) => {
                path.push("<prototype>".into());
                let id = self.build_value(&p, path)?;
                path.pop();
                Some(id)
            }
            None => None,
        };
        Ok(ObjectShape { properties, prototype, extensibility: self.host.extensibility(value) })
    }

    fn build_descriptor(&mut self, descriptor: PropertyDescriptor, path: &mut Vec<String>) -> Result<PropertyDescriptorNode, GraphError> {
        match descriptor {
            PropertyDescriptor::Data { value, writable, enumerable, configurable } => {
                let id = self.build_value(&value, path)?;
                Ok(PropertyDescriptorNode::Data { value: id, writable, enumerable, configurable })
            }
            PropertyDescriptor::Accessor { get, set, enumerable, configurable } => {
                let get = match get {
                    Some(g) => {
                        path.push("<getter>".into());
                        let id = self.build_value(&g, path)?;
                        path.pop();
                        Some(id)
                    }
                    None => None,
                };
                let set = match set {
                    Some(s) => {
                        path.push("<setter>".into());
                        let id = self.build_value(&s, path)?;
                        path.pop();
                        Some(id)
                    }
                    None => None,
                };
                Ok(PropertyDescriptorNode::Accessor { get, set, enumerable, configurable })
            }
        }
    }

    /// Resolves one captured scope-id to a frame node, sharing it across
    /// every closure whose capture chain passes through it. Cycle-safe the same way `build_value` is: the id is
    /// reserved before recursing into bindings, since a frame can hold a
    /// closure that in turn captures that same frame (a function assigned
    /// to a variable in its own enclosing scope).
    fn build_frame(&mut self, frame_id: FrameId) -> Option<GraphNodeId> {
        if let Some(&id) = self.frame_cache.get(&frame_id) {
            return Some(id);
        }
        let bindings = self.host.frame_bindings(frame_id)?;
        let placeholder = self.graph.alloc(GraphNode::Frame(FrameNode {
            parent: None,
            bindings: Vec::new(),
            this_value: None,
            arguments_object: None,
            new_target: None,
            is_with: false,
            with_object: None,
        }));
        self.frame_cache.insert(frame_id, placeholder);

        let mut path = Vec::new();
        let parent = bindings.parent.and_then(|p| self.build_frame(p));
        let mut binding_nodes = Vec::with_capacity(bindings.bindings.len());
        for binding in bindings.bindings {
            path.clear();
            path.push(format!("<frame binding {}>", binding.name));
            if let Ok(id) = self.build_value(&binding.value, &mut path) {
                binding_nodes.push(FrameBindingNode { name: binding.name, value: id, mutable: binding.mutable });
            }
        }
        let this_value = bindings.this_value.and_then(|v| {
            path.clear();
            path.push("<this>".into());
            self.build_value(&v, &mut path).ok()
        });
        let arguments_object = bindings.arguments_object.and_then(|v| {
            path.clear();
            path.push("<arguments>".into());
            self.build_value(&v, &mut path).ok()
        });
        let new_target = bindings.new_target.and_then(|v| {
            path.clear();
            path.push("<new.target>".into());
            self.build_value(&v, &mut path).ok()
        });
        let with_object = bindings.with_object.and_then(|v| {
            path.clear();
            path.push("<with object>".into());
            self.build_value(&v, &mut path).ok()
        });

        self.graph.replace(
            placeholder,
            GraphNode::Frame(FrameNode {
                parent,
                bindings: binding_nodes,
                this_value,
                arguments_object,
                new_target,
                is_with: bindings.is_with,
                with_object,
            }),
        );
        Some(placeholder)
    }
}

#[cfg(test)]
#[path = "../tests/builder.rs"]
mod tests;
