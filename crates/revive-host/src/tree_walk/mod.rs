//! `TreeWalkHost`: the one concrete `Host` implementation this workspace
//! ships, so the rest of the pipeline is exercised end-to-end without
//! linking a real engine (host.rs's module docs). Lives at
//! `tree_walk::TreeWalkHost` so embedders with a real engine can ignore
//! this module entirely and implement `Host` themselves.

pub mod environment;
pub mod globals;
pub mod interpreter;

use crate::host::{Host, HostError, Program};
use crate::interpreter::{Completion, Exec};
use crate::tree_walk::environment::Environment;
use crate::value::*;
use revive_ast::{FunctionId, NodeArena, NodeId, NodeKind};
use revive_common::{Diagnostic, Interner, SourceKind};
use revive_instrument::{FunctionRegistration, InfoRecord};
use revive_tracker::{EvalContext, HostFunctionKey, Tracker};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A parsed-and-instrumented program kept alive for as long as any closure
/// created from it is reachable.
pub struct ProgramData {
    pub arena: NodeArena,
    pub interner: Rc<Interner>,
    pub root: NodeId,
    pub source: Rc<str>,
    pub registrations: FxHashMap<NodeId, FunctionRegistration>,
    pub info_records: FxHashMap<FunctionId, InfoRecord>,
}

/// What a `HostValue::Object` of kind `Function` needs at call time, kept
/// out of `HostFunctionData` itself so the value model stays usable by a
/// real-engine `Host` implementation that has no use for any of this
/// (value.rs's module docs).
#[derive(Clone)]
struct ClosureRuntime {
    program: Rc<ProgramData>,
    node: NodeId,
    env: Rc<Environment>,
    super_prototype: Option<HostValue>,
    super_constructor: Option<HostValue>,
}

pub struct TreeWalkHost {
    tracker: &'static Tracker,
    next_key: AtomicU64,
    closures: RefCell<FxHashMap<HostFunctionKey, ClosureRuntime>>,
    globals: RefCell<FxHashMap<Rc<str>, HostValue>>,
    /// Reverse index from a tracker `FrameId` back to the (weakly held)
    /// environment it names, populated as `capture_chain` assigns ids.
    /// Weak because a frame with no closure left alive should not itself
    /// keep an otherwise-dead environment chain around.
    frames: RefCell<FxHashMap<revive_tracker::FrameId, std::rc::Weak<Environment>>>,
    object_prototype: HostValue,
    array_prototype: HostValue,
    function_prototype: HostValue,
}

impl TreeWalkHost {
    pub fn new() -> Rc<TreeWalkHost> {
        let object_prototype = HostValue::object(ObjectKind::Plain, None);
        let function_prototype = HostValue::object(ObjectKind::Plain, Some(object_prototype.clone()));
        let array_prototype = HostValue::object(ObjectKind::Plain, Some(object_prototype.clone()));
        let host = Rc::new(TreeWalkHost {
            tracker: revive_tracker::global(),
            next_key: AtomicU64::new(0),
            closures: RefCell::new(FxHashMap::default()),
            globals: RefCell::new(FxHashMap::default()),
            frames: RefCell::new(FxHashMap::default()),
            object_prototype,
            array_prototype,
            function_prototype,
        });
        globals::install(&host);
        host
    }

    pub fn object_prototype(&self) -> Option<HostValue> {
        Some(self.object_prototype.clone())
    }

    pub fn array_prototype(&self) -> Option<HostValue> {
        Some(self.array_prototype.clone())
    }

    pub fn function_prototype(&self) -> Option<HostValue> {
        Some(self.function_prototype.clone())
    }

    pub fn global_binding(&self, name: &str) -> Option<HostValue> {
        self.globals.borrow().get(name).cloned()
    }

    pub fn set_global_binding(&self, name: &str, value: HostValue) {
        self.globals.borrow_mut().insert(Rc::from(name), value);
    }

    pub fn has_property(&self, value: &HostValue, key: &PropertyKey) -> bool {
        let mut current = value.clone();
        loop {
            let Some(obj) = current.as_object().cloned() else { return false };
            if obj.borrow().get_own(key).is_some() {
                return true;
            }
            match obj.borrow().prototype.clone() {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    fn program_for(&self, source: &str, kind: SourceKind) -> Result<Rc<ProgramData>, HostError> {
        let instrumented = revive_instrument::instrument(source, kind).map_err(|e| match e {
            revive_instrument::InstrumentError::Parse(d) => HostError::Parse(d),
            revive_instrument::InstrumentError::Internal(msg) => HostError::Evaluation(msg),
        })?;
        Ok(Rc::new(ProgramData {
            arena: instrumented.arena,
            interner: Rc::new(instrumented.interner),
            root: instrumented.root,
            source: Rc::from(source),
            registrations: instrumented.registrations,
            info_records: instrumented.info_records,
        }))
    }

    fn next_key(&self) -> HostFunctionKey {
        HostFunctionKey(self.next_key.fetch_add(1, Ordering::Relaxed))
    }

    /// Walks `env`'s own parent chain, assigning (and caching) a tracker
    /// frame id to every enclosing environment. The static escape analysis
    /// already decided which of these frames actually matter to some
    /// closure; `register_scope` is idempotent-by-environment via
    /// `Environment::frame_id`, so recording the full chain here rather
    /// than filtering it down costs an unused tracker entry at worst, never
    /// an incorrect one (see DESIGN.md).
    fn capture_chain(&self, env: &Rc<Environment>) -> Vec<revive_tracker::FrameId> {
        let mut chain = Vec::new();
        let mut current = Some(env.clone());
        while let Some(e) = current {
            let id = e.frame_id(self.tracker);
            self.frames.borrow_mut().entry(id).or_insert_with(|| Rc::downgrade(&e));
            chain.push(id);
            current = e.parent.clone();
        }
        chain.reverse();
        chain
    }

    /// The bindings, `this`/`arguments`, and `with` object of one scope
    /// frame, resolved back from the tracker's
    /// opaque `FrameId` via the weak reverse index `capture_chain` builds.
    /// `None` once every closure observing the frame (and hence every
    /// strong reference to its environment) has gone out of scope, or for
    /// a `FrameId` this host never issued.
    pub fn frame_bindings(&self, frame: revive_tracker::FrameId) -> Option<crate::host::FrameBindings> {
        let env = self.frames.borrow().get(&frame)?.upgrade()?;
        let parent = env.parent.as_ref().map(|p| p.frame_id(self.tracker));
        let bindings = env
            .own_bindings()
            .into_iter()
            .map(|(name, value, mutable)| crate::host::FrameBinding { name, value, mutable })
            .collect();
        Some(crate::host::FrameBindings {
            parent,
            bindings,
            this_value: env.this_value.clone(),
            arguments_object: env.arguments_object.clone(),
            new_target: env.new_target.clone(),
            is_with: env.is_with,
            with_object: env.with_object.clone(),
        })
    }

    /// Every binding reachable directly off the global object, for the value graph builder's reachable-by-path
    /// detection. Order is insertion order, which is all `own_keys`
    /// promises for a plain object too.
    pub fn global_entries(&self) -> Vec<(Rc<str>, HostValue)> {
        self.globals.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn make_closure_with_super(
        &self,
        program: &Rc<ProgramData>,
        node: NodeId,
        env: &Rc<Environment>,
        super_prototype: Option<HostValue>,
        super_constructor: Option<HostValue>,
    ) -> Result<HostValue, HostError> {
        let NodeKind::Function(f) = program.arena.kind(node).clone() else {
            return Err(HostError::Evaluation("make_closure called on a non-function node".into()));
        };
        let key = self.next_key();
        let source_text = Rc::from(program.arena.get(node).span.slice(&program.source));
        let registration = program.registrations.get(&node).cloned();
        let mut resolved_free_names = Vec::new();
        let capture = registration.and_then(|reg| {
            let info = program.info_records.get(&reg.function).cloned()?;
            resolved_free_names = info
                .free_names
                .iter()
                .map(|r| (Rc::from(program.interner.resolve(r.name)), r.usages.clone()))
                .collect();
            let chain = self.capture_chain(env);
            Some(self.tracker.register_function(key, reg.function, chain, Arc::new(info)))
        });
        self.closures.borrow_mut().insert(
            key,
            ClosureRuntime { program: program.clone(), node, env: env.clone(), super_prototype, super_constructor },
        );
        let data = HostFunctionData { key, identity: f.id, flavor: f.flavor, source_text, capture, resolved_free_names };
        let value = HostValue::object(ObjectKind::Function(data), Some(self.function_prototype.clone()));
        if !f.flavor.is_arrow() && !f.flavor.is_generator() {
            if let Some(obj) = value.as_object() {
                let proto = HostValue::object(ObjectKind::Plain, Some(self.object_prototype.clone()));
                if let Some(proto_obj) = proto.as_object() {
                    proto_obj.borrow_mut().set_own(PropertyKey::String(Rc::from("constructor")), PropertyDescriptor::data(value.clone()));
                }
                obj.borrow_mut().set_own(
                    PropertyKey::String(Rc::from("prototype")),
                    PropertyDescriptor::Data { value: proto, writable: true, enumerable: false, configurable: false },
                );
            }
        }
        Ok(value)
    }

    pub fn make_closure(&self, program: &Rc<ProgramData>, node: NodeId, env: &Rc<Environment>) -> Result<HostValue, HostError> {
        self.make_closure_with_super(program, node, env, None, None)
    }

    fn make_method_closure(
        &self,
        program: &Rc<ProgramData>,
        node: NodeId,
        env: &Rc<Environment>,
        super_prototype: Option<HostValue>,
        super_constructor: Option<HostValue>,
    ) -> Result<HostValue, HostError> {
        self.make_closure_with_super(program, node, env, super_prototype, super_constructor)
    }

    fn function_key_of(&self, value: &HostValue) -> Result<HostFunctionKey, HostError> {
        let obj = value.as_object().ok_or_else(|| HostError::Evaluation("value is not callable".into()))?;
        match &obj.borrow().kind {
            ObjectKind::Function(f) => Ok(f.key),
            _ => Err(HostError::Evaluation("value is not callable".into())),
        }
    }

    fn own_prototype_property(&self, ctor: &HostValue) -> HostValue {
        ctor.as_object()
            .and_then(|obj| obj.borrow().get_own(&PropertyKey::String(Rc::from("prototype"))).and_then(|d| d.value().cloned()))
            .unwrap_or_else(|| self.object_prototype.clone())
    }

    fn run_closure_body(&self, callee: &HostValue, this: HostValue, args: Vec<HostValue>, new_target: HostValue) -> Result<HostValue, HostError> {
        let key = self.function_key_of(callee)?;
        let runtime = self
            .closures
            .borrow()
            .get(&key)
            .cloned()
            .ok_or_else(|| HostError::Evaluation("closure has no runtime (produced by uninstrumented source?)".into()))?;
        let exec = Exec { host: self, program: &runtime.program };
        let NodeKind::Function(f) = exec.arena().kind(runtime.node).clone() else {
            return Err(HostError::Evaluation("closure points at a non-function node".into()));
        };
        let call_env = if f.flavor.is_arrow() {
            Environment::child(&runtime.env)
        } else {
            let arguments_object = Some(exec.new_array(args.clone()));
            if runtime.super_prototype.is_some() || runtime.super_constructor.is_some() {
                Environment::method_boundary(
                    &runtime.env,
                    this,
                    arguments_object,
                    Some(new_target),
                    runtime.super_prototype.clone(),
                    runtime.super_constructor.clone(),
                )
            } else {
                Environment::function_boundary(&runtime.env, this, arguments_object, Some(new_target))
            }
        };
        exec.bind_parameters(&f.params, &args, &call_env)?;
        if f.is_concise_arrow_body {
            exec.eval_expr(f.body, &call_env)
        } else {
            match exec.run_function_body(f.body, &call_env)? {
                Completion::Return(v) => Ok(v),
                Completion::Throw(v) => Err(HostError::Evaluation(format!("uncaught exception: {v:?}"))),
                _ => Ok(HostValue::Undefined),
            }
        }
    }

    pub fn call(&self, callee: &HostValue, this: HostValue, args: Vec<HostValue>) -> Result<HostValue, HostError> {
        let obj = callee.as_object().ok_or_else(|| HostError::Evaluation("value is not a function".into()))?;
        let is_bound = matches!(obj.borrow().kind, ObjectKind::Bound(_));
        if is_bound {
            let (target, bound_this, mut bound_args) = {
                let b = obj.borrow();
                let ObjectKind::Bound(d) = &b.kind else { unreachable!() };
                (d.target.clone(), d.bound_this.clone(), d.bound_args.clone())
            };
            bound_args.extend(args);
            return self.call(&target, bound_this, bound_args);
        }
        let native = match &obj.borrow().kind {
            ObjectKind::Native(n) => Some(n.call.clone()),
            _ => None,
        };
        if let Some(native) = native {
            return native(self, this, args);
        }
        let callable = matches!(obj.borrow().kind, ObjectKind::Function(_));
        if !callable {
            if matches!(obj.borrow().kind, ObjectKind::Class(_)) {
                return Err(HostError::Evaluation("class constructor cannot be invoked without 'new'".into()));
            }
            return Err(HostError::Evaluation("value is not a function".into()));
        }
        self.run_closure_body(callee, this, args, HostValue::Undefined)
    }

    pub fn construct(&self, ctor: &HostValue, args: Vec<HostValue>) -> Result<HostValue, HostError> {
        let obj = ctor.as_object().ok_or_else(|| HostError::Evaluation("value is not a constructor".into()))?;
        let kind_tag = {
            let b = obj.borrow();
            match &b.kind {
                ObjectKind::Function(_) => 0,
                ObjectKind::Class(_) => 1,
                ObjectKind::Bound(_) => 2,
                ObjectKind::Native(_) => 4,
                _ => 3,
            }
        };
        match kind_tag {
            4 => {
                let native = match &obj.borrow().kind {
                    ObjectKind::Native(n) => n.call.clone(),
                    _ => unreachable!(),
                };
                native(self, HostValue::Undefined, args)
            }
            0 => {
                let prototype = self.own_prototype_property(ctor);
                let this = HostValue::object(ObjectKind::Plain, Some(prototype));
                let result = self.run_closure_body(ctor, this.clone(), args, ctor.clone())?;
                Ok(if result.is_object() { result } else { this })
            }
            1 => {
                let prototype = self.own_prototype_property(ctor);
                let this = HostValue::object(ObjectKind::Plain, Some(prototype));
                self.invoke_constructor_body(ctor, this.clone(), args)?;
                Ok(this)
            }
            2 => {
                let (target, mut bound_args) = {
                    let b = obj.borrow();
                    let ObjectKind::Bound(d) = &b.kind else { unreachable!() };
                    (d.target.clone(), d.bound_args.clone())
                };
                bound_args.extend(args);
                self.construct(&target, bound_args)
            }
            _ => Err(HostError::Evaluation("value is not a constructor".into())),
        }
    }

    /// Runs a class's constructor body (explicit, or the implicit
    /// `super(...args)` forwarding a subclass with no declared constructor
    /// gets) against an already-allocated `this` — used both for the
    /// outermost `new` and for a derived constructor's own `super(...)`
    /// call (a simplification over strict "uninitialized this" TDZ
    /// tracking, see interpreter.rs module docs and DESIGN.md).
    pub(crate) fn invoke_constructor_body(&self, class_value: &HostValue, this: HostValue, args: Vec<HostValue>) -> Result<(), HostError> {
        let obj = class_value.as_object().ok_or_else(|| HostError::Evaluation("not a class".into()))?;
        let (constructor, super_class, has_explicit) = {
            let b = obj.borrow();
            match &b.kind {
                ObjectKind::Class(c) => (c.constructor.clone(), c.super_class.clone(), c.has_explicit_constructor),
                _ => return Err(HostError::Evaluation("not a class".into())),
            }
        };
        if has_explicit {
            self.run_closure_body(&constructor, this, args, class_value.clone())?;
            Ok(())
        } else if let Some(super_class) = super_class {
            self.invoke_constructor_body(&super_class, this, args)
        } else {
            Ok(())
        }
    }

    pub fn build_class(&self, exec: &Exec, id: NodeId, env: &Rc<Environment>) -> Result<HostValue, HostError> {
        let NodeKind::Class(class_data) = exec.arena().kind(id).clone() else {
            return Err(HostError::Evaluation("build_class called on a non-class node".into()));
        };
        let super_value = match class_data.super_class {
            Some(expr) => Some(exec.eval_expr(expr, env)?),
            None => None,
        };
        let super_prototype = match &super_value {
            Some(sv) => Some(exec.get_property(sv, &PropertyKey::String(Rc::from("prototype")))?),
            None => None,
        };
        let proto_parent = super_prototype.clone().or_else(|| Some(self.object_prototype.clone()));
        let prototype_object = HostValue::object(ObjectKind::Plain, proto_parent);

        let constructor_member = class_data
            .members
            .iter()
            .find(|m| !m.is_static && !m.computed && m.kind == revive_ast::PropertyKind::Method && exec.is_identifier_named(m.key, "constructor"));
        let has_explicit_constructor = constructor_member.is_some();
        let constructor_value = match constructor_member.and_then(|m| m.value) {
            Some(body_node) => self.make_method_closure(exec.program, body_node, env, super_prototype.clone(), super_value.clone())?,
            None => {
                // No explicit constructor: still need a callable Function
                // value to satisfy `HostClassData.constructor`, but it is
                // never invoked (`invoke_constructor_body` special-cases
                // `has_explicit_constructor == false` and forwards straight
                // to the superclass). Reuse the class node itself as a
                // harmless placeholder identity; its body is never run.
                self.make_method_closure(exec.program, id, env, super_prototype.clone(), super_value.clone())
                    .unwrap_or_else(|_| HostValue::object(ObjectKind::Plain, None))
            }
        };

        let super_class_prototype = super_value.clone();
        let class_value = HostValue::object(
            ObjectKind::Class(HostClassData { constructor: constructor_value, super_class: super_class_prototype, has_explicit_constructor }),
            super_value.clone().or_else(|| Some(self.function_prototype.clone())),
        );
        if let Some(class_obj) = class_value.as_object() {
            class_obj.borrow_mut().set_own(
                PropertyKey::String(Rc::from("prototype")),
                PropertyDescriptor::Data { value: prototype_object.clone(), writable: false, enumerable: false, configurable: false },
            );
            if let Some(name) = class_data.name {
                class_obj.borrow_mut().set_own(
                    PropertyKey::String(Rc::from("name")),
                    PropertyDescriptor::Data { value: HostValue::String(exec.text(name)), writable: false, enumerable: false, configurable: true },
                );
            }
        }
        if let Some(proto_obj) = prototype_object.as_object() {
            proto_obj.borrow_mut().set_own(PropertyKey::String(Rc::from("constructor")), PropertyDescriptor::Data {
                value: class_value.clone(),
                writable: true,
                enumerable: false,
                configurable: true,
            });
        }

        for member in &class_data.members {
            let is_constructor_method =
                !member.is_static && !member.computed && member.kind == revive_ast::PropertyKind::Method && exec.is_identifier_named(member.key, "constructor");
            if is_constructor_method {
                continue;
            }
            let key = exec.property_key_of(member.key, member.computed, env)?;
            let target = if member.is_static { &class_value } else { &prototype_object };
            match member.kind {
                revive_ast::PropertyKind::Method => {
                    if let Some(body) = member.value {
                        let method = self.make_method_closure(exec.program, body, env, super_prototype.clone(), super_value.clone())?;
                        if let Some(obj) = target.as_object() {
                            obj.borrow_mut().set_own(key, PropertyDescriptor::Data { value: method, writable: true, enumerable: false, configurable: true });
                        }
                    }
                }
                revive_ast::PropertyKind::Get => {
                    if let Some(body) = member.value {
                        let getter = self.make_method_closure(exec.program, body, env, super_prototype.clone(), super_value.clone())?;
                        self.merge_accessor(target, key, Some(getter), None);
                    }
                }
                revive_ast::PropertyKind::Set => {
                    if let Some(body) = member.value {
                        let setter = self.make_method_closure(exec.program, body, env, super_prototype.clone(), super_value.clone())?;
                        self.merge_accessor(target, key, None, Some(setter));
                    }
                }
                _ => {
                    // Field declaration: evaluated against the instance at
                    // construction time in a real engine; this reference
                    // host evaluates static fields eagerly here and leaves
                    // instance fields to a subclass's explicit constructor
                    // assigning `this.x = ...` (no implicit-field wiring).
                    if member.is_static {
                        let value = match member.value {
                            Some(v) => exec.eval_expr(v, env)?,
                            None => HostValue::Undefined,
                        };
                        if let Some(obj) = target.as_object() {
                            obj.borrow_mut().set_own(key, PropertyDescriptor::data(value));
                        }
                    }
                }
            }
        }

        Ok(class_value)
    }

    fn merge_accessor(&self, target: &HostValue, key: PropertyKey, get: Option<HostValue>, set: Option<HostValue>) {
        let Some(obj) = target.as_object() else { return };
        let mut obj = obj.borrow_mut();
        let existing = obj.get_own(&key).cloned();
        let (get, set) = match existing {
            Some(PropertyDescriptor::Accessor { get: existing_get, set: existing_set, .. }) => {
                (get.or(existing_get), set.or(existing_set))
            }
            _ => (get, set),
        };
        obj.set_own(key, PropertyDescriptor::Accessor { get, set, enumerable: false, configurable: true });
    }

    pub fn get_property_chain(&self, value: &HostValue, key: &PropertyKey, receiver: &HostValue) -> Result<HostValue, HostError> {
        if let HostValue::String(s) = value {
            return Ok(string_property(s, key));
        }
        if let Some(obj) = value.as_object() {
            if let ObjectKind::Array(elements) = &obj.borrow().kind {
                if let Some(index) = key.as_array_index() {
                    return Ok(elements.get(index).cloned().flatten().unwrap_or(HostValue::Undefined));
                }
            }
            if let ObjectKind::BufferView(view) = &obj.borrow().kind {
                if let Some(index) = key.as_array_index() {
                    return Ok(read_buffer_view_element(view, index).unwrap_or(HostValue::Undefined));
                }
                if matches!(key, PropertyKey::String(s) if &**s == "length") {
                    return Ok(HostValue::Number(view.length as f64));
                }
            }
        }
        let mut current = value.clone();
        loop {
            let Some(obj) = current.as_object().cloned() else { return Ok(HostValue::Undefined) };
            let descriptor = obj.borrow().get_own(key).cloned();
            match descriptor {
                Some(PropertyDescriptor::Data { value, .. }) => return Ok(value),
                Some(PropertyDescriptor::Accessor { get: Some(getter), .. }) => return self.call(&getter, receiver.clone(), Vec::new()),
                Some(PropertyDescriptor::Accessor { get: None, .. }) => return Ok(HostValue::Undefined),
                None => match obj.borrow().prototype.clone() {
                    Some(p) => current = p,
                    None => return Ok(HostValue::Undefined),
                },
            }
        }
    }

    pub fn set_property_chain(&self, value: &HostValue, key: PropertyKey, new_value: HostValue) -> Result<(), HostError> {
        let Some(obj) = value.as_object() else { return Ok(()) };
        if let Some(index) = key.as_array_index() {
            let mut is_array = false;
            if let ObjectKind::Array(elements) = &mut obj.borrow_mut().kind {
                is_array = true;
                if index >= elements.len() {
                    elements.resize(index + 1, None);
                }
                elements[index] = Some(new_value.clone());
            }
            if is_array {
                return Ok(());
            }
            if let ObjectKind::BufferView(view) = &obj.borrow().kind {
                write_buffer_view_element(view, index, &new_value);
                return Ok(());
            }
        }
        let mut current = Some(obj.clone());
        while let Some(o) = current {
            let descriptor = o.borrow().get_own(&key).cloned();
            match descriptor {
                Some(PropertyDescriptor::Accessor { set: Some(setter), .. }) => {
                    self.call(&setter, value.clone(), vec![new_value])?;
                    return Ok(());
                }
                Some(PropertyDescriptor::Accessor { set: None, .. }) => return Ok(()),
                Some(PropertyDescriptor::Data { writable: false, .. }) if Rc::ptr_eq(&o, obj) => return Ok(()),
                Some(_) => break,
                None => current = o.borrow().prototype.clone().and_then(|p| p.as_object().cloned()),
            }
        }
        if matches!(obj.borrow().extensibility, ExtensibilityState::Extensible) || obj.borrow().get_own(&key).is_some() {
            obj.borrow_mut().set_own(key, PropertyDescriptor::data(new_value));
        }
        Ok(())
    }

    /// Direct `eval`: the instrumented program runs against the caller's
    /// own environment, not a fresh global one, so free names inside the
    /// evaluated text resolve into the surrounding scope. `Tracker::instrumented_eval` only hands its closure
    /// a borrowed `Instrumented`, which can't outlive this call, but a
    /// closure created by the evaluated text needs an owned, long-lived
    /// program — so this goes through `program_for` directly instead of
    /// through the tracker's wrapper (see DESIGN.md).
    pub fn eval_direct(&self, argument: &HostValue, env: &Rc<Environment>) -> Result<HostValue, HostError> {
        let HostValue::String(source) = argument else { return Ok(argument.clone()) };
        let program = self.program_for(source, SourceKind::Script)?;
        let root = program.root;
        let exec = Exec { host: self, program: &program };
        exec.run_program(root, env)
    }

    pub fn delete_property(&self, value: &HostValue, key: &PropertyKey) -> Result<bool, HostError> {
        let Some(obj) = value.as_object() else { return Ok(true) };
        if let Some(index) = key.as_array_index() {
            if let ObjectKind::Array(elements) = &mut obj.borrow_mut().kind {
                if let Some(slot) = elements.get_mut(index) {
                    *slot = None;
                }
                return Ok(true);
            }
        }
        let mut obj = obj.borrow_mut();
        match obj.get_own(key) {
            Some(d) if !d.configurable() => Ok(false),
            Some(_) => {
                obj.properties.shift_remove(key);
                Ok(true)
            }
            None => Ok(true),
        }
    }
}

impl Host for TreeWalkHost {
    fn parse(&self, source: &str, kind: SourceKind) -> Result<Program, HostError> {
        let (arena, interner, root) = revive_parser::parse(source, kind).map_err(|e| HostError::Parse(e.into_diagnostic()))?;
        Ok(Program { arena, interner, root })
    }

    fn evaluate(&self, source: &str, ctx: EvalContext) -> Result<HostValue, HostError> {
        let program = self.program_for(source, ctx.source_kind)?;
        let root = program.root;
        let exec = Exec { host: self, program: &program };
        let env = Environment::root(program.interner.clone());
        exec.run_program(root, &env)
    }

    fn own_keys(&self, value: &HostValue) -> Vec<PropertyKey> {
        value.as_object().map(|o| o.borrow().own_keys()).unwrap_or_default()
    }

    fn frame_bindings(&self, frame: revive_tracker::FrameId) -> Option<crate::host::FrameBindings> {
        TreeWalkHost::frame_bindings(self, frame)
    }

    fn global_roots(&self) -> Vec<(Rc<str>, HostValue)> {
        self.global_entries()
    }

    fn get_own_property(&self, value: &HostValue, key: &PropertyKey) -> Option<PropertyDescriptor> {
        value.as_object().and_then(|o| o.borrow().get_own(key).cloned())
    }

    fn prototype_of(&self, value: &HostValue) -> Option<HostValue> {
        value.as_object().and_then(|o| o.borrow().prototype.clone())
    }

    fn extensibility(&self, value: &HostValue) -> ExtensibilityState {
        value.as_object().map(|o| o.borrow().extensibility).unwrap_or(ExtensibilityState::Frozen)
    }
}

/// Reads one element out of a typed-array view's backing buffer, `None` if
/// `index` is out of bounds (mirrors a real engine's `undefined` result
/// rather than throwing).
fn read_buffer_view_element(view: &BufferViewData, index: usize) -> Option<HostValue> {
    if index >= view.length {
        return None;
    }
    let obj = view.buffer.as_object()?;
    let b = obj.borrow();
    let ObjectKind::Buffer(buf) = &b.kind else { return None };
    let size = view.element_kind.byte_size();
    let start = view.byte_offset + index * size;
    let bytes = buf.bytes.borrow();
    if start + size > bytes.len() {
        return None;
    }
    Some(view.element_kind.read(&bytes[start..start + size]))
}

/// Silently ignores an out-of-bounds index, matching a real typed array's
/// no-op write rather than throwing.
fn write_buffer_view_element(view: &BufferViewData, index: usize, value: &HostValue) {
    if index >= view.length {
        return;
    }
    let Some(obj) = view.buffer.as_object() else { return };
    let b = obj.borrow();
    let ObjectKind::Buffer(buf) = &b.kind else { return };
    let size = view.element_kind.byte_size();
    let start = view.byte_offset + index * size;
    let mut bytes = buf.bytes.borrow_mut();
    if start + size > bytes.len() {
        return;
    }
    view.element_kind.write(&mut bytes[start..start + size], value);
}

/// Property resolution for a primitive string, without a real boxed
/// `String` wrapper object: just enough (`length`, indexed character
/// access, `charCodeAt`) for the base64-literal decode idiom to evaluate.
fn string_property(s: &Rc<str>, key: &PropertyKey) -> HostValue {
    if let Some(index) = key.as_array_index() {
        return s.chars().nth(index).map(|c| HostValue::String(Rc::from(c.to_string()))).unwrap_or(HostValue::Undefined);
    }
    let PropertyKey::String(name) = key else { return HostValue::Undefined };
    match &**name {
        "length" => HostValue::Number(s.chars().count() as f64),
        "charCodeAt" => {
            let owner = s.clone();
            HostValue::object(
                ObjectKind::Native(NativeFunctionData {
                    name: Rc::from("charCodeAt"),
                    call: Rc::new(move |_host, _this, args| {
                        let index = match args.first() {
                            Some(HostValue::Number(n)) => *n as usize,
                            _ => 0,
                        };
                        Ok(owner
                            .chars()
                            .nth(index)
                            .map(|c| HostValue::Number(c as u32 as f64))
                            .unwrap_or(HostValue::Number(f64::NAN)))
                    }),
                }),
                None,
            )
        }
        _ => HostValue::Undefined,
    }
}

#[allow(unused)]
fn _diagnostic_type_check(_: Diagnostic) {}

#[cfg(test)]
#[path = "../../tests/tree_walk.rs"]
mod tests;
