//! Lexical environments for the tree-walking evaluator. One `Environment`
//! per activation of a scope the scope analyzer would also give a `Scope`
//! to; escaping ones get a tracker `FrameId` lazily, assigned the
//! first time a closure actually captures them (mirrors the instrumenter's
//! own escape-analysis-lite optimization).

use crate::value::HostValue;
use revive_common::{Atom, Interner};
use revive_tracker::FrameId;
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub struct Binding {
    pub value: HostValue,
    pub mutable: bool,
}

pub struct Environment {
    pub parent: Option<Rc<Environment>>,
    /// The interner `bindings`' `Atom` keys are indices into. Inherited
    /// from the defining program at the root/function boundary and shared
    /// down the chain, so a `FrameId`'s bindings can later be resolved back
    /// to names without the value-graph builder having to thread a program
    /// reference alongside every `Environment` (revive-graph's builder
    /// only ever sees a `FrameId`, via `Host::frame_bindings`).
    pub interner: Rc<Interner>,
    bindings: RefCell<FxHashMap<Atom, Binding>>,
    /// Set for function-boundary environments only; `None` for ordinary
    /// block/catch/with environments, which defer to the nearest function
    /// environment for `this`/`arguments`/`new.target`.
    pub this_value: Option<HostValue>,
    pub arguments_object: Option<HostValue>,
    pub new_target: Option<HostValue>,
    /// The superclass's prototype, for `super.prop` inside a method/
    /// constructor body (analogous to a real engine's `[[HomeObject]]`
    /// slot, scoped to the environment rather than the function value so
    /// ordinary lookup walks it the same way as `this`).
    pub super_prototype: Option<HostValue>,
    /// The superclass constructor itself, for a derived constructor's
    /// `super(...)` call.
    pub super_constructor: Option<HostValue>,
    pub is_with: bool,
    pub with_object: Option<HostValue>,
    frame: Cell<Option<FrameId>>,
}

impl Environment {
    pub fn root(interner: Rc<Interner>) -> Rc<Environment> {
        Rc::new(Environment {
            parent: None,
            interner,
            bindings: RefCell::new(FxHashMap::default()),
            this_value: Some(HostValue::Undefined),
            arguments_object: None,
            new_target: None,
            super_prototype: None,
            super_constructor: None,
            is_with: false,
            with_object: None,
            frame: Cell::new(None),
        })
    }

    pub fn child(parent: &Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            parent: Some(parent.clone()),
            interner: parent.interner.clone(),
            bindings: RefCell::new(FxHashMap::default()),
            this_value: None,
            arguments_object: None,
            new_target: None,
            super_prototype: None,
            super_constructor: None,
            is_with: false,
            with_object: None,
            frame: Cell::new(None),
        })
    }

    pub fn function_boundary(
        parent: &Rc<Environment>,
        this_value: HostValue,
        arguments_object: Option<HostValue>,
        new_target: Option<HostValue>,
    ) -> Rc<Environment> {
        Rc::new(Environment {
            parent: Some(parent.clone()),
            interner: parent.interner.clone(),
            bindings: RefCell::new(FxHashMap::default()),
            this_value: Some(this_value),
            arguments_object,
            new_target,
            super_prototype: None,
            super_constructor: None,
            is_with: false,
            with_object: None,
            frame: Cell::new(None),
        })
    }

    /// Same as [`Environment::function_boundary`] but for a class
    /// method/constructor body, which additionally carries its home
    /// object's super binding.
    #[allow(clippy::too_many_arguments)]
    pub fn method_boundary(
        parent: &Rc<Environment>,
        this_value: HostValue,
        arguments_object: Option<HostValue>,
        new_target: Option<HostValue>,
        super_prototype: Option<HostValue>,
        super_constructor: Option<HostValue>,
    ) -> Rc<Environment> {
        Rc::new(Environment {
            parent: Some(parent.clone()),
            interner: parent.interner.clone(),
            bindings: RefCell::new(FxHashMap::default()),
            this_value: Some(this_value),
            arguments_object,
            new_target,
            super_prototype,
            super_constructor,
            is_with: false,
            with_object: None,
            frame: Cell::new(None),
        })
    }

    pub fn with_scope(parent: &Rc<Environment>, object: HostValue) -> Rc<Environment> {
        Rc::new(Environment {
            parent: Some(parent.clone()),
            interner: parent.interner.clone(),
            bindings: RefCell::new(FxHashMap::default()),
            this_value: None,
            arguments_object: None,
            new_target: None,
            super_prototype: None,
            super_constructor: None,
            is_with: true,
            with_object: Some(object),
            frame: Cell::new(None),
        })
    }

    pub fn declare(&self, name: Atom, value: HostValue, mutable: bool) {
        self.bindings.borrow_mut().insert(name, Binding { value, mutable });
    }

    pub fn get(self: &Rc<Self>, name: Atom) -> Option<HostValue> {
        if let Some(b) = self.bindings.borrow().get(&name) {
            return Some(b.value.clone());
        }
        match &self.parent {
            Some(p) => p.get(name),
            None => None,
        }
    }

    /// `true` if `set` succeeded (the binding exists and is mutable
    /// somewhere up the chain).
    pub fn set(self: &Rc<Self>, name: Atom, value: HostValue) -> bool {
        if let Some(b) = self.bindings.borrow_mut().get_mut(&name) {
            if !b.mutable {
                return false;
            }
            b.value = value;
            return true;
        }
        match &self.parent {
            Some(p) => p.set(name, value),
            None => false,
        }
    }

    pub fn has_own(&self, name: Atom) -> bool {
        self.bindings.borrow().contains_key(&name)
    }

    /// Every binding declared directly in this environment (not walking
    /// `parent`), resolved to text against `self.interner` — the shape
    /// `Host::frame_bindings` hands the value graph builder for one scope
    /// frame.
    pub fn own_bindings(&self) -> Vec<(Rc<str>, HostValue, bool)> {
        self.bindings
            .borrow()
            .iter()
            .map(|(&name, b)| (Rc::from(self.interner.resolve(name)), b.value.clone(), b.mutable))
            .collect()
    }

    /// Nearest enclosing function-boundary environment's `this` (arrows
    /// have no environment of their own kind; this walks past them).
    pub fn resolve_this(self: &Rc<Self>) -> HostValue {
        let mut current = self.clone();
        loop {
            if let Some(this) = &current.this_value {
                return this.clone();
            }
            match &current.parent {
                Some(p) => current = p.clone(),
                None => return HostValue::Undefined,
            }
        }
    }

    pub fn resolve_arguments(self: &Rc<Self>) -> Option<HostValue> {
        let mut current = self.clone();
        loop {
            if current.this_value.is_some() {
                return current.arguments_object.clone();
            }
            match &current.parent {
                Some(p) => current = p.clone(),
                None => return None,
            }
        }
    }

    pub fn resolve_new_target(self: &Rc<Self>) -> HostValue {
        let mut current = self.clone();
        loop {
            if current.this_value.is_some() {
                return current.new_target.clone().unwrap_or(HostValue::Undefined);
            }
            match &current.parent {
                Some(p) => current = p.clone(),
                None => return HostValue::Undefined,
            }
        }
    }

    pub fn resolve_super_prototype(self: &Rc<Self>) -> Option<HostValue> {
        let mut current = self.clone();
        loop {
            if current.this_value.is_some() {
                return current.super_prototype.clone();
            }
            match &current.parent {
                Some(p) => current = p.clone(),
                None => return None,
            }
        }
    }

    pub fn resolve_super_constructor(self: &Rc<Self>) -> Option<HostValue> {
        let mut current = self.clone();
        loop {
            if current.this_value.is_some() {
                return current.super_constructor.clone();
            }
            match &current.parent {
                Some(p) => current = p.clone(),
                None => return None,
            }
        }
    }

    /// Lazily assigns a tracker frame identity to this environment the
    /// first time a closure captures it, matching the escape-analysis-lite
    /// rationale: an environment no closure ever reaches never needs one.
    pub fn frame_id(&self, tracker: &revive_tracker::Tracker) -> FrameId {
        if let Some(id) = self.frame.get() {
            return id;
        }
        let parent_frame = self.parent.as_ref().map(|p| p.frame_id(tracker));
        let id = tracker.register_scope(parent_frame);
        self.frame.set(Some(id));
        id
    }
}
