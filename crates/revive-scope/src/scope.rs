//! The scope tree itself: one `Scope` per program, function body, `catch`
//! clause, block that declares a block-scoped binding, class body, `with`
//! statement, and computed class-member key.

use revive_ast::NodeId;
use revive_common::{Atom, Strictness};
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Function,
    Block,
    Catch,
    Class,
    With,
    /// Class keys execute in an intermediate environment.
    ComputedClassKey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Param,
    FunctionDeclaration,
    ClassDeclaration,
    CatchParam,
}

impl BindingKind {
    /// `var` and hoisted function declarations attach to the nearest
    /// function/program scope rather than the innermost block.
    pub fn is_function_scoped(self) -> bool {
        matches!(self, BindingKind::Var | BindingKind::FunctionDeclaration)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Binding {
    pub kind: BindingKind,
    /// The node that introduced the binding (declarator, parameter, etc).
    pub declared_at: NodeId,
}

pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub declaration_site: NodeId,
    pub bindings: FxHashMap<Atom, Binding>,
    pub strict: Strictness,
    /// Contains an identifier reference named `eval` used as a call
    /// callee, unshadowed. Defeats static resolution of
    /// every free name reachable from inside it.
    pub has_direct_eval: bool,
    /// Contains a `with` statement. Likewise defeats static
    /// resolution for names free at that point.
    pub has_with: bool,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>, declaration_site: NodeId, strict: Strictness) -> Self {
        Scope {
            kind,
            parent,
            declaration_site,
            bindings: FxHashMap::default(),
            strict,
            has_direct_eval: false,
            has_with: false,
        }
    }
}

#[derive(Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ScopeKind, parent: Option<ScopeId>, declaration_site: NodeId, strict: Strictness) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, parent, declaration_site, strict));
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// The nearest enclosing scope (inclusive) that is a function body or
    /// the program scope — where `var`/function declarations hoist to.
    pub fn nearest_function_or_program(&self, mut from: ScopeId) -> ScopeId {
        loop {
            let scope = self.get(from);
            if matches!(scope.kind, ScopeKind::Function | ScopeKind::Program) {
                return from;
            }
            match scope.parent {
                Some(p) => from = p,
                None => return from,
            }
        }
    }

    /// Walk from `from` up to (and including) the program scope, looking for
    /// `name`. Returns the defining scope if found.
    pub fn resolve(&self, from: ScopeId, name: Atom) -> Option<ScopeId> {
        let mut current = Some(from);
        while let Some(id) = current {
            let scope = self.get(id);
            if scope.bindings.contains_key(&name) {
                return Some(id);
            }
            current = scope.parent;
        }
        None
    }

    /// True if any scope from `from` up to and including `upto` contains a
    /// direct `eval` or a `with` — either defeats static resolution of names
    /// free at that point.
    pub fn has_dynamic_scope_between(&self, from: ScopeId, upto: Option<ScopeId>) -> bool {
        let mut current = Some(from);
        while let Some(id) = current {
            if Some(id) == upto {
                break;
            }
            let scope = self.get(id);
            if scope.has_direct_eval || scope.has_with {
                return true;
            }
            current = scope.parent;
        }
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes.iter().enumerate().map(|(i, s)| (ScopeId(i as u32), s))
    }
}
