//! The scope-analyzer pass itself.
//!
//! Two concerns are interleaved per scope: hoisting (what binds where,
//! decided before any reference inside that scope is resolved) and
//! resolution (walking the scope chain for every identifier reference).
//! Declarations are collected before references are resolved so forward
//! references to hoisted `var`/function bindings succeed, matching the
//! host language's own hoisting semantics.

use crate::resolution::{Resolution, Resolutions};
use crate::scope::{BindingKind, Binding, ScopeId, ScopeKind, ScopeTree};
use revive_ast::node::BindingTarget;
use revive_ast::{FunctionFlavor, NodeArena, NodeId, NodeKind, NodeList, VarKind};
use revive_common::{Atom, SourceKind, Strictness};
use rustc_hash::FxHashMap;

pub struct AnalysisResult {
    pub scopes: ScopeTree,
    pub resolutions: Resolutions,
    /// The scope that lexically encloses each resolved identifier reference
    /// (not the scope the reference resolved *into* — `resolutions` already
    /// has that). The instrumenter's escape-analysis-lite pass needs both
    /// ends to tell whether a reference crossed a function boundary to
    /// reach its binding.
    pub occurrence_scopes: FxHashMap<NodeId, ScopeId>,
}

/// `eval_atom` is the caller's interned atom for the literal text `"eval"`,
/// so a call's callee can be compared against it without the analyzer
/// needing write access to the interner.
pub fn analyze(arena: &NodeArena, root: NodeId, source_kind: SourceKind, eval_atom: Atom) -> AnalysisResult {
    let mut tree = ScopeTree::new();
    let mut resolutions = Resolutions::new();
    let mut occurrence_scopes = FxHashMap::default();
    let mut analyzer = Analyzer {
        arena,
        tree: &mut tree,
        resolutions: &mut resolutions,
        occurrence_scopes: &mut occurrence_scopes,
        eval_atom,
    };

    let NodeKind::Program { body } = arena.kind(root) else {
        panic!("analyze() requires a Program root node");
    };
    let starts_strict = source_kind == SourceKind::Module || has_use_strict_directive(arena, body);
    let program_scope = analyzer.tree.push(ScopeKind::Program, None, root, Strictness::from_bool(starts_strict));
    analyzer.hoist_vars_into(body, program_scope);
    analyzer.declare_block_level(body, program_scope);
    for &stmt in body.iter() {
        analyzer.visit(stmt, program_scope);
    }

    AnalysisResult { scopes: tree, resolutions, occurrence_scopes }
}

impl Strictness {
    fn from_bool(strict: bool) -> Self {
        if strict {
            Strictness::Strict
        } else {
            Strictness::Sloppy
        }
    }
}

fn has_use_strict_directive(arena: &NodeArena, body: &NodeList) -> bool {
    for &id in body.iter() {
        match arena.kind(id) {
            NodeKind::Directive { is_use_strict, .. } => {
                if *is_use_strict {
                    return true;
                }
            }
            _ => break,
        }
    }
    false
}

struct Analyzer<'a> {
    arena: &'a NodeArena,
    tree: &'a mut ScopeTree,
    resolutions: &'a mut Resolutions,
    occurrence_scopes: &'a mut FxHashMap<NodeId, ScopeId>,
    eval_atom: Atom,
}

impl<'a> Analyzer<'a> {
    /// Collects `var` bindings reachable from `node` without crossing into a
    /// nested function or class body, and inserts them into `scope` — the
    /// nearest enclosing function/program scope.
    fn hoist_vars_into(&mut self, body: &NodeList, scope: ScopeId) {
        for &id in body.iter() {
            self.hoist_vars_from_stmt(id, scope);
        }
    }

    fn hoist_vars_from_stmt(&mut self, id: NodeId, scope: ScopeId) {
        match self.arena.kind(id) {
            NodeKind::VarDecl { kind: VarKind::Var, declarators } => {
                for (target, _) in declarators {
                    self.bind_target(target, scope, BindingKind::Var, id);
                }
            }
            NodeKind::Block { body } => self.hoist_vars_into(body, scope),
            NodeKind::If { consequent, alternate, .. } => {
                self.hoist_vars_from_stmt(*consequent, scope);
                if let Some(a) = alternate {
                    self.hoist_vars_from_stmt(*a, scope);
                }
            }
            NodeKind::For { init, body, .. } => {
                if let Some(i) = init {
                    self.hoist_vars_from_stmt(*i, scope);
                }
                self.hoist_vars_from_stmt(*body, scope);
            }
            NodeKind::ForIn { left, body, .. } | NodeKind::ForOf { left, body, .. } => {
                self.hoist_vars_from_stmt(*left, scope);
                self.hoist_vars_from_stmt(*body, scope);
            }
            NodeKind::While { body, .. } | NodeKind::DoWhile { body, .. } => {
                self.hoist_vars_from_stmt(*body, scope);
            }
            NodeKind::Try { block, handler, finalizer } => {
                self.hoist_vars_from_stmt(*block, scope);
                if let Some((_, body)) = handler {
                    self.hoist_vars_from_stmt(*body, scope);
                }
                if let Some(f) = finalizer {
                    self.hoist_vars_from_stmt(*f, scope);
                }
            }
            NodeKind::Switch { cases, .. } => {
                for (_, body) in cases {
                    self.hoist_vars_into(body, scope);
                }
            }
            NodeKind::Labeled { body, .. } => self.hoist_vars_from_stmt(*body, scope),
            NodeKind::With { body, .. } => self.hoist_vars_from_stmt(*body, scope),
            // Function/class bodies own their vars; do not cross into them.
            _ => {}
        }
    }

    /// Binds the let/const/function/class declarations written directly at
    /// this block's own statement list (not hoisted, not descended into).
    fn declare_block_level(&mut self, body: &NodeList, scope: ScopeId) {
        for &id in body.iter() {
            match self.arena.kind(id) {
                NodeKind::VarDecl { kind: var_kind @ (VarKind::Let | VarKind::Const), declarators } => {
                    let binding_kind = if *var_kind == VarKind::Const { BindingKind::Const } else { BindingKind::Let };
                    for (target, _) in declarators {
                        self.bind_target(target, scope, binding_kind, id);
                    }
                }
                NodeKind::Function(f) => {
                    if let Some(name) = f.name {
                        if f.flavor == FunctionFlavor::Plain || f.flavor == FunctionFlavor::Generator || f.flavor == FunctionFlavor::Async || f.flavor == FunctionFlavor::AsyncGenerator {
                            self.tree.get_mut(scope).bindings.insert(name, Binding { kind: BindingKind::FunctionDeclaration, declared_at: id });
                        }
                    }
                }
                NodeKind::Class(c) => {
                    if let Some(name) = c.name {
                        self.tree.get_mut(scope).bindings.insert(name, Binding { kind: BindingKind::ClassDeclaration, declared_at: id });
                    }
                }
                _ => {}
            }
        }
    }

    fn bind_target(&mut self, target: &BindingTarget, scope: ScopeId, kind: BindingKind, declared_at: NodeId) {
        match target {
            BindingTarget::Identifier(name) => {
                self.tree.get_mut(scope).bindings.insert(*name, Binding { kind, declared_at });
            }
            BindingTarget::Pattern(pattern) => self.bind_pattern(*pattern, scope, kind, declared_at),
        }
    }

    fn bind_pattern(&mut self, pattern: NodeId, scope: ScopeId, kind: BindingKind, declared_at: NodeId) {
        match self.arena.kind(pattern) {
            NodeKind::Identifier(name) => {
                self.tree.get_mut(scope).bindings.insert(*name, Binding { kind, declared_at });
            }
            NodeKind::ArrayPattern { elements } => {
                for &el in elements.iter() {
                    self.bind_pattern(el, scope, kind, declared_at);
                }
            }
            NodeKind::ObjectPattern { properties, rest } => {
                for p in properties {
                    self.bind_pattern(p.value, scope, kind, declared_at);
                }
                if let Some(r) = rest {
                    self.bind_pattern(*r, scope, kind, declared_at);
                }
            }
            NodeKind::AssignmentPattern { target, .. } => self.bind_pattern(*target, scope, kind, declared_at),
            NodeKind::RestElement { argument } => self.bind_pattern(*argument, scope, kind, declared_at),
            _ => {}
        }
    }

    fn visit(&mut self, id: NodeId, scope: ScopeId) {
        let node = self.arena.get(id);
        match &node.kind {
            NodeKind::Identifier(name) => self.resolve_identifier(id, *name, scope),
            NodeKind::ThisExpr | NodeKind::SuperExpr | NodeKind::Literal(_) | NodeKind::Empty | NodeKind::Debugger | NodeKind::Directive { .. } | NodeKind::MetaProperty { .. } | NodeKind::Break { .. } | NodeKind::Continue { .. } => {}
            NodeKind::Call { callee, arguments, .. } => {
                if let NodeKind::Identifier(name) = self.arena.kind(*callee) {
                    if self.is_plain_eval_reference(*name, scope) {
                        self.tree.get_mut(scope).has_direct_eval = true;
                        self.resolutions.insert(*callee, Resolution::Free(*name));
                    } else {
                        self.visit(*callee, scope);
                    }
                } else {
                    self.visit(*callee, scope);
                }
                for &a in arguments.iter() {
                    self.visit(a, scope);
                }
            }
            NodeKind::Block { body } => self.visit_block(id, body, scope),
            NodeKind::Function(_) => self.visit_function(id, scope),
            NodeKind::Class(_) => self.visit_class(id, scope),
            NodeKind::Try { block, handler, finalizer } => {
                self.visit(*block, scope);
                if let Some((binding, body)) = handler {
                    let catch_scope = self.tree.push(ScopeKind::Catch, Some(scope), id, self.tree.get(scope).strict);
                    if let Some(target) = binding {
                        self.bind_target(target, catch_scope, BindingKind::CatchParam, id);
                    }
                    self.visit(*body, catch_scope);
                }
                if let Some(f) = finalizer {
                    self.visit(*f, scope);
                }
            }
            NodeKind::With { object, body } => {
                self.visit(*object, scope);
                self.tree.get_mut(scope).has_with = true;
                let with_scope = self.tree.push(ScopeKind::With, Some(scope), id, self.tree.get(scope).strict);
                self.visit(*body, with_scope);
            }
            _ => {
                for child in revive_ast::visit::children(&node.kind) {
                    self.visit(child, scope);
                }
            }
        }
    }

    fn visit_block(&mut self, block_id: NodeId, body: &NodeList, scope: ScopeId) {
        let needs_own_scope = body.iter().any(|&id| {
            matches!(
                self.arena.kind(id),
                NodeKind::VarDecl { kind: VarKind::Let | VarKind::Const, .. } | NodeKind::Class(_)
            )
        });
        let block_scope = if needs_own_scope {
            let s = self.tree.push(ScopeKind::Block, Some(scope), block_id, self.tree.get(scope).strict);
            self.declare_block_level(body, s);
            s
        } else {
            scope
        };
        for &stmt in body.iter() {
            self.visit(stmt, block_scope);
        }
    }

    fn is_plain_eval_reference(&self, name: Atom, scope: ScopeId) -> bool {
        // "eval" used as a call callee that is not shadowed by any binding.
        name == self.eval_atom && self.tree.resolve(scope, name).is_none()
    }

    fn resolve_identifier(&mut self, id: NodeId, name: Atom, scope: ScopeId) {
        let resolution = match self.tree.resolve(scope, name) {
            Some(defining_scope) => Resolution::Bound { scope: defining_scope, name },
            None => Resolution::Free(name),
        };
        self.resolutions.insert(id, resolution);
        self.occurrence_scopes.insert(id, scope);
    }

    fn visit_function(&mut self, id: NodeId, scope: ScopeId) {
        let NodeKind::Function(f) = self.arena.kind(id) else { unreachable!() };
        let own_strict = self.tree.get(scope).strict.is_strict()
            || is_function_body_strict(self.arena, f.body);
        let fn_scope = self.tree.push(ScopeKind::Function, Some(scope), id, Strictness::from_bool(own_strict));

        if let Some(name) = f.name {
            if !f.flavor.is_arrow() {
                // A named function expression's own name is visible only
                // inside its own body.
                self.tree.get_mut(fn_scope).bindings.insert(name, Binding { kind: BindingKind::FunctionDeclaration, declared_at: id });
            }
        }
        for &p in f.params.iter() {
            self.bind_pattern(p, fn_scope, BindingKind::Param, id);
        }
        for &p in f.params.iter() {
            self.visit(p, fn_scope);
        }
        if f.is_concise_arrow_body {
            self.visit(f.body, fn_scope);
        } else if let NodeKind::Block { body } = self.arena.kind(f.body) {
            let body = body.clone();
            self.hoist_vars_into(&body, fn_scope);
            self.declare_block_level(&body, fn_scope);
            for &stmt in body.iter() {
                self.visit(stmt, fn_scope);
            }
        }
    }

    fn visit_class(&mut self, id: NodeId, scope: ScopeId) {
        let NodeKind::Class(c) = self.arena.kind(id) else { unreachable!() };
        // Classes (methods, `extends` clause) are always strict.
        let class_scope = self.tree.push(ScopeKind::Class, Some(scope), id, Strictness::Strict);
        if let Some(name) = c.name {
            self.tree.get_mut(class_scope).bindings.insert(name, Binding { kind: BindingKind::ClassDeclaration, declared_at: id });
        }
        if let Some(sup) = c.super_class {
            self.visit(sup, class_scope);
        }
        let members = c.members.clone();
        for member in &members {
            if member.computed {
                let key_scope = self.tree.push(ScopeKind::ComputedClassKey, Some(class_scope), id, Strictness::Strict);
                self.visit(member.key, key_scope);
            }
            if let Some(value) = member.value {
                self.visit(value, class_scope);
            }
        }
    }
}

fn is_function_body_strict(arena: &NodeArena, body: NodeId) -> bool {
    match arena.kind(body) {
        NodeKind::Block { body } => has_use_strict_directive(arena, body),
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/analyzer.rs"]
mod tests;
