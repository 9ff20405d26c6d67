//! The tree-walking evaluator itself. Executes the subset of AST shapes the
//! instrumenter understands: functions, arrows, classes,
//! object/array literals, collections and typed buffers via recognized
//! global constructors, `with`, direct `eval`, and ordinary control flow.
//! Generators and `async`/`await` are accepted syntactically (the parser
//! and AST model both represent them) but executed synchronously and
//! without suspension — this reference host exists to exercise capture,
//! not to be a complete engine (see DESIGN.md).

use crate::host::HostError;
use crate::tree_walk::environment::Environment;
use crate::tree_walk::{ProgramData, TreeWalkHost};
use crate::value::*;
use revive_ast::{BindingTarget, Literal, NodeId, NodeKind, PropertyKind, VarKind};
use revive_common::Atom;
use std::cell::RefCell;
use std::rc::Rc;

/// The result of executing a statement: either it ran to completion, or it
/// is unwinding for `return`/`break`/`continue`/an uncaught throw. Modeled
/// as an explicit sum rather than Rust exceptions/panics, matching how the
/// rest of the workspace propagates control via `Result` rather than
/// `panic!`.
pub enum Completion {
    Normal,
    Return(HostValue),
    Break(Option<Atom>),
    Continue(Option<Atom>),
    Throw(HostValue),
}

pub type EvalResult<T> = Result<T, HostError>;
pub type StmtResult = Result<Completion, HostError>;

pub struct Exec<'a> {
    pub host: &'a TreeWalkHost,
    pub program: &'a Rc<ProgramData>,
}

impl<'a> Exec<'a> {
    pub fn arena(&self) -> &revive_ast::NodeArena {
        &self.program.arena
    }

    pub fn text(&self, atom: Atom) -> Rc<str> {
        Rc::from(self.program.interner.resolve(atom))
    }

    /// `true` if `node` is an identifier or plain string literal key naming
    /// `expected` — used to spot the `constructor` method among class
    /// members without needing a reserved atom threaded through.
    pub fn is_identifier_named(&self, node: NodeId, expected: &str) -> bool {
        match self.arena().kind(node) {
            NodeKind::Identifier(name) => self.text(*name).as_ref() == expected,
            NodeKind::Literal(Literal::String(s)) => self.text(*s).as_ref() == expected,
            _ => false,
        }
    }

    /// Runs a function's block body directly against `env` (its own
    /// parameter/function-boundary scope), without an extra nested block
    /// environment — `var`s in the body must land in the same scope as the
    /// parameters, not one level deeper.
    pub fn run_function_body(&self, body_node: NodeId, env: &Rc<Environment>) -> StmtResult {
        let NodeKind::Block { body } = self.arena().kind(body_node).clone() else {
            return Err(HostError::Evaluation("function body is not a block".into()));
        };
        self.hoist(&body, env)?;
        for &stmt in body.iter() {
            match self.exec_stmt(stmt, env)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal)
    }

    /// Binds call arguments against a parameter list, honoring defaults,
    /// destructuring, and a trailing rest element.
    pub fn bind_parameters(&self, params: &revive_ast::NodeList, args: &[HostValue], env: &Rc<Environment>) -> EvalResult<()> {
        for (i, &p) in params.iter().enumerate() {
            if let NodeKind::RestElement { argument } = self.arena().kind(p) {
                let rest_values = if i < args.len() { args[i..].to_vec() } else { Vec::new() };
                let rest = self.new_array(rest_values);
                self.bind_pattern_node(*argument, rest, env, true)?;
                break;
            }
            let value = args.get(i).cloned().unwrap_or(HostValue::Undefined);
            self.bind_pattern_node(p, value, env, true)?;
        }
        Ok(())
    }

    pub fn run_program(&self, root: NodeId, env: &Rc<Environment>) -> EvalResult<HostValue> {
        let NodeKind::Program { body } = self.arena().kind(root) else {
            return Err(HostError::Evaluation("root is not a Program node".into()));
        };
        let body = body.clone();
        self.hoist(&body, env)?;
        let mut last = HostValue::Undefined;
        for &stmt in body.iter() {
            match self.exec_stmt(stmt, env)? {
                Completion::Normal => {
                    if let NodeKind::ExpressionStmt { expression } = self.arena().kind(stmt) {
                        last = self.eval_expr(*expression, env)?;
                    }
                }
                Completion::Return(v) => return Ok(v),
                Completion::Throw(v) => return Err(HostError::Evaluation(format!("uncaught exception: {v:?}"))),
                Completion::Break(_) | Completion::Continue(_) => {
                    return Err(HostError::Evaluation("break/continue outside a loop".into()))
                }
            }
        }
        Ok(last)
    }

    /// Hoists `var` and function declarations to the top of `body` before
    /// executing any statement, matching the host's own hoisting semantics.
    fn hoist(&self, body: &revive_ast::NodeList, env: &Rc<Environment>) -> EvalResult<()> {
        for &id in body.iter() {
            self.hoist_stmt(id, env)?;
        }
        Ok(())
    }

    fn hoist_stmt(&self, id: NodeId, env: &Rc<Environment>) -> EvalResult<()> {
        match self.arena().kind(id) {
            NodeKind::VarDecl { kind: VarKind::Var, declarators } => {
                for (target, _) in declarators.clone() {
                    self.hoist_pattern(&target, env);
                }
            }
            NodeKind::Function(f) if !f.flavor.is_arrow() => {
                if let Some(name) = f.name {
                    let value = self.make_closure(id, env)?;
                    env.declare(name, value, true);
                }
            }
            NodeKind::Block { body } => self.hoist(&body.clone(), env)?,
            NodeKind::If { consequent, alternate, .. } => {
                self.hoist_stmt(*consequent, env)?;
                if let Some(a) = alternate {
                    self.hoist_stmt(*a, env)?;
                }
            }
            NodeKind::For { body, .. } | NodeKind::ForIn { body, .. } | NodeKind::ForOf { body, .. } => {
                self.hoist_stmt(*body, env)?
            }
            NodeKind::While { body, .. } | NodeKind::DoWhile { body, .. } => self.hoist_stmt(*body, env)?,
            NodeKind::Try { block, handler, finalizer } => {
                self.hoist_stmt(*block, env)?;
                if let Some((_, body)) = handler {
                    self.hoist_stmt(*body, env)?;
                }
                if let Some(f) = finalizer {
                    self.hoist_stmt(*f, env)?;
                }
            }
            NodeKind::Labeled { body, .. } => self.hoist_stmt(*body, env)?,
            _ => {}
        }
        Ok(())
    }

    fn hoist_pattern(&self, target: &BindingTarget, env: &Rc<Environment>) {
        match target {
            BindingTarget::Identifier(name) => {
                if !env.has_own(*name) {
                    env.declare(*name, HostValue::Undefined, true);
                }
            }
            BindingTarget::Pattern(p) => self.hoist_pattern_node(*p, env),
        }
    }

    fn hoist_pattern_node(&self, pattern: NodeId, env: &Rc<Environment>) {
        match self.arena().kind(pattern) {
            NodeKind::Identifier(name) => {
                if !env.has_own(*name) {
                    env.declare(*name, HostValue::Undefined, true);
                }
            }
            NodeKind::ArrayPattern { elements } => {
                for &el in elements.iter() {
                    self.hoist_pattern_node(el, env);
                }
            }
            NodeKind::ObjectPattern { properties, rest } => {
                for p in properties {
                    self.hoist_pattern_node(p.value, env);
                }
                if let Some(r) = rest {
                    self.hoist_pattern_node(*r, env);
                }
            }
            NodeKind::AssignmentPattern { target, .. } => self.hoist_pattern_node(*target, env),
            NodeKind::RestElement { argument } => self.hoist_pattern_node(*argument, env),
            _ => {}
        }
    }

    fn exec_block(&self, body: &revive_ast::NodeList, env: &Rc<Environment>) -> StmtResult {
        let block_env = Environment::child(env);
        self.hoist(body, &block_env)?;
        for &stmt in body.iter() {
            match self.exec_stmt(stmt, &block_env)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_stmt(&self, id: NodeId, env: &Rc<Environment>) -> StmtResult {
        let kind = self.arena().kind(id).clone();
        match kind {
            NodeKind::Empty | NodeKind::Debugger | NodeKind::Directive { .. } => Ok(Completion::Normal),
            NodeKind::ExpressionStmt { expression } => {
                self.eval_expr(expression, env)?;
                Ok(Completion::Normal)
            }
            NodeKind::Block { body } => self.exec_block(&body, env),
            NodeKind::VarDecl { kind: var_kind, declarators } => {
                for (target, init) in declarators {
                    let value = match init {
                        Some(expr) => self.eval_expr(expr, env)?,
                        None => HostValue::Undefined,
                    };
                    self.bind_pattern(&target, value, env, var_kind != VarKind::Var)?;
                }
                Ok(Completion::Normal)
            }
            NodeKind::Function(_) => Ok(Completion::Normal), // handled by hoist
            NodeKind::Class(_) => {
                let value = self.eval_expr(id, env)?;
                if let NodeKind::Class(c) = self.arena().kind(id) {
                    if let Some(name) = c.name {
                        env.declare(name, value, true);
                    }
                }
                Ok(Completion::Normal)
            }
            NodeKind::If { test, consequent, alternate } => {
                if self.eval_expr(test, env)?.truthy() {
                    self.exec_stmt(consequent, env)
                } else if let Some(a) = alternate {
                    self.exec_stmt(a, env)
                } else {
                    Ok(Completion::Normal)
                }
            }
            NodeKind::While { test, body } => {
                while self.eval_expr(test, env)?.truthy() {
                    match self.exec_stmt(body, env)? {
                        Completion::Break(_) => break,
                        Completion::Continue(_) => continue,
                        Completion::Normal => {}
                        other => return Ok(other),
                    }
                }
                Ok(Completion::Normal)
            }
            NodeKind::DoWhile { test, body } => {
                loop {
                    match self.exec_stmt(body, env)? {
                        Completion::Break(_) => break,
                        Completion::Continue(_) => {}
                        Completion::Normal => {}
                        other => return Ok(other),
                    }
                    if !self.eval_expr(test, env)?.truthy() {
                        break;
                    }
                }
                Ok(Completion::Normal)
            }
            NodeKind::For { init, test, update, body } => {
                let loop_env = Environment::child(env);
                if let Some(i) = init {
                    match self.arena().kind(i).clone() {
                        NodeKind::VarDecl { .. } => {
                            self.exec_stmt(i, &loop_env)?;
                        }
                        _ => {
                            self.eval_expr(i, &loop_env)?;
                        }
                    }
                }
                loop {
                    if let Some(t) = test {
                        if !self.eval_expr(t, &loop_env)?.truthy() {
                            break;
                        }
                    }
                    match self.exec_stmt(body, &loop_env)? {
                        Completion::Break(_) => break,
                        Completion::Continue(_) => {}
                        Completion::Normal => {}
                        other => return Ok(other),
                    }
                    if let Some(u) = update {
                        self.eval_expr(u, &loop_env)?;
                    }
                }
                Ok(Completion::Normal)
            }
            NodeKind::ForOf { left, right, body, .. } => {
                let iterable = self.eval_expr(right, env)?;
                for item in self.iterate(&iterable)? {
                    let loop_env = Environment::child(env);
                    self.bind_for_target(&left, item, &loop_env)?;
                    match self.exec_stmt(body, &loop_env)? {
                        Completion::Break(_) => break,
                        Completion::Continue(_) => continue,
                        Completion::Normal => {}
                        other => return Ok(other),
                    }
                }
                Ok(Completion::Normal)
            }
            NodeKind::ForIn { left, right, body } => {
                let obj = self.eval_expr(right, env)?;
                let keys = self.enumerable_string_keys(&obj);
                for key in keys {
                    let loop_env = Environment::child(env);
                    self.bind_for_target(&left, HostValue::String(key), &loop_env)?;
                    match self.exec_stmt(body, &loop_env)? {
                        Completion::Break(_) => break,
                        Completion::Continue(_) => continue,
                        Completion::Normal => {}
                        other => return Ok(other),
                    }
                }
                Ok(Completion::Normal)
            }
            NodeKind::Break { label } => Ok(Completion::Break(label)),
            NodeKind::Continue { label } => Ok(Completion::Continue(label)),
            NodeKind::Return { argument } => {
                let value = match argument {
                    Some(a) => self.eval_expr(a, env)?,
                    None => HostValue::Undefined,
                };
                Ok(Completion::Return(value))
            }
            NodeKind::Throw { argument } => Ok(Completion::Throw(self.eval_expr(argument, env)?)),
            NodeKind::Try { block, handler, finalizer } => {
                let result = self.exec_stmt(block, env);
                let after_catch = match result {
                    Ok(Completion::Throw(err)) => {
                        if let Some((binding, catch_body)) = handler {
                            let catch_env = Environment::child(env);
                            if let Some(target) = binding {
                                self.bind_pattern(&target, err, &catch_env, true)?;
                            }
                            self.exec_stmt(catch_body, &catch_env)
                        } else {
                            Ok(Completion::Throw(err))
                        }
                    }
                    other => other,
                };
                if let Some(f) = finalizer {
                    match self.exec_stmt(f, env)? {
                        Completion::Normal => after_catch,
                        other => Ok(other),
                    }
                } else {
                    after_catch
                }
            }
            NodeKind::With { object, body } => {
                let obj = self.eval_expr(object, env)?;
                let with_env = Environment::with_scope(env, obj);
                self.exec_stmt(body, &with_env)
            }
            NodeKind::Labeled { label, body } => match self.exec_stmt(body, env)? {
                Completion::Break(Some(l)) if l == label => Ok(Completion::Normal),
                Completion::Continue(Some(l)) if l == label => Ok(Completion::Normal),
                other => Ok(other),
            },
            NodeKind::Switch { discriminant, cases } => {
                let value = self.eval_expr(discriminant, env)?;
                let switch_env = Environment::child(env);
                let mut matched = false;
                for (test, body) in &cases {
                    if !matched {
                        matched = match test {
                            Some(t) => strict_equals(&value, &self.eval_expr(*t, &switch_env)?),
                            None => false,
                        };
                    }
                    if matched {
                        for &stmt in body.iter() {
                            match self.exec_stmt(stmt, &switch_env)? {
                                Completion::Break(None) => return Ok(Completion::Normal),
                                Completion::Normal => {}
                                other => return Ok(other),
                            }
                        }
                    }
                }
                if !matched {
                    if let Some((None, body)) = cases.iter().find(|(t, _)| t.is_none()) {
                        for &stmt in body.iter() {
                            match self.exec_stmt(stmt, &switch_env)? {
                                Completion::Break(None) => return Ok(Completion::Normal),
                                Completion::Normal => {}
                                other => return Ok(other),
                            }
                        }
                    }
                }
                Ok(Completion::Normal)
            }
            other => Err(HostError::Unsupported(format!("statement {other:?} is not executable by the reference host"))),
        }
    }

    fn bind_for_target(&self, left: &NodeId, value: HostValue, env: &Rc<Environment>) -> EvalResult<()> {
        match self.arena().kind(*left).clone() {
            NodeKind::VarDecl { declarators, .. } => {
                let (target, _) = declarators.into_iter().next().expect("for-of/for-in left has one declarator");
                self.bind_pattern(&target, value, env, true)?;
            }
            NodeKind::Identifier(name) => {
                if !env.set(name, value.clone()) {
                    env.declare(name, value, true);
                }
            }
            _ => return Err(HostError::Unsupported("destructuring for-of/for-in target".into())),
        }
        Ok(())
    }

    fn bind_pattern(&self, target: &BindingTarget, value: HostValue, env: &Rc<Environment>, as_new: bool) -> EvalResult<()> {
        match target {
            BindingTarget::Identifier(name) => {
                if as_new {
                    env.declare(*name, value, true);
                } else if !env.set(*name, value.clone()) {
                    env.declare(*name, value, true);
                }
                Ok(())
            }
            BindingTarget::Pattern(p) => self.bind_pattern_node(*p, value, env, as_new),
        }
    }

    pub fn bind_pattern_node(&self, pattern: NodeId, value: HostValue, env: &Rc<Environment>, as_new: bool) -> EvalResult<()> {
        match self.arena().kind(pattern).clone() {
            NodeKind::Identifier(name) => {
                if as_new {
                    env.declare(name, value, true);
                } else if !env.set(name, value.clone()) {
                    env.declare(name, value, true);
                }
                Ok(())
            }
            NodeKind::ArrayPattern { elements } => {
                let items = self.iterate(&value)?;
                for (i, &el) in elements.iter().enumerate() {
                    if matches!(self.arena().kind(el), NodeKind::RestElement { .. }) {
                        let NodeKind::RestElement { argument } = self.arena().kind(el) else { unreachable!() };
                        let rest = self.new_array(items[i.min(items.len())..].to_vec());
                        self.bind_pattern_node(*argument, rest, env, as_new)?;
                        break;
                    }
                    let item = items.get(i).cloned().unwrap_or(HostValue::Undefined);
                    self.bind_pattern_node(el, item, env, as_new)?;
                }
                Ok(())
            }
            NodeKind::ObjectPattern { properties, rest } => {
                let mut taken = Vec::new();
                for p in &properties {
                    let key = self.property_key_of(p.key, p.computed, env)?;
                    taken.push(key.clone());
                    let v = self.get_property(&value, &key)?;
                    self.bind_pattern_node(p.value, v, env, as_new)?;
                }
                if let Some(r) = rest {
                    if let Some(obj) = value.as_object() {
                        let leftover = ObjectData {
                            kind: ObjectKind::Plain,
                            properties: obj
                                .borrow()
                                .properties
                                .iter()
                                .filter(|(k, _)| !taken.contains(k))
                                .map(|(k, v)| (k.clone(), v.clone()))
                                .collect(),
                            prototype: None,
                            extensibility: ExtensibilityState::Extensible,
                        };
                        self.bind_pattern_node(r, HostValue::Object(Rc::new(RefCell::new(leftover))), env, as_new)?;
                    }
                }
                Ok(())
            }
            NodeKind::AssignmentPattern { target, default } => {
                let value = if matches!(value, HostValue::Undefined) { self.eval_expr(default, env)? } else { value };
                self.bind_pattern_node(target, value, env, as_new)
            }
            NodeKind::RestElement { argument } => self.bind_pattern_node(argument, value, env, as_new),
            _ => Err(HostError::Unsupported("binding pattern shape".into())),
        }
    }

    pub fn eval_expr(&self, id: NodeId, env: &Rc<Environment>) -> EvalResult<HostValue> {
        let kind = self.arena().kind(id).clone();
        match kind {
            NodeKind::Literal(lit) => Ok(self.eval_literal(&lit)),
            NodeKind::Identifier(name) => self.resolve_identifier(name, env),
            NodeKind::ThisExpr => Ok(env.resolve_this()),
            NodeKind::MetaProperty { .. } => Ok(env.resolve_new_target()),
            NodeKind::ArrayExpr { elements, .. } => {
                let mut items = Vec::with_capacity(elements.len());
                for &el in elements.iter() {
                    if matches!(self.arena().kind(el), NodeKind::Spread { .. }) {
                        let NodeKind::Spread { argument } = self.arena().kind(el) else { unreachable!() };
                        let spread_value = self.eval_expr(*argument, env)?;
                        items.extend(self.iterate(&spread_value)?);
                    } else {
                        items.push(self.eval_expr(el, env)?);
                    }
                }
                Ok(self.new_array(items))
            }
            NodeKind::ObjectExpr { properties } => self.eval_object_literal(&properties, env),
            NodeKind::TemplateLiteral { quasis, expressions } => {
                let mut out = String::new();
                for (i, quasi) in quasis.iter().enumerate() {
                    out.push_str(&self.text(*quasi));
                    if let Some(&expr) = expressions.get(i) {
                        out.push_str(&to_display_string(&self.eval_expr(expr, env)?));
                    }
                }
                Ok(HostValue::String(Rc::from(out)))
            }
            NodeKind::Function(_) => self.make_closure(id, env),
            NodeKind::Class(_) => self.eval_class(id, env),
            NodeKind::Unary { operator, argument, prefix } => self.eval_unary(operator, argument, prefix, env),
            NodeKind::Binary { operator, left, right } => {
                let l = self.eval_expr(left, env)?;
                let r = self.eval_expr(right, env)?;
                let op = self.text(operator);
                if op.as_ref() == "instanceof" {
                    return Ok(HostValue::Boolean(self.instance_of(&l, &r)?));
                }
                Ok(eval_binary(&op, &l, &r))
            }
            NodeKind::Logical { operator, left, right } => {
                let l = self.eval_expr(left, env)?;
                let op = self.text(operator);
                match op.as_ref() {
                    "&&" => {
                        if l.truthy() {
                            self.eval_expr(right, env)
                        } else {
                            Ok(l)
                        }
                    }
                    "||" => {
                        if l.truthy() {
                            Ok(l)
                        } else {
                            self.eval_expr(right, env)
                        }
                    }
                    "??" => {
                        if matches!(l, HostValue::Undefined | HostValue::Null) {
                            self.eval_expr(right, env)
                        } else {
                            Ok(l)
                        }
                    }
                    _ => Err(HostError::Unsupported(format!("logical operator {op}"))),
                }
            }
            NodeKind::Assignment { operator, target, value } => self.eval_assignment(operator, target, value, env),
            NodeKind::Conditional { test, consequent, alternate } => {
                if self.eval_expr(test, env)?.truthy() {
                    self.eval_expr(consequent, env)
                } else {
                    self.eval_expr(alternate, env)
                }
            }
            NodeKind::Call { callee, arguments, .. } => {
                if self.is_direct_eval_call(callee, env) {
                    let source = match arguments.first() {
                        Some(&a) => self.eval_expr(a, env)?,
                        None => return Ok(HostValue::Undefined),
                    };
                    return self.host.eval_direct(&source, env);
                }
                self.eval_call(callee, &arguments, env)
            }
            NodeKind::New { callee, arguments } => self.eval_new(callee, &arguments, env),
            NodeKind::Member { object, property, computed, .. } => {
                let obj = self.eval_expr(object, env)?;
                let key = self.property_key_of(property, computed, env)?;
                self.get_property(&obj, &key)
            }
            NodeKind::SuperMember { property, computed } => {
                let this = env.resolve_this();
                let proto = env
                    .resolve_super_prototype()
                    .ok_or_else(|| HostError::Evaluation("'super' keyword is only valid inside a class".into()))?;
                let key = self.property_key_of(property, computed, env)?;
                self.get_property_with_receiver(&proto, &key, &this)
            }
            NodeKind::SuperCall { arguments } => self.eval_super_call(&arguments, env),
            NodeKind::Sequence { expressions } => {
                let mut last = HostValue::Undefined;
                for &e in expressions.iter() {
                    last = self.eval_expr(e, env)?;
                }
                Ok(last)
            }
            NodeKind::Spread { argument } => self.eval_expr(argument, env),
            NodeKind::Await { argument } => self.eval_expr(argument, env),
            NodeKind::Yield { argument, .. } => match argument {
                Some(a) => self.eval_expr(a, env),
                None => Ok(HostValue::Undefined),
            },
            other => Err(HostError::Unsupported(format!("expression {other:?} is not executable by the reference host"))),
        }
    }

    fn eval_literal(&self, lit: &Literal) -> HostValue {
        match lit {
            Literal::Number(n) => HostValue::Number(*n),
            Literal::NegativeZero => HostValue::NegativeZero,
            Literal::String(s) => HostValue::String(self.text(*s)),
            Literal::Boolean(b) => HostValue::Boolean(*b),
            Literal::Null => HostValue::Null,
            Literal::Undefined => HostValue::Undefined,
            Literal::BigInt(digits) => HostValue::BigInt(Rc::from(digits.as_str())),
            Literal::Regex { pattern, flags } => {
                HostValue::object(ObjectKind::Regex { pattern: self.text(*pattern), flags: self.text(*flags) }, None)
            }
        }
    }

    fn resolve_identifier(&self, name: Atom, env: &Rc<Environment>) -> EvalResult<HostValue> {
        // A `with` object's shadowed property wins over the enclosing
        // lexical binding.
        let mut current = env.clone();
        loop {
            if current.is_with {
                if let Some(obj) = &current.with_object {
                    let key = PropertyKey::String(self.text(name));
                    if self.host.has_property(obj, &key) {
                        return self.get_property(obj, &key);
                    }
                }
            }
            if current.has_own(name) {
                return Ok(current.get(name).unwrap());
            }
            match &current.parent {
                Some(p) => current = p.clone(),
                None => break,
            }
        }
        if let Some(global) = self.host.global_binding(&self.text(name)) {
            return Ok(global);
        }
        Err(HostError::Evaluation(format!("`{}` is not defined", self.text(name))))
    }

    fn eval_unary(&self, operator: Atom, argument: NodeId, _prefix: bool, env: &Rc<Environment>) -> EvalResult<HostValue> {
        let op = self.text(operator);
        match op.as_ref() {
            "typeof" => {
                if let NodeKind::Identifier(name) = self.arena().kind(argument) {
                    if self.resolve_identifier(*name, env).is_err() {
                        return Ok(HostValue::String(Rc::from("undefined")));
                    }
                }
                Ok(HostValue::String(Rc::from(self.eval_expr(argument, env)?.type_of())))
            }
            "delete" => {
                if let NodeKind::Member { object, property, computed, .. } = self.arena().kind(argument).clone() {
                    let obj = self.eval_expr(object, env)?;
                    let key = self.property_key_of(property, computed, env)?;
                    Ok(HostValue::Boolean(self.delete_property(&obj, &key)?))
                } else {
                    Ok(HostValue::Boolean(true))
                }
            }
            "void" => {
                self.eval_expr(argument, env)?;
                Ok(HostValue::Undefined)
            }
            "!" => Ok(HostValue::Boolean(!self.eval_expr(argument, env)?.truthy())),
            "-" => match self.eval_expr(argument, env)? {
                HostValue::Number(n) if n == 0.0 => Ok(HostValue::NegativeZero),
                HostValue::NegativeZero => Ok(HostValue::Number(0.0)),
                v => Ok(HostValue::Number(-to_number(&v))),
            },
            "+" => Ok(HostValue::Number(to_number(&self.eval_expr(argument, env)?))),
            "~" => Ok(HostValue::Number(!(to_number(&self.eval_expr(argument, env)?) as i64 as i32) as f64)),
            "++" | "--" => {
                let current = to_number(&self.eval_expr(argument, env)?);
                let next = if op.as_ref() == "++" { current + 1.0 } else { current - 1.0 };
                self.assign_to(argument, HostValue::Number(next), env)?;
                Ok(HostValue::Number(next))
            }
            _ => Err(HostError::Unsupported(format!("unary operator {op}"))),
        }
    }

    fn eval_assignment(&self, operator: Atom, target: NodeId, value: NodeId, env: &Rc<Environment>) -> EvalResult<HostValue> {
        let op = self.text(operator);
        let new_value = if op.as_ref() == "=" {
            self.eval_expr(value, env)?
        } else {
            let current = self.eval_expr(target, env)?;
            let rhs = self.eval_expr(value, env)?;
            let bin_op = op.trim_end_matches('=');
            match bin_op {
                "||" => {
                    if current.truthy() {
                        current
                    } else {
                        rhs
                    }
                }
                "&&" => {
                    if current.truthy() {
                        rhs
                    } else {
                        current
                    }
                }
                "??" => {
                    if matches!(current, HostValue::Undefined | HostValue::Null) {
                        rhs
                    } else {
                        current
                    }
                }
                _ => eval_binary(bin_op, &current, &rhs),
            }
        };
        self.assign_to(target, new_value.clone(), env)?;
        Ok(new_value)
    }

    fn assign_to(&self, target: NodeId, value: HostValue, env: &Rc<Environment>) -> EvalResult<()> {
        match self.arena().kind(target).clone() {
            NodeKind::Identifier(name) => {
                if !env.set(name, value.clone()) {
                    // Assignment to an undeclared name creates a sloppy
                    // global; the reference host models that on the host
                    // object itself.
                    self.host.set_global_binding(&self.text(name), value);
                }
                Ok(())
            }
            NodeKind::Member { object, property, computed, .. } => {
                let obj = self.eval_expr(object, env)?;
                let key = self.property_key_of(property, computed, env)?;
                self.set_property(&obj, key, value)
            }
            NodeKind::ArrayPattern { .. } | NodeKind::ObjectPattern { .. } => {
                Err(HostError::Unsupported("destructuring assignment target".into()))
            }
            _ => Err(HostError::Unsupported("assignment target".into())),
        }
    }

    pub fn property_key_of(&self, key_node: NodeId, computed: bool, env: &Rc<Environment>) -> EvalResult<PropertyKey> {
        if computed {
            let value = self.eval_expr(key_node, env)?;
            return Ok(match value {
                HostValue::Symbol(s) => PropertyKey::Symbol(s),
                other => PropertyKey::String(Rc::from(to_display_string(&other))),
            });
        }
        match self.arena().kind(key_node) {
            NodeKind::Identifier(name) => Ok(PropertyKey::String(self.text(*name))),
            NodeKind::Literal(Literal::String(s)) => Ok(PropertyKey::String(self.text(*s))),
            NodeKind::Literal(Literal::Number(n)) => Ok(PropertyKey::String(Rc::from(format_number(*n)))),
            _ => Err(HostError::Unsupported("property key shape".into())),
        }
    }

    fn eval_object_literal(&self, properties: &[revive_ast::Property], env: &Rc<Environment>) -> EvalResult<HostValue> {
        let object = HostValue::object(ObjectKind::Plain, self.host.object_prototype());
        for p in properties {
            if p.kind == PropertyKind::Spread {
                let spread = self.eval_expr(p.value, env)?;
                if let Some(src) = spread.as_object() {
                    let entries: Vec<_> = src.borrow().properties.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                    if let Some(dst) = object.as_object() {
                        for (k, v) in entries {
                            if v.enumerable() {
                                dst.borrow_mut().set_own(k, v);
                            }
                        }
                    }
                }
                continue;
            }
            let key = self.property_key_of(p.key, p.computed, env)?;
            let value = self.eval_expr(p.value, env)?;
            let descriptor = match p.kind {
                PropertyKind::Get => PropertyDescriptor::Accessor { get: Some(value), set: None, enumerable: true, configurable: true },
                PropertyKind::Set => PropertyDescriptor::Accessor { get: None, set: Some(value), enumerable: true, configurable: true },
                _ => PropertyDescriptor::data(value),
            };
            if let Some(obj) = object.as_object() {
                obj.borrow_mut().set_own(key, descriptor);
            }
        }
        Ok(object)
    }

    /// `true` for a bare `eval(...)` call where `eval` is not shadowed by a
    /// local binding, matching the host's own distinction between a direct
    /// call (runs against the caller's own scope) and an indirect one
    /// (`const e = eval; e(...)`, which the reference host just treats as
    /// an ordinary call to the `eval` global and leaves non-executing).
    fn is_direct_eval_call(&self, callee: NodeId, env: &Rc<Environment>) -> bool {
        let NodeKind::Identifier(name) = self.arena().kind(callee) else { return false };
        if self.text(*name).as_ref() != "eval" {
            return false;
        }
        let mut current = env.clone();
        loop {
            if current.is_with {
                if let Some(obj) = &current.with_object {
                    if self.host.has_property(obj, &PropertyKey::String(Rc::from("eval"))) {
                        return false;
                    }
                }
            }
            if current.has_own(*name) {
                return false;
            }
            match &current.parent {
                Some(p) => current = p.clone(),
                None => return true,
            }
        }
    }

    fn instance_of(&self, value: &HostValue, ctor: &HostValue) -> EvalResult<bool> {
        let target_prototype = self.get_property(ctor, &PropertyKey::String(Rc::from("prototype")))?;
        let Some(target) = target_prototype.as_object() else { return Ok(false) };
        let mut current = value.clone();
        loop {
            let Some(obj) = current.as_object().cloned() else { return Ok(false) };
            let parent = obj.borrow().prototype.clone();
            match parent {
                Some(p) => {
                    if let Some(p_obj) = p.as_object() {
                        if Rc::ptr_eq(p_obj, target) {
                            return Ok(true);
                        }
                    }
                    current = p;
                }
                None => return Ok(false),
            }
        }
    }

    fn eval_call(&self, callee: NodeId, arguments: &revive_ast::NodeList, env: &Rc<Environment>) -> EvalResult<HostValue> {
        let (callee_value, this_value) = match self.arena().kind(callee).clone() {
            NodeKind::Member { object, property, computed, .. } => {
                let obj = self.eval_expr(object, env)?;
                let key = self.property_key_of(property, computed, env)?;
                (self.get_property(&obj, &key)?, obj)
            }
            _ => (self.eval_expr(callee, env)?, HostValue::Undefined),
        };
        let args = self.eval_arguments(arguments, env)?;
        self.host.call(&callee_value, this_value, args)
    }

    fn eval_arguments(&self, arguments: &revive_ast::NodeList, env: &Rc<Environment>) -> EvalResult<Vec<HostValue>> {
        let mut args = Vec::with_capacity(arguments.len());
        for &a in arguments.iter() {
            if matches!(self.arena().kind(a), NodeKind::Spread { .. }) {
                let NodeKind::Spread { argument } = self.arena().kind(a) else { unreachable!() };
                let spread_value = self.eval_expr(*argument, env)?;
                args.extend(self.iterate(&spread_value)?);
            } else {
                args.push(self.eval_expr(a, env)?);
            }
        }
        Ok(args)
    }

    fn eval_new(&self, callee: NodeId, arguments: &revive_ast::NodeList, env: &Rc<Environment>) -> EvalResult<HostValue> {
        let ctor = self.eval_expr(callee, env)?;
        let args = self.eval_arguments(arguments, env)?;
        self.host.construct(&ctor, args)
    }

    /// A derived constructor's `super(...)` call. The reference host
    /// preallocates `this` before running any constructor body (see
    /// `TreeWalkHost::construct`), so this runs the base constructor's body
    /// against that same `this` rather than modeling the spec-true
    /// "uninitialized this" TDZ (see DESIGN.md).
    fn eval_super_call(&self, arguments: &revive_ast::NodeList, env: &Rc<Environment>) -> EvalResult<HostValue> {
        let this = env.resolve_this();
        let super_ctor = env
            .resolve_super_constructor()
            .ok_or_else(|| HostError::Evaluation("'super' keyword is only valid inside a derived class constructor".into()))?;
        let args = self.eval_arguments(arguments, env)?;
        self.host.invoke_constructor_body(&super_ctor, this.clone(), args)?;
        Ok(this)
    }

    fn eval_class(&self, id: NodeId, env: &Rc<Environment>) -> EvalResult<HostValue> {
        self.host.build_class(self, id, env)
    }

    pub fn make_closure(&self, node: NodeId, env: &Rc<Environment>) -> EvalResult<HostValue> {
        self.host.make_closure(self.program, node, env)
    }

    pub fn new_array(&self, items: Vec<HostValue>) -> HostValue {
        HostValue::object(ObjectKind::Array(items.into_iter().map(Some).collect()), self.host.array_prototype())
    }

    fn iterate(&self, value: &HostValue) -> EvalResult<Vec<HostValue>> {
        match value.as_object().map(|o| o.borrow()) {
            Some(obj) => match &obj.kind {
                ObjectKind::Array(elements) => Ok(elements.iter().map(|e| e.clone().unwrap_or(HostValue::Undefined)).collect()),
                ObjectKind::Collection(CollectionData { kind, entries }) if !kind.is_map_like() => {
                    Ok(entries.iter().map(|(k, _)| k.clone()).collect())
                }
                ObjectKind::Collection(CollectionData { entries, .. }) => Ok(entries
                    .iter()
                    .map(|(k, v)| self.new_array(vec![k.clone(), v.clone().unwrap_or(HostValue::Undefined)]))
                    .collect()),
                _ => Err(HostError::Unsupported("value is not iterable".into())),
            },
            None => match value {
                HostValue::String(s) => Ok(s.chars().map(|c| HostValue::String(Rc::from(c.to_string()))).collect()),
                _ => Err(HostError::Unsupported("value is not iterable".into())),
            },
        }
    }

    fn enumerable_string_keys(&self, value: &HostValue) -> Vec<Rc<str>> {
        let Some(obj) = value.as_object() else { return Vec::new() };
        obj.borrow()
            .properties
            .iter()
            .filter_map(|(k, v)| match (k, v.enumerable()) {
                (PropertyKey::String(s), true) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn get_property(&self, value: &HostValue, key: &PropertyKey) -> EvalResult<HostValue> {
        self.get_property_with_receiver(value, key, value)
    }

    fn get_property_with_receiver(&self, value: &HostValue, key: &PropertyKey, receiver: &HostValue) -> EvalResult<HostValue> {
        if let (HostValue::Object(obj), PropertyKey::String(k)) = (value, key) {
            if k.as_ref() == "length" {
                if let ObjectKind::Array(elements) = &obj.borrow().kind {
                    return Ok(HostValue::Number(elements.len() as f64));
                }
            }
        }
        self.host.get_property_chain(value, key, receiver)
    }

    pub fn set_property(&self, value: &HostValue, key: PropertyKey, new_value: HostValue) -> EvalResult<()> {
        self.host.set_property_chain(value, key, new_value)
    }

    fn delete_property(&self, value: &HostValue, key: &PropertyKey) -> EvalResult<bool> {
        self.host.delete_property(value, key)
    }
}

pub fn to_number(value: &HostValue) -> f64 {
    match value {
        HostValue::Number(n) => *n,
        HostValue::NegativeZero => 0.0,
        HostValue::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        HostValue::Null => 0.0,
        HostValue::Undefined => f64::NAN,
        HostValue::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

pub fn to_display_string(value: &HostValue) -> String {
    match value {
        HostValue::Undefined => "undefined".to_string(),
        HostValue::Null => "null".to_string(),
        HostValue::Boolean(b) => b.to_string(),
        HostValue::Number(n) => format_number(*n),
        HostValue::NegativeZero => "0".to_string(),
        HostValue::String(s) => s.to_string(),
        HostValue::BigInt(s) => s.to_string(),
        HostValue::Symbol(_) => "Symbol()".to_string(),
        HostValue::Object(o) => match &o.borrow().kind {
            ObjectKind::Array(elements) => elements
                .iter()
                .map(|e| e.as_ref().map(to_display_string).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
            _ => "[object Object]".to_string(),
        },
    }
}

pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn strict_equals(a: &HostValue, b: &HostValue) -> bool {
    match (a, b) {
        (HostValue::Undefined, HostValue::Undefined) | (HostValue::Null, HostValue::Null) => true,
        (HostValue::Boolean(a), HostValue::Boolean(b)) => a == b,
        (HostValue::Number(a), HostValue::Number(b)) => a == b,
        (HostValue::NegativeZero, HostValue::NegativeZero) => true,
        (HostValue::NegativeZero, HostValue::Number(n)) | (HostValue::Number(n), HostValue::NegativeZero) => *n == 0.0,
        (HostValue::String(a), HostValue::String(b)) => a == b,
        (HostValue::BigInt(a), HostValue::BigInt(b)) => a == b,
        (HostValue::Symbol(a), HostValue::Symbol(b)) => Rc::ptr_eq(a, b),
        (HostValue::Object(a), HostValue::Object(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

fn eval_binary(op: &str, l: &HostValue, r: &HostValue) -> HostValue {
    match op {
        "+" => match (l, r) {
            (HostValue::String(_), _) | (_, HostValue::String(_)) => {
                HostValue::String(Rc::from(format!("{}{}", to_display_string(l), to_display_string(r))))
            }
            _ => HostValue::Number(to_number(l) + to_number(r)),
        },
        "-" => HostValue::Number(to_number(l) - to_number(r)),
        "*" => HostValue::Number(to_number(l) * to_number(r)),
        "/" => HostValue::Number(to_number(l) / to_number(r)),
        "%" => HostValue::Number(to_number(l) % to_number(r)),
        "**" => HostValue::Number(to_number(l).powf(to_number(r))),
        "===" => HostValue::Boolean(strict_equals(l, r)),
        "!==" => HostValue::Boolean(!strict_equals(l, r)),
        "==" => HostValue::Boolean(loose_equals(l, r)),
        "!=" => HostValue::Boolean(!loose_equals(l, r)),
        "<" => HostValue::Boolean(to_number(l) < to_number(r)),
        "<=" => HostValue::Boolean(to_number(l) <= to_number(r)),
        ">" => HostValue::Boolean(to_number(l) > to_number(r)),
        ">=" => HostValue::Boolean(to_number(l) >= to_number(r)),
        "&" => HostValue::Number((to_number(l) as i64 as i32 & to_number(r) as i64 as i32) as f64),
        "|" => HostValue::Number((to_number(l) as i64 as i32 | to_number(r) as i64 as i32) as f64),
        "^" => HostValue::Number((to_number(l) as i64 as i32 ^ to_number(r) as i64 as i32) as f64),
        "<<" => HostValue::Number(((to_number(l) as i64 as i32) << (to_number(r) as i64 as u32 & 31)) as f64),
        ">>" => HostValue::Number(((to_number(l) as i64 as i32) >> (to_number(r) as i64 as u32 & 31)) as f64),
        "instanceof" => HostValue::Boolean(false), // resolved by the host-aware caller where needed
        _ => HostValue::Undefined,
    }
}

fn loose_equals(l: &HostValue, r: &HostValue) -> bool {
    match (l, r) {
        (HostValue::Null, HostValue::Undefined) | (HostValue::Undefined, HostValue::Null) => true,
        _ => strict_equals(l, r) || to_number(l) == to_number(r),
    }
}

#[cfg(test)]
#[path = "../../tests/interpreter.rs"]
mod tests;
