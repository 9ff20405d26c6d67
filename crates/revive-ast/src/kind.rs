//! Node kinds: expressions, statements, patterns and declarations.
//!
//! Covers the subset of ECMAScript syntax named explicitly: function
//! expressions, arrow functions, class bodies, method definitions, `eval`,
//! `with`, `super`, plus the literal/collection/object shapes the value
//! graph builder needs to round-trip. Constructs
//! outside this subset are not a goal of this workspace — see DESIGN.md's
//! note on parser scope.

use crate::node::{BindingTarget, NodeId, NodeList};
use revive_common::{Atom, Strictness};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
    Method,
    Spread,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionFlavor {
    Plain,
    Arrow,
    Method,
    Generator,
    Async,
    AsyncGenerator,
    AsyncArrow,
}

impl FunctionFlavor {
    pub fn is_arrow(self) -> bool {
        matches!(self, FunctionFlavor::Arrow | FunctionFlavor::AsyncArrow)
    }

    pub fn is_async(self) -> bool {
        matches!(
            self,
            FunctionFlavor::Async | FunctionFlavor::AsyncGenerator | FunctionFlavor::AsyncArrow
        )
    }

    pub fn is_generator(self) -> bool {
        matches!(self, FunctionFlavor::Generator | FunctionFlavor::AsyncGenerator)
    }
}

/// Identity assigned at parse time to every function literal. Stable for the lifetime of one `NodeArena`;
/// the runtime tracker pairs it with a concrete scope-id vector per closure
/// instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u32);

#[derive(Clone, Debug)]
pub struct FunctionData {
    pub id: FunctionId,
    pub flavor: FunctionFlavor,
    pub name: Option<Atom>,
    pub params: NodeList,
    /// `Block` for a classic body, any expression node for a concise arrow
    /// body (`() => expr`).
    pub body: NodeId,
    pub is_concise_arrow_body: bool,
    /// Own strictness, resolved by the scope analyzer and consumed verbatim by the emitter.
    pub strictness: Strictness,
    /// True for parameter lists containing defaults, destructuring, or a
    /// rest element — "non-simple parameters" per the glossary, which
    /// constrains where a `"use strict"` directive may legally appear.
    pub has_non_simple_parameters: bool,
}

#[derive(Clone, Debug)]
pub struct ClassMember {
    pub key: NodeId,
    pub computed: bool,
    pub is_static: bool,
    pub kind: PropertyKind,
    /// `None` for field declarations with no initializer.
    pub value: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: Option<Atom>,
    pub super_class: Option<NodeId>,
    pub members: Vec<ClassMember>,
    /// Non-trivial `super(...)` calls — anything other than exactly
    /// `super(...args)` — must be rewritten to reflective construction.
    pub has_trivial_super_call: bool,
}

#[derive(Clone, Debug)]
pub struct Property {
    pub key: NodeId,
    pub value: NodeId,
    pub computed: bool,
    pub shorthand: bool,
    pub kind: PropertyKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolCategory {
    /// `Symbol()` / `Symbol("description")`.
    Unique,
    /// `Symbol.for(key)`.
    Registered,
    /// `Symbol.iterator` and friends.
    WellKnown,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    /// Preserves the `+0`/`-0` distinction a bare `f64` comparison loses.
    NegativeZero,
    String(Atom),
    Boolean(bool),
    Null,
    Undefined,
    BigInt(String),
    Regex { pattern: Atom, flags: Atom },
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    // ---- Program ----
    Program { body: NodeList },

    // ---- Literals & identifiers ----
    Literal(Literal),
    Identifier(Atom),
    /// A free reference to `eval` used *not* as a direct call (indirect
    /// eval is left untouched by the instrumenter).
    ThisExpr,
    SuperExpr,
    MetaProperty { meta: Atom, property: Atom },

    // ---- Collections & composite literals ----
    ArrayExpr { elements: NodeList, has_holes: bool },
    ObjectExpr { properties: Vec<Property> },
    TemplateLiteral { quasis: Vec<Atom>, expressions: NodeList },
    TaggedTemplate { tag: NodeId, quasi: NodeId },

    // ---- Functions & classes ----
    Function(Box<FunctionData>),
    Class(Box<ClassData>),

    // ---- Expressions ----
    Unary { operator: Atom, argument: NodeId, prefix: bool },
    Binary { operator: Atom, left: NodeId, right: NodeId },
    Logical { operator: Atom, left: NodeId, right: NodeId },
    Assignment { operator: Atom, target: NodeId, value: NodeId },
    Conditional { test: NodeId, consequent: NodeId, alternate: NodeId },
    Call { callee: NodeId, arguments: NodeList, optional: bool },
    New { callee: NodeId, arguments: NodeList },
    Member { object: NodeId, property: NodeId, computed: bool, optional: bool },
    /// `super.prop` / `super.prop(...)` read specially by the instrumenter.
    SuperMember { property: NodeId, computed: bool },
    SuperCall { arguments: NodeList },
    Sequence { expressions: NodeList },
    Spread { argument: NodeId },
    Yield { argument: Option<NodeId>, delegate: bool },
    Await { argument: NodeId },

    // ---- Patterns (for destructuring parameters/declarators) ----
    ArrayPattern { elements: NodeList },
    ObjectPattern { properties: Vec<Property>, rest: Option<NodeId> },
    AssignmentPattern { target: NodeId, default: NodeId },
    RestElement { argument: NodeId },

    // ---- Statements ----
    Block { body: NodeList },
    ExpressionStmt { expression: NodeId },
    Empty,
    Debugger,
    VarDecl { kind: VarKind, declarators: Vec<(BindingTarget, Option<NodeId>)> },
    If { test: NodeId, consequent: NodeId, alternate: Option<NodeId> },
    For { init: Option<NodeId>, test: Option<NodeId>, update: Option<NodeId>, body: NodeId },
    ForIn { left: NodeId, right: NodeId, body: NodeId },
    ForOf { left: NodeId, right: NodeId, body: NodeId, is_await: bool },
    While { test: NodeId, body: NodeId },
    DoWhile { test: NodeId, body: NodeId },
    Switch { discriminant: NodeId, cases: Vec<(Option<NodeId>, NodeList)> },
    Break { label: Option<Atom> },
    Continue { label: Option<Atom> },
    Return { argument: Option<NodeId> },
    Throw { argument: NodeId },
    Try { block: NodeId, handler: Option<(Option<BindingTarget>, NodeId)>, finalizer: Option<NodeId> },
    /// Preserved verbatim ("`with` preservation") — the
    /// instrumenter never rewrites the bound object's shadow.
    With { object: NodeId, body: NodeId },
    Labeled { label: Atom, body: NodeId },

    // ---- Directives ----
    /// A directive-prologue entry (a bare string-literal statement at the
    /// head of a program/function body). The parser classifies `"use
    /// strict"` specially since every later pass needs to test for it
    /// without re-resolving the literal's interned text.
    Directive { is_use_strict: bool, raw: Atom },

    // ---- Synthesized nodes the instrumenter inserts ----
    /// `let <id> = __revive_registerScope(<parent-id-or-null>)`.
    ScopeRegistration { binding: Atom, parent: Option<Atom> },
    /// The tracker call wrapping a function literal's evaluation.
    FunctionRegistration { function: NodeId, info_record: Atom, scope_ids: Vec<Atom> },
    /// Replaces a direct `eval(...)` call site.
    InstrumentedEval { argument: NodeId },
}
