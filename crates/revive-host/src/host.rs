//! The host contract: the host's own parser, evaluator, and property
//! enumeration are treated by contract rather than redesigned. A Rust
//! workspace cannot silently assume a JS engine is
//! linked in-process, so this expansion makes the contract an actual trait.
//! Production embedders implement `Host` against a real engine; this crate
//! ships one concrete implementation (`tree_walk::TreeWalkHost`) so the rest
//! of the pipeline is exercised end-to-end without linking one.

use crate::value::{ExtensibilityState, HostValue, PropertyDescriptor, PropertyKey};
use revive_ast::{NodeArena, NodeId};
use revive_common::{Diagnostic, Interner, SourceKind};
use revive_tracker::{EvalContext, FrameId};
use std::fmt;
use std::rc::Rc;

/// One name bound in a scope frame. `mutable` distinguishes `const` (false)
/// from `let`/`var`/parameter (true) bindings, which the emitter needs to
/// decide whether a reconstructed frame slot may legally be written again.
#[derive(Clone, Debug)]
pub struct FrameBinding {
    pub name: Rc<str>,
    pub value: HostValue,
    pub mutable: bool,
}

/// One lexical scope activation, as the value graph builder sees it.
#[derive(Clone, Debug)]
pub struct FrameBindings {
    pub parent: Option<FrameId>,
    pub bindings: Vec<FrameBinding>,
    /// Set only for function-boundary frames; `None` frames defer to an
    /// ancestor for `this`/`arguments`/`new.target`.
    pub this_value: Option<HostValue>,
    pub arguments_object: Option<HostValue>,
    pub new_target: Option<HostValue>,
    /// A `with` scope: opaque to the emitter beyond its bound object, since the
    /// set of names it shadows is observable only at runtime.
    pub is_with: bool,
    pub with_object: Option<HostValue>,
}

/// A parsed program, handed back by `Host::parse`.
pub struct Program {
    pub arena: NodeArena,
    pub interner: Interner,
    pub root: NodeId,
}

#[derive(Debug)]
pub enum HostError {
    Parse(Diagnostic),
    Evaluation(String),
    /// A construct the host implementation does not execute (e.g. a real
    /// engine binding not wired up in this workspace, or a tree-walker
    /// limitation — see DESIGN.md for which constructs `tree_walk` covers).
    Unsupported(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Parse(d) => write!(f, "{d}"),
            HostError::Evaluation(msg) => write!(f, "evaluation error: {msg}"),
            HostError::Unsupported(what) => write!(f, "unsupported: {what}"),
        }
    }
}

impl std::error::Error for HostError {}

/// The three operations treated as external collaborators: parse
/// source to an AST, evaluate source as a program, and enumerate a value's
/// own properties (plus the descriptor/prototype/extensibility getters the
/// value graph builder needs alongside `own_keys`).
pub trait Host {
    fn parse(&self, source: &str, kind: SourceKind) -> Result<Program, HostError>;

    fn evaluate(&self, source: &str, ctx: EvalContext) -> Result<HostValue, HostError>;

    /// Own property keys in host observation order.
    fn own_keys(&self, value: &HostValue) -> Vec<PropertyKey>;

    fn get_own_property(&self, value: &HostValue, key: &PropertyKey) -> Option<PropertyDescriptor>;

    fn prototype_of(&self, value: &HostValue) -> Option<HostValue>;

    fn extensibility(&self, value: &HostValue) -> ExtensibilityState;

    /// Resolves a runtime scope-frame identity (one closure's entry in a
    /// `CaptureDescriptor::scope_ids`) back to its bindings.
    /// `None` once nothing keeps the frame's environment alive, or for an
    /// id this host never issued.
    fn frame_bindings(&self, frame: FrameId) -> Option<FrameBindings>;

    /// Every value directly reachable off the host's global object, by
    /// name. The value graph builder uses this to
    /// recognize a reachable value as a *global reference* node rather than
    /// trying to reconstruct it structurally.
    fn global_roots(&self) -> Vec<(Rc<str>, HostValue)>;
}
