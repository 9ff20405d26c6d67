//! Lexical scope analysis over a parsed `revive_ast::NodeArena`.
//!
//! Builds the scope tree and
//! resolves every identifier reference to either a `(scope, name)` pair or
//! `Free`, so the instrumenter knows exactly which names a
//! function closes over without re-walking the source.

mod analyzer;
mod resolution;
mod scope;

pub use analyzer::{analyze, AnalysisResult};
pub use resolution::{Resolution, Resolutions};
pub use scope::{Binding, BindingKind, Scope, ScopeId, ScopeKind, ScopeTree};
