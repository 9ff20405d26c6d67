//! Escape-analysis-lite: a
//! scope only needs a runtime scope-identifier if some closure nested inside
//! it can actually observe one of its bindings. Scopes that no nested
//! function reaches skip scope-identifier insertion entirely, so
//! instrumented output size tracks actual capture rather than lexical
//! nesting depth.
//!
//! This is additive and changes no named operation's semantics: a scope
//! this pass misses as "maybe escaping" only costs an unused identifier, it
//! never causes a capture to go unrecorded (dynamic scopes are always
//! treated conservatively, see `has_with`/`has_direct_eval` below).

use revive_scope::{AnalysisResult, Resolution, ScopeId, ScopeKind, ScopeTree};
use rustc_hash::FxHashSet;

/// The set of scopes that must be given a runtime scope-identifier at entry,
/// because some reference from inside a nested function/closure crosses
/// into them, or because dynamic scoping (`with`/direct `eval`) inside them
/// makes static non-escape unprovable.
pub fn compute_escaping_scopes(scopes: &ScopeTree, analysis: &AnalysisResult) -> FxHashSet<ScopeId> {
    let mut escaping = FxHashSet::default();

    for (node_id, resolution) in analysis.resolutions.iter() {
        let Resolution::Bound { scope: defining_scope, .. } = resolution else { continue };
        let Some(&occurrence_scope) = analysis.occurrence_scopes.get(&node_id) else { continue };
        if crosses_function_boundary(scopes, occurrence_scope, defining_scope) {
            escaping.insert(defining_scope);
        }
    }

    for (id, scope) in scopes.iter() {
        if scope.has_with || scope.has_direct_eval {
            escaping.insert(id);
            escaping.insert(scopes.nearest_function_or_program(id));
        }
    }

    escaping
}

/// True if walking from `from` up to (but not including) `upto` passes
/// through a function-body scope — meaning a nested closure, not just a
/// nested block, separates the reference from its binding.
fn crosses_function_boundary(scopes: &ScopeTree, from: ScopeId, upto: ScopeId) -> bool {
    let mut current = from;
    while current != upto {
        if scopes.get(current).kind == ScopeKind::Function {
            return true;
        }
        match scopes.get(current).parent {
            Some(parent) => current = parent,
            None => return false,
        }
    }
    false
}

#[cfg(test)]
#[path = "../tests/escape.rs"]
mod tests;
