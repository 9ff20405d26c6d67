//! Centralized limits and thresholds.
//!
//! Collected here so tuning one of these doesn't require hunting through
//! every crate for a magic number.

/// Maximum depth of nested scopes the analyzer will walk before treating
/// further nesting as a runaway input (protects against pathological or
/// adversarial source rather than any real program).
pub const MAX_SCOPE_DEPTH: usize = 4096;

/// Maximum number of reachable values a single serialization call will
/// traverse before aborting with an internal error. Real graphs are bounded
/// by available heap; this is a circuit breaker, not a design constraint.
pub const MAX_GRAPH_NODES: usize = 4_000_000;

/// Internal identifier namespace prefix the instrumenter reserves for the
/// scope-id and function-registration calls it inserts. Renumbered on collision with user code.
pub const INSTRUMENTER_PREFIX: &str = "__revive";

/// Above this many occurrences of an identical primitive value, the emitter
/// always hoists to a shared local rather than re-evaluating the dedup
/// decision per occurrence (a fast path, not a correctness boundary).
pub const DEDUP_HOIST_THRESHOLD: usize = 2;
