//! Runtime tracker: a process-wide registry that instrumented
//! code calls into so the value graph builder can later recover closure
//! capture information that is otherwise invisible once a function value is
//! just sitting on the host heap.
//!
//! Built on `dashmap` + `once_cell`-style global tables: a process-wide
//! interning table reached from everywhere, with idempotent inserts, just
//! keyed by captured-function identity instead of by type structure.
//!
//! Dependency direction note: the tracker does not depend on `revive-host`.
//! `instrumented_eval` does not own a host evaluator itself — 
//! describes it as "rewrites a source string under a provided context and
//! evaluates it", but a host embedding this tracker is the only thing that
//! can actually run host code. `Tracker::instrumented_eval` takes the
//! evaluation step as a caller-supplied closure so `revive-host` can depend
//! on `revive-tracker` (to register scopes/functions as it evaluates)
//! without a cycle back the other way.

mod registry;

pub use registry::{
    global, CaptureDescriptor, FrameId, HostFunctionKey, Tracker,
};

use revive_common::SourceKind;

/// The strict/with/scope context a direct `eval` call is instrumented and
/// evaluated under.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext {
    pub source_kind: SourceKind,
    pub parent_frame: Option<FrameId>,
}

impl EvalContext {
    pub fn new(source_kind: SourceKind, parent_frame: Option<FrameId>) -> Self {
        EvalContext { source_kind, parent_frame }
    }
}
