//! The registry itself: scope-identifier allocation, function registration,
//! and binding-write tracking for `with`/direct-`eval` scopes.

use crate::EvalContext;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use revive_ast::FunctionId;
use revive_common::Atom;
use revive_instrument::{InfoRecord, Instrumented};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A runtime scope-frame identity, allocated fresh per activation. Two activations of the same lexical scope
/// (e.g. two loop iterations) get distinct `FrameId`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// Opaque key identifying one host function *value* — an embedder-assigned
/// id (pointer address, heap slot, whatever makes sense for the host),
/// never interpreted by the tracker itself. Distinct from `FunctionId`,
/// which identifies the *source* the function literal came from; many
/// `HostFunctionKey`s (closure instances) can share one `FunctionId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HostFunctionKey(pub u64);

/// What `register_function` associates with a host function value: its
/// compile-time source identity, the concrete frame instances visible to
/// it, and the info record the emitter will use to rewrite its source.
#[derive(Clone, Debug)]
pub struct CaptureDescriptor {
    pub function: FunctionId,
    pub scope_ids: Vec<FrameId>,
    pub info_record: Arc<InfoRecord>,
}

impl PartialEq for CaptureDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.function == other.function && self.scope_ids == other.scope_ids
    }
}

#[derive(Default)]
pub struct Tracker {
    next_frame: AtomicU64,
    functions: DashMap<HostFunctionKey, Arc<CaptureDescriptor>>,
    /// Names observed being written inside a `with`/direct-`eval` frame,
    /// for which static binding classification is impossible. Keyed by the frame the write
    /// happened in.
    binding_writes: DashMap<FrameId, DashMap<Atom, ()>>,
}

impl Tracker {
    pub fn new() -> Self {
        Tracker::default()
    }

    /// Fresh identity for the current activation of a scope.
    /// `_parent` is accepted (and typically threaded by the caller into the
    /// next `register_function`/`register_scope` call) but the tracker does
    /// not itself need a frame tree — frame parentage is carried by the
    /// instrumenter's scope-id vectors, not reconstructed here.
    pub fn register_scope(&self, _parent: Option<FrameId>) -> FrameId {
        FrameId(self.next_frame.fetch_add(1, Ordering::Relaxed))
    }

    /// Associates a host function value with its capture descriptor.
    /// Idempotent: re-registering the same key with an identical identity
    /// and scope-id vector is a no-op, so instrumented code
    /// that runs the same function-literal evaluation twice under identical
    /// capture (the common case of re-entering a loop body that happens not
    /// to close over anything new) never grows the registry.
    pub fn register_function(
        &self,
        key: HostFunctionKey,
        function: FunctionId,
        scope_ids: Vec<FrameId>,
        info_record: Arc<InfoRecord>,
    ) -> Arc<CaptureDescriptor> {
        let descriptor = Arc::new(CaptureDescriptor { function, scope_ids, info_record });
        match self.functions.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                if **entry.get() != *descriptor {
                    entry.insert(descriptor.clone());
                }
                entry.get().clone()
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(descriptor.clone());
                descriptor
            }
        }
    }

    /// The capture descriptor previously registered for a host function
    /// value, if any — `None` means the function was produced by
    /// uninstrumented source.
    pub fn lookup(&self, key: HostFunctionKey) -> Option<Arc<CaptureDescriptor>> {
        self.functions.get(&key).map(|entry| entry.clone())
    }

    pub fn register_binding_write(&self, frame: FrameId, name: Atom) {
        self.binding_writes.entry(frame).or_default().insert(name, ());
    }

    /// Names observed written in `frame` via `register_binding_write`, in
    /// no particular order — the value graph builder consults this only
    /// for wildcard-capture frames, where the instrumenter could not
    /// enumerate bindings statically.
    pub fn observed_writes(&self, frame: FrameId) -> Vec<Atom> {
        self.binding_writes.get(&frame).map(|set| set.iter().map(|e| *e.key()).collect()).unwrap_or_default()
    }

    /// Instruments `source` under `ctx` and hands the result to `evaluator`,
    /// which performs the actual host evaluation.
    pub fn instrumented_eval<R>(
        &self,
        source: &str,
        ctx: EvalContext,
        evaluator: impl FnOnce(&Instrumented) -> R,
    ) -> Result<R, revive_instrument::InstrumentError> {
        let instrumented = revive_instrument::instrument(source, ctx.source_kind)?;
        Ok(evaluator(&instrumented))
    }
}

/// The process-wide tracker instance.
pub fn global() -> &'static Tracker {
    static TRACKER: OnceCell<Tracker> = OnceCell::new();
    TRACKER.get_or_init(Tracker::new)
}

#[cfg(test)]
#[path = "../tests/registry.rs"]
mod tests;
