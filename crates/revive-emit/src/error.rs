//! Emitter error type, wrapping the shared diagnostic vocabulary the way
//! `revive-instrument`'s `InstrumentError` does.

use revive_common::Diagnostic;
use revive_graph::GraphError;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmitError {
    /// Propagated unchanged from the value-graph builder.
    Unserializable(Diagnostic),
    /// The name allocator could not find a free identifier under the
    /// current reserved-word/shadowing constraints. Treated as an internal
    /// invariant violation, not a recoverable condition — reaching it means
    /// the allocator's own bookkeeping is wrong.
    NameCollision(Diagnostic),
    /// A closure has no capture descriptor (`ClosureNode::missing_capture`)
    /// and the caller did not opt into the degraded verbatim-source mode.
    MissingCapture(Diagnostic),
    /// An internal invariant the emitter relies on did not hold.
    Internal(String),
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::Unserializable(d) => write!(f, "{d}"),
            EmitError::NameCollision(d) => write!(f, "{d}"),
            EmitError::MissingCapture(d) => write!(f, "{d}"),
            EmitError::Internal(msg) => write!(f, "internal emitter error: {msg}"),
        }
    }
}

impl std::error::Error for EmitError {}

impl From<GraphError> for EmitError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Unserializable { path, kind } => EmitError::Unserializable(Diagnostic::unserializable(
                revive_common::Span::synthetic(),
                &path.join("."),
                kind,
            )),
        }
    }
}
