//! Instrumentation-specific error type, wrapping the shared diagnostic
//! vocabulary the same way every other crate-specific error type does.

use revive_common::{Diagnostic, Span};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstrumentError {
    /// The source failed to parse; this aborts the whole
    /// unit, no partial output is returned.
    Parse(Diagnostic),
    /// An internal invariant the instrumenter relies on did not hold. In
    /// debug builds this path is never reached because the equivalent
    /// `debug_assert!` fires first; this variant exists for release builds.
    Internal(String),
}

impl fmt::Display for InstrumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentError::Parse(d) => write!(f, "{d}"),
            InstrumentError::Internal(msg) => write!(f, "internal instrumenter error: {msg}"),
        }
    }
}

impl std::error::Error for InstrumentError {}

impl InstrumentError {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        InstrumentError::Parse(Diagnostic::parse_error(span, message))
    }
}
