//! Shared diagnostic vocabulary, independent of any
//! one crate's error enum. Library crates wrap these in a crate-specific
//! error type; the CLI flattens everything into `anyhow::Error`.

use crate::span::Span;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
}

/// The error kinds every crate-specific error type classifies into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Parse error in instrumentation or in instrumented-eval.
    ParseError,
    /// A live resource with no structural representation.
    UnserializableValue,
    /// The emitter could not find a free identifier satisfying lexical-scope
    /// and reserved-word constraints. Fatal: an internal invariant violation.
    NameCollision,
    /// A closure produced by uninstrumented source references a free
    /// identifier whose value cannot be recovered from source alone.
    MissingCapture,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Diagnostic { category: DiagnosticCategory::Error, kind, span, message: message.into() }
    }

    pub fn parse_error(span: Span, message: impl Into<String>) -> Self {
        Self::error(DiagnosticKind::ParseError, span, message)
    }

    pub fn unserializable(span: Span, path: &str, value_kind: &str) -> Self {
        Self::error(
            DiagnosticKind::UnserializableValue,
            span,
            format!("cannot serialize value of kind `{value_kind}` at `{path}`"),
        )
    }

    pub fn missing_capture(span: Span, name: &str) -> Self {
        Self::error(
            DiagnosticKind::MissingCapture,
            span,
            format!("closure references free identifier `{name}` but was not instrumented"),
        )
    }

    pub fn name_collision(span: Span, name: &str) -> Self {
        Self::error(
            DiagnosticKind::NameCollision,
            span,
            format!("no free identifier available for `{name}` under current scope constraints"),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?} @ {}] {}", self.kind, self.span, self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
#[path = "../tests/diagnostics.rs"]
mod tests;
