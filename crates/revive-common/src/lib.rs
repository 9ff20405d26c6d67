//! Common types and utilities for the revive live-value serializer.
//!
//! This crate provides foundational types used across every revive crate:
//! - String interning (`Atom`, `Interner`, `ShardedInterner`)
//! - Source spans (`Span`, `Spanned`)
//! - Line/column positions derived from spans (`LineMap`, `Position`, `Range`)
//! - Shared enums (`SourceKind`, `OutputFormat`, `Strictness`)
//! - Centralized limits and thresholds
//! - The shared diagnostic vocabulary

pub mod interner;
pub use interner::{Atom, Interner, ShardedInterner};

pub mod span;
pub use span::{Span, Spanned};

pub mod position;
pub use position::{LineMap, Position, Range};

pub mod common;
pub use common::{OutputFormat, SourceKind, Strictness};

pub mod limits;

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticKind};
