//! Source-to-source instrumentation for the revive live-value serializer.
//!
//! Rewrites (conceptually — see `transform` module docs for why this is a
//! side-table rather than a literal AST splice) every scope a nested
//! function may capture so it can be reconstructed later: scope identities,
//! function registrations, info records, and strict-mode classification.
//! Consumed downstream by `revive-tracker` (at runtime) and `revive-emit`
//! (at serialization time).

pub mod error;
pub mod escape;
pub mod info;
pub mod namespace;
pub mod transform;

pub use error::InstrumentError;
pub use info::{FreeNameRecord, InfoRecord, NameUsage};
pub use namespace::InternalNamespace;
pub use transform::{instrument, FunctionRegistration, Instrumented};
