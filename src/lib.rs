//! `revive`: instruments a prototype-based dynamic host language's source
//! for live-value capture, then serializes captured values (closures,
//! objects, classes, collections, buffers) back into host-language source
//! text that reconstructs them.
//!
//! This crate is a thin facade over the workspace's member crates, each of
//! which owns one stage of the pipeline:
//!
//! - [`revive_instrument`] instruments source text, producing per-function
//!   capture descriptors without altering the source's semantics.
//! - [`revive_tracker`] is the process-wide runtime registry those
//!   descriptors are registered into.
//! - [`revive_host`] abstracts the dynamic host runtime a captured value was
//!   produced by, with [`revive_host::TreeWalkHost`] as the reference
//!   in-process implementation.
//! - [`revive_graph`] walks captured values into a [`revive_graph::ValueGraph`]
//!   arena, resolving sharing and cycles by identity.
//! - [`revive_emit`] prints a `ValueGraph` back into host-language source.

pub use revive_common as common;
pub use revive_emit as emit;
pub use revive_graph as graph;
pub use revive_host as host;
pub use revive_instrument as instrument;
pub use revive_tracker as tracker;

pub use revive_emit::{serialize, SerializeOptions, SerializeOutput};
pub use revive_graph::{build_value_graph, ValueGraph};
pub use revive_host::Host;
pub use revive_instrument::{instrument as instrument_source, Instrumented};
