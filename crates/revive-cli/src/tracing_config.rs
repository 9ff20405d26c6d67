//! Structured logging setup for the `revive` binary` + `RUST_LOG` setup —
//! here with `tracing-tree`'s `HierarchicalLayer` so nested
//! `#[tracing::instrument]` spans around instrumentation/serialization
//! calls read as a call tree instead of a flat log).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_tree::HierarchicalLayer;

/// Initializes the global tracing subscriber. `override_level` takes
/// precedence over `RUST_LOG`; absent either, falls back to `warn`.
pub fn init(override_level: Option<&str>) {
    let filter = match override_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("revive=info,warn")),
    };
    let _ = tracing_subscriber::registry().with(filter).with(HierarchicalLayer::new(2).with_indent_lines(true)).try_init();
}
