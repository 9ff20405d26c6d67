//! The serializer's external options record.

use revive_common::OutputFormat;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// How the emitter splits output across files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entries {
    /// One file per root, named after the root.
    PerRoot,
    /// Caller-supplied root name → file name mapping.
    Named(FxHashMap<Rc<str>, Rc<str>>),
}

#[derive(Clone, Debug)]
pub struct SerializeOptions {
    pub format: OutputFormat,
    /// Controls whitespace; independent of `mangle`.
    pub minify: bool,
    /// When true, identifiers are renamed to the shortest legal names,
    /// independent of `minify`.
    pub mangle: bool,
    /// Inline single-use values instead of hoisting to locals.
    pub inline: bool,
    /// `None` disables code splitting; `Some` enables multi-file output.
    pub entries: Option<Entries>,
    /// Whether the consumer will evaluate the output in a strict container.
    pub strict_env: bool,
    pub include_source_map: bool,
    /// Caller opt-in to the degraded fallback for closures with no capture
    /// descriptor.
    pub allow_missing_capture: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            format: OutputFormat::BareExpression,
            minify: false,
            mangle: false,
            inline: true,
            entries: None,
            strict_env: false,
            include_source_map: false,
            allow_missing_capture: false,
        }
    }
}
