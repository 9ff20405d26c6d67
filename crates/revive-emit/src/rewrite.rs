//! Function source rewriting: re-resolves a closure's
//! captured source text against its own, isolated scope analysis and
//! substitutes every free-identifier occurrence (and, for arrows, `this`
//! /`arguments`/`new.target`) with the expression that reaches it through
//! the emitted frame chain.
//!
//! Rather than inventing a bespoke token-level substitution, the emitter
//! re-parses the captured span and re-runs `revive_scope::analyze` over it,
//! so free-identifier detection is exactly as correct as the rest of the
//! workspace's scope analysis, not a best-effort regex.

use revive_ast::{visit, NodeKind};
use revive_common::{SourceKind, Span};
use rustc_hash::FxHashMap;

/// How a captured source span needs to be wrapped before it parses as a
/// standalone program. Method/getter/setter/generator-method literals are
/// captured starting at the member name (see `revive_parser::Parser::
/// parse_class_member`), which is only valid syntax inside an object
/// literal; everything else (`function ...`, arrow forms) is already a
/// valid standalone expression once parenthesized.
fn classify(source: &str) -> bool {
    let trimmed = source.trim_start();
    if trimmed.starts_with("function") || trimmed.starts_with("async function") {
        return true;
    }
    match (trimmed.find('{'), trimmed.find("=>")) {
        (Some(brace), Some(arrow)) => arrow < brace,
        (None, Some(_)) => true,
        _ => false,
    }
}

/// One substituted identifier/keyword occurrence, in the coordinate space of
/// the original (unwrapped) `source_text`.
struct Replacement {
    span: Span,
    text: String,
}

/// Rewrites `source`, replacing every free-identifier occurrence found in
/// `substitutions` and, when `is_arrow`, every `this`/`arguments`/
/// `new.target` occurrence with the matching optional replacement. Falls
/// back to the unmodified source (logging a warning) if re-parsing the
/// captured span fails, which should only happen for syntax this
/// workspace's parser subset doesn't cover.
#[allow(clippy::too_many_arguments)]
pub fn rewrite_closure_source(
    source: &str,
    substitutions: &FxHashMap<String, String>,
    is_arrow: bool,
    this_replacement: Option<&str>,
    arguments_replacement: Option<&str>,
    new_target_replacement: Option<&str>,
) -> String {
    if substitutions.is_empty() && (!is_arrow || (this_replacement.is_none() && arguments_replacement.is_none() && new_target_replacement.is_none()))
    {
        return source.to_string();
    }
    let is_expression_shaped = classify(source);
    let prefix_len = if is_expression_shaped { 1 } else { 2 };
    let wrapped =
        if is_expression_shaped { format!("({source})") } else { format!("({{{source}}})") };

    let (arena, mut interner, root) = match revive_parser::parse(&wrapped, SourceKind::Script) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(error = %err, "function source rewriting fell back to verbatim text: reparse failed");
            return source.to_string();
        }
    };
    let eval_atom = interner.intern("eval");
    let analysis = revive_scope::analyze(&arena, root, SourceKind::Script, eval_atom);

    let mut replacements = Vec::new();
    collect_replacements(
        &arena,
        &interner,
        &analysis,
        root,
        substitutions,
        is_arrow,
        this_replacement,
        arguments_replacement,
        new_target_replacement,
        &mut replacements,
    );
    replacements.sort_by_key(|r| r.span.start);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0u32;
    for r in &replacements {
        let start = r.span.start.saturating_sub(prefix_len);
        let end = r.span.end.saturating_sub(prefix_len);
        if start < cursor || (end as usize) > source.len() {
            // Overlapping or out-of-range replacement: our span bookkeeping
            // has a bug somewhere upstream; skip rather than corrupt output.
            continue;
        }
        out.push_str(&source[cursor as usize..start as usize]);
        out.push_str(&r.text);
        cursor = end;
    }
    out.push_str(&source[cursor as usize..]);
    out
}

#[allow(clippy::too_many_arguments)]
fn collect_replacements(
    arena: &revive_ast::NodeArena,
    interner: &revive_common::Interner,
    analysis: &revive_scope::AnalysisResult,
    node: revive_ast::NodeId,
    substitutions: &FxHashMap<String, String>,
    is_arrow: bool,
    this_replacement: Option<&str>,
    arguments_replacement: Option<&str>,
    new_target_replacement: Option<&str>,
    out: &mut Vec<Replacement>,
) {
    let kind = arena.kind(node);
    match kind {
        NodeKind::Identifier(atom) => {
            let name = interner.resolve(*atom);
            if let Some(revive_scope::Resolution::Free(_)) = analysis.resolutions.get(node) {
                if let Some(replacement) = substitutions.get(name) {
                    out.push(Replacement { span: arena.get(node).span, text: replacement.clone() });
                } else if is_arrow && name == "arguments" {
                    if let Some(text) = arguments_replacement {
                        out.push(Replacement { span: arena.get(node).span, text: text.to_string() });
                    }
                }
            }
        }
        NodeKind::ThisExpr if is_arrow => {
            if let Some(text) = this_replacement {
                out.push(Replacement { span: arena.get(node).span, text: text.to_string() });
            }
        }
        NodeKind::MetaProperty { meta, property } if is_arrow => {
            if interner.resolve(*meta) == "new" && interner.resolve(*property) == "target" {
                if let Some(text) = new_target_replacement {
                    out.push(Replacement { span: arena.get(node).span, text: text.to_string() });
                }
            }
        }
        _ => {}
    }
    for child in visit::children(kind) {
        collect_replacements(
            arena,
            interner,
            analysis,
            child,
            substitutions,
            is_arrow,
            this_replacement,
            arguments_replacement,
            new_target_replacement,
            out,
        );
    }
}

#[cfg(test)]
#[path = "../tests/rewrite.rs"]
mod tests;
