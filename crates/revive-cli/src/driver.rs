//! The `revive` binary's two subcommands: read input, run the pipeline,
//! write output, report diagnostics through `anyhow`.

use crate::args::{InstrumentArgs, SerializeArgs};
use crate::reporter::print_diagnostic;
use anyhow::{bail, Context, Result};
use revive_common::SourceKind;
use revive_emit::{SerializeOptions, SerializeOutput};
use revive_host::{Host, HostValue, PropertyKey, TreeWalkHost};
use revive_instrument::instrument;
use revive_tracker::EvalContext;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p).with_context(|| format!("reading {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// `revive instrument`: parses and instruments `args.inputs`, then prints
/// the (unchanged, per `revive-instrument`'s side-table design — see
/// `args.rs`'s doc comment) source alongside the info-records blob.
///
/// A single file (or stdin) runs inline. More than one file instruments
/// each independently across a `rayon` pool, since each file is an
/// unrelated input to the same pure `instrument` call and needs no shared
/// incremental cache between them.
pub fn run_instrument(args: InstrumentArgs) -> Result<()> {
    if args.inputs.len() <= 1 {
        let source = read_input(args.inputs.first().map(PathBuf::as_path))?;
        let text = instrument_one(&source, args.kind.into())?;
        return write_output(args.out.as_deref(), &text);
    }

    let sources: Vec<(PathBuf, String)> = args
        .inputs
        .iter()
        .map(|path| Ok((path.clone(), fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?)))
        .collect::<Result<_>>()?;

    let kind = args.kind.into();
    let results: Vec<(PathBuf, Result<String>)> =
        sources.into_par_iter().map(|(path, source)| (path.clone(), instrument_one(&source, kind))).collect();

    let out_dir = args.out.as_deref().context("--out <DIR> is required when instrumenting more than one file")?;
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    for (path, result) in results {
        let text = result.with_context(|| format!("instrumenting {}", path.display()))?;
        let file_name = path.file_name().context("input path has no file name")?;
        fs::write(out_dir.join(file_name).with_extension("json"), text)
            .with_context(|| format!("writing output for {}", path.display()))?;
    }
    Ok(())
}

fn instrument_one(source: &str, kind: SourceKind) -> Result<String> {
    let instrumented = instrument(source, kind).map_err(|e| {
        if let revive_instrument::InstrumentError::Parse(d) = &e {
            print_diagnostic(d);
        }
        anyhow::anyhow!("instrumentation failed: {e}")
    })?;

    let blob = info_records_json(&instrumented);
    let payload = serde_json::json!({
        "source": source,
        "source_kind": format!("{:?}", instrumented.source_kind),
        "info_records": blob,
        "registration_count": instrumented.registrations.len(),
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}

fn info_records_json(instrumented: &revive_instrument::Instrumented) -> serde_json::Value {
    let records: Vec<serde_json::Value> = instrumented
        .info_records
        .values()
        .map(|record| {
            let free_names: Vec<serde_json::Value> = record
                .free_names
                .iter()
                .map(|fr| {
                    serde_json::json!({
                        "name": instrumented.interner.resolve(fr.name),
                        "usages": fr.usages.iter().map(|u| format!("{u:?}")).collect::<Vec<_>>(),
                    })
                })
                .collect();
            serde_json::json!({
                "function": record.function.0,
                "free_names": free_names,
                "uses_this": record.uses_this,
                "uses_arguments": record.uses_arguments,
                "uses_new_target": record.uses_new_target,
                "uses_super": record.uses_super,
                "uses_direct_eval": record.uses_direct_eval,
                "strictness": format!("{:?}", record.strictness),
                "wildcard_capture": record.wildcard_capture,
            })
        })
        .collect();
    serde_json::Value::Array(records)
}

/// `revive serialize`: evaluates `args.input` with the reference
/// tree-walking host, picks out the requested export(s), builds the value
/// graph, and emits host-language source text per `args`' options.
///
/// Convention for picking exports out of a plain script: the script's completion value is expected to be a plain
/// object whose own properties are the values to serialize. `--export`
/// selects specific properties by name; with none given, every own
/// property is serialized.
pub fn run_serialize(args: SerializeArgs) -> Result<()> {
    let source = read_input(args.input.as_deref())?;
    let host = TreeWalkHost::new();
    let completion =
        host.evaluate(&source, EvalContext::new(SourceKind::Script, None)).map_err(|e| anyhow::anyhow!("evaluation failed: {e}"))?;

    let roots = collect_roots(host.as_ref(), &completion, &args.exports)?;

    let graph = revive_graph::build_value_graph(host.as_ref(), roots).map_err(|e| anyhow::anyhow!("{e}"))?;

    let options = SerializeOptions {
        format: args.format.into(),
        minify: args.minify,
        mangle: args.mangle,
        inline: !args.no_inline,
        entries: if args.entries { Some(revive_emit::Entries::PerRoot) } else { None },
        strict_env: args.strict_env,
        include_source_map: args.include_source_map,
        allow_missing_capture: args.allow_missing_capture,
    };

    let output = revive_emit::serialize(&graph, &options).map_err(|e| match &e {
        revive_emit::EmitError::Unserializable(d) | revive_emit::EmitError::NameCollision(d) | revive_emit::EmitError::MissingCapture(d) => {
            print_diagnostic(d);
            anyhow::anyhow!("serialization failed: {e}")
        }
        revive_emit::EmitError::Internal(_) => anyhow::anyhow!("serialization failed: {e}"),
    })?;

    write_serialize_output(args.out.as_deref(), output)
}

fn collect_roots(host: &TreeWalkHost, completion: &HostValue, exports: &[String]) -> Result<Vec<(Rc<str>, HostValue)>> {
    if completion.as_object().is_none() {
        if !exports.is_empty() {
            bail!("script completion value is not an object; cannot select named exports");
        }
        return Ok(vec![(Rc::from("root"), completion.clone())]);
    }
    if exports.is_empty() {
        let mut roots = Vec::new();
        for key in host.own_keys(completion) {
            if let PropertyKey::String(name) = &key {
                if let Some(descriptor) = host.get_own_property(completion, &key) {
                    if let Some(value) = descriptor.value() {
                        roots.push((Rc::from(name.as_ref()), value.clone()));
                    }
                }
            }
        }
        if roots.is_empty() {
            bail!("script completion value has no own properties to serialize");
        }
        return Ok(roots);
    }
    let mut roots = Vec::new();
    for name in exports {
        let key = PropertyKey::String(Rc::from(name.as_str()));
        let descriptor = host.get_own_property(completion, &key).with_context(|| format!("no export named `{name}`"))?;
        let value = descriptor.value().cloned().with_context(|| format!("`{name}` is an accessor, not a data property"))?;
        roots.push((Rc::from(name.as_str()), value));
    }
    Ok(roots)
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => fs::write(path, text).with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn write_serialize_output(out: Option<&Path>, output: SerializeOutput) -> Result<()> {
    match output {
        SerializeOutput::Single(text) => write_output(out, &text),
        SerializeOutput::Files(files) => match out {
            Some(dir) => {
                fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
                for (name, text) in files {
                    fs::write(dir.join(&name), text).with_context(|| format!("writing {name}"))?;
                }
                Ok(())
            }
            None => {
                let mut stdout = std::io::stdout();
                for (name, text) in files {
                    writeln!(stdout, "// ---- {name} ----")?;
                    writeln!(stdout, "{text}")?;
                }
                Ok(())
            }
        },
    }
}

#[cfg(test)]
#[path = "../tests/driver.rs"]
mod tests;
