use super::*;
use crate::args::{FormatArg, SourceKindArg};
use std::path::PathBuf;

fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn instrument_single_file_writes_info_records() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_temp(&dir, "a.js", "function f(x) { return x + 1; }\nf(1);");
    let out = dir.path().join("a.json");

    run_instrument(InstrumentArgs { inputs: vec![input], kind: SourceKindArg::Script, out: Some(out.clone()) }).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    let payload: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(payload["source"].as_str().unwrap().contains("function f"));
    assert_eq!(payload["source_kind"], "Script");
    assert!(payload["info_records"].is_array());
}

#[test]
fn instrument_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_temp(&dir, "bad.js", "function f( {");

    let result = run_instrument(InstrumentArgs { inputs: vec![input], kind: SourceKindArg::Script, out: None });
    assert!(result.is_err());
}

#[test]
fn instrument_multiple_files_requires_out_directory() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_temp(&dir, "a.js", "1;");
    let b = write_temp(&dir, "b.js", "2;");

    let result = run_instrument(InstrumentArgs { inputs: vec![a, b], kind: SourceKindArg::Script, out: None });
    assert!(result.is_err());
}

#[test]
fn instrument_multiple_files_writes_one_output_per_input() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_temp(&dir, "a.js", "const a = 1;");
    let b = write_temp(&dir, "b.js", "const b = 2;");
    let out_dir = dir.path().join("out");

    run_instrument(InstrumentArgs { inputs: vec![a, b], kind: SourceKindArg::Script, out: Some(out_dir.clone()) }).unwrap();

    assert!(out_dir.join("a.json").exists());
    assert!(out_dir.join("b.json").exists());
}

fn base_serialize_args(input: PathBuf) -> SerializeArgs {
    SerializeArgs {
        input: Some(input),
        exports: Vec::new(),
        format: FormatArg::Bare,
        minify: false,
        mangle: false,
        no_inline: false,
        entries: false,
        strict_env: false,
        include_source_map: false,
        allow_missing_capture: false,
        out: None,
    }
}

#[test]
fn serialize_bare_object_completion() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_temp(&dir, "script.js", "({ a: 1, b: [2, 3] })");
    let out = dir.path().join("out.js");

    let mut args = base_serialize_args(input);
    args.out = Some(out.clone());
    run_serialize(args).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("__root_a"));
    assert!(text.contains("__root_b"));
}

#[test]
fn serialize_selects_named_exports_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_temp(&dir, "script.js", "({ a: 1, b: 2, c: 3 })");
    let out = dir.path().join("out.js");

    let mut args = base_serialize_args(input);
    args.exports = vec!["b".to_string()];
    args.out = Some(out.clone());
    run_serialize(args).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("__root_b"));
    assert!(!text.contains("__root_a"));
    assert!(!text.contains("__root_c"));
}

#[test]
fn serialize_rejects_unknown_export_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_temp(&dir, "script.js", "({ a: 1 })");

    let mut args = base_serialize_args(input);
    args.exports = vec!["missing".to_string()];
    let result = run_serialize(args);
    assert!(result.is_err());
}

#[test]
fn serialize_rejects_non_object_completion_with_requested_exports() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_temp(&dir, "script.js", "42");

    let mut args = base_serialize_args(input);
    args.exports = vec!["a".to_string()];
    let result = run_serialize(args);
    assert!(result.is_err());
}

#[test]
fn serialize_default_export_module_wraps_single_root() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_temp(&dir, "script.js", "({ only: 1 })");
    let out = dir.path().join("out.js");

    let mut args = base_serialize_args(input);
    args.exports = vec!["only".to_string()];
    args.format = FormatArg::DefaultExport;
    args.out = Some(out.clone());
    run_serialize(args).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("export default"));
}

#[test]
fn serialize_with_entries_writes_one_file_per_root_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_temp(&dir, "script.js", "const shared = { x: 1 };\n({ a: shared, b: shared })");
    let out_dir = dir.path().join("out");

    let mut args = base_serialize_args(input);
    args.entries = true;
    args.out = Some(out_dir.clone());
    run_serialize(args).unwrap();

    assert!(out_dir.join("a.js").exists());
    assert!(out_dir.join("b.js").exists());
    let entries: Vec<String> = fs::read_dir(&out_dir).unwrap().map(|e| e.unwrap().file_name().to_string_lossy().into_owned()).collect();
    assert!(entries.iter().any(|name| name.starts_with("common.")));
}
