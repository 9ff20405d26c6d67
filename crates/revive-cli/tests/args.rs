use super::*;
use clap::Parser;

#[test]
fn instrument_defaults_to_stdin_and_script_kind() {
    let args = CliArgs::try_parse_from(["revive", "instrument"]).expect("should parse");
    let Command::Instrument(instrument) = args.command else {
        panic!("expected instrument subcommand");
    };
    assert!(instrument.inputs.is_empty());
    assert!(matches!(instrument.kind, SourceKindArg::Script));
    assert!(instrument.out.is_none());
}

#[test]
fn instrument_accepts_multiple_inputs_and_module_kind() {
    let args = CliArgs::try_parse_from(["revive", "instrument", "--kind", "module", "a.js", "b.js", "--out", "out"])
        .expect("should parse");
    let Command::Instrument(instrument) = args.command else {
        panic!("expected instrument subcommand");
    };
    assert_eq!(instrument.inputs, vec![std::path::PathBuf::from("a.js"), std::path::PathBuf::from("b.js")]);
    assert!(matches!(instrument.kind, SourceKindArg::Module));
    assert_eq!(instrument.out.as_deref(), Some(std::path::Path::new("out")));
}

#[test]
fn serialize_defaults() {
    let args = CliArgs::try_parse_from(["revive", "serialize"]).expect("should parse");
    let Command::Serialize(serialize) = args.command else {
        panic!("expected serialize subcommand");
    };
    assert!(serialize.input.is_none());
    assert!(serialize.exports.is_empty());
    assert!(matches!(serialize.format, FormatArg::Bare));
    assert!(!serialize.minify);
    assert!(!serialize.mangle);
    assert!(!serialize.no_inline);
    assert!(!serialize.entries);
    assert!(!serialize.strict_env);
    assert!(!serialize.include_source_map);
    assert!(!serialize.allow_missing_capture);
}

#[test]
fn serialize_accepts_repeated_export_flags_and_format() {
    let args = CliArgs::try_parse_from([
        "revive",
        "serialize",
        "--export",
        "foo",
        "--export",
        "bar",
        "--format",
        "default-export",
        "--mangle",
        "--minify",
        "input.js",
    ])
    .expect("should parse");
    let Command::Serialize(serialize) = args.command else {
        panic!("expected serialize subcommand");
    };
    assert_eq!(serialize.exports, vec!["foo".to_string(), "bar".to_string()]);
    assert!(matches!(serialize.format, FormatArg::DefaultExport));
    assert!(serialize.mangle);
    assert!(serialize.minify);
    assert_eq!(serialize.input.as_deref(), Some(std::path::Path::new("input.js")));
}

#[test]
fn log_level_is_a_global_flag_on_either_subcommand() {
    let args = CliArgs::try_parse_from(["revive", "--log-level", "debug", "instrument"]).expect("should parse");
    assert_eq!(args.log_level.as_deref(), Some("debug"));

    let args = CliArgs::try_parse_from(["revive", "serialize", "--log-level", "trace"]).expect("should parse");
    assert_eq!(args.log_level.as_deref(), Some("trace"));
}

#[test]
fn source_kind_and_format_convert_to_common_types() {
    assert_eq!(revive_common::SourceKind::from(SourceKindArg::Script), revive_common::SourceKind::Script);
    assert_eq!(revive_common::SourceKind::from(SourceKindArg::Module), revive_common::SourceKind::Module);
    assert_eq!(revive_common::OutputFormat::from(FormatArg::Bare), revive_common::OutputFormat::BareExpression);
    assert_eq!(revive_common::OutputFormat::from(FormatArg::SingleExport), revive_common::OutputFormat::SingleExportModule);
    assert_eq!(revive_common::OutputFormat::from(FormatArg::DefaultExport), revive_common::OutputFormat::DefaultExportModule);
}
