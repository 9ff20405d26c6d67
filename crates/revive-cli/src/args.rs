//! CLI arguments for the `revive` binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "revive", version, about = "Live-value serializer and instrumenter")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Overrides `RUST_LOG` for this invocation.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Instrument a source file (or stdin) and print the result.
    ///
    /// This workspace's instrumenter is side-table based rather than a
    /// literal AST splice (see `revive-instrument::transform`'s module
    /// docs), so the "transformed source text" the caller gets back is the
    /// original source, unchanged; everything the instrumenter adds comes
    /// back as the info-records blob printed alongside it.
    Instrument(InstrumentArgs),
    /// Evaluate a script with the reference tree-walking host, then
    /// serialize one or more of its top-level bindings.
    Serialize(SerializeArgs),
}

#[derive(Parser, Debug)]
pub struct InstrumentArgs {
    /// Source files to instrument. Reads stdin as a single module when
    /// omitted. Given more than one, each file is an independent input to
    /// the same pure function and is instrumented across a `rayon` pool.
    pub inputs: Vec<PathBuf>,

    #[arg(long, value_enum, default_value = "script")]
    pub kind: SourceKindArg,

    /// Write the info-records blob(s) to this path instead of stdout. A
    /// directory when more than one input file is given (one JSON file per
    /// input, named after it); a single file otherwise.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SerializeArgs {
    /// Script file to evaluate. Reads stdin when omitted.
    pub input: Option<PathBuf>,

    /// Top-level `var`/`let`/`const`/function-declaration names to
    /// serialize, in order. Defaults to every global binding the script
    /// introduced if none are given.
    #[arg(long = "export", value_name = "NAME")]
    pub exports: Vec<String>,

    #[arg(long, value_enum, default_value = "bare")]
    pub format: FormatArg,

    #[arg(long)]
    pub minify: bool,

    #[arg(long)]
    pub mangle: bool,

    /// Disable inlining single-use acyclic values (on by default).
    #[arg(long)]
    pub no_inline: bool,

    /// Enable multi-file code splitting, one file per serialized root.
    #[arg(long)]
    pub entries: bool,

    #[arg(long = "strict-env")]
    pub strict_env: bool,

    #[arg(long = "include-source-map")]
    pub include_source_map: bool,

    /// Emit the function's source verbatim instead of erroring when a
    /// closure has no capture descriptor.
    #[arg(long)]
    pub allow_missing_capture: bool,

    /// Write output here. A directory when `--entries` is set (one file
    /// per root is written inside it); a single file otherwise. Prints to
    /// stdout when omitted.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SourceKindArg {
    Script,
    Module,
}

impl From<SourceKindArg> for revive_common::SourceKind {
    fn from(value: SourceKindArg) -> Self {
        match value {
            SourceKindArg::Script => revive_common::SourceKind::Script,
            SourceKindArg::Module => revive_common::SourceKind::Module,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum FormatArg {
    Bare,
    SingleExport,
    DefaultExport,
}

impl From<FormatArg> for revive_common::OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Bare => revive_common::OutputFormat::BareExpression,
            FormatArg::SingleExport => revive_common::OutputFormat::SingleExportModule,
            FormatArg::DefaultExport => revive_common::OutputFormat::DefaultExportModule,
        }
    }
}

#[cfg(test)]
#[path = "../tests/args.rs"]
mod tests;
