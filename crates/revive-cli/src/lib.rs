//! CLI support for the `revive` binary: argument parsing, the
//! instrument/serialize drivers, diagnostic rendering, and tracing setup,
//! laid out one module per concern (`args`, `driver`, `reporter`,
//! `tracing_config`).

use clap::Parser;

pub mod args;
pub mod driver;
pub mod reporter;
pub mod tracing_config;

pub use args::{CliArgs, Command};

/// Parses `std::env::args`, initializes tracing, and dispatches to the
/// requested subcommand. The `revive` binary's `main` is just this call.
pub fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    tracing_config::init(args.log_level.as_deref());
    match args.command {
        Command::Instrument(instrument_args) => driver::run_instrument(instrument_args),
        Command::Serialize(serialize_args) => driver::run_serialize(serialize_args),
    }
}
