//! `revive` binary entry point. All argument parsing, tracing setup, and
//! subcommand dispatch lives in `revive-cli`; this is just the thin `main`
//! the `cli` feature wires up.

fn main() -> anyhow::Result<()> {
    revive_cli::run()
}
