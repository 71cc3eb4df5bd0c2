use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod hex_utils;

use cli::{Cli, Command};

/// Engine crate and this binary
const LOG_TARGETS: [&str; 2] = ["mss65_core", env!("CARGO_BIN_NAME")];

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let mut filter = EnvFilter::from_default_env();
    for target in LOG_TARGETS {
        filter = filter.add_directive(format!("{}={}", target, level).parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Patch {
            input,
            output,
            library,
            features,
            manifest,
            allow_unknown,
        } => commands::patch::run(commands::patch::PatchArgs {
            input: &input,
            output: &output,
            library: &library,
            features: &features,
            manifest: manifest.as_deref(),
            allow_unknown,
        }),
        Command::Info { input } => commands::info::run(&input),
        Command::Library { library, validate } => commands::library::run(&library, validate),
        Command::Hexdump {
            input,
            address,
            size,
            ascii,
        } => commands::hexdump::run(&input, address, size, ascii),
        Command::Diff {
            original,
            patched,
            limit,
        } => commands::diff::run(&original, &patched, limit),
        Command::Template { output } => commands::template::run(output.as_deref()),
    }
}
