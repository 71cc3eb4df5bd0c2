//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::hex_utils::parse_address;

#[derive(Parser)]
#[command(name = "mss65")]
#[command(version, about = "MSS65 calibration patcher")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply a feature request to a firmware image
    Patch {
        /// Firmware image to read
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the patched image
        #[arg(short, long)]
        output: PathBuf,

        /// Patch library (JSON)
        #[arg(short, long, env = "MSS65_LIBRARY", default_value = "patches.json")]
        library: PathBuf,

        /// Feature request (TOML)
        #[arg(short, long, default_value = "features.toml")]
        features: PathBuf,

        /// Also write a JSON manifest of applied patches
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Patch images whose length matches no known variant
        #[arg(long)]
        allow_unknown: bool,
    },

    /// Show the detected variant and offset table of an image
    Info {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List the patches in a library
    Library {
        #[arg(short, long, env = "MSS65_LIBRARY", default_value = "patches.json")]
        library: PathBuf,

        /// Decode every payload and report the first failure
        #[arg(long)]
        validate: bool,
    },

    /// Dump bytes of an image
    Hexdump {
        #[arg(short, long)]
        input: PathBuf,

        /// Start address (decimal or 0x-prefixed hex)
        #[arg(short, long, value_parser = parse_address)]
        address: u64,

        /// Number of bytes
        #[arg(short, long, default_value_t = 64)]
        size: usize,

        /// Show ASCII column
        #[arg(long)]
        ascii: bool,
    },

    /// List byte ranges that differ between two images
    Diff {
        original: PathBuf,
        patched: PathBuf,

        /// Maximum number of ranges to print
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// Print a feature request template
    Template {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_hexdump_address() {
        let cli = Cli::parse_from([
            "mss65", "hexdump", "-i", "ecu.bin", "-a", "0x1F0A8", "-s", "16",
        ]);
        match cli.command {
            Command::Hexdump { address, size, .. } => {
                assert_eq!(address, 0x1F0A8);
                assert_eq!(size, 16);
            }
            _ => panic!("expected hexdump"),
        }
    }

    #[test]
    fn test_parse_patch_defaults() {
        let cli = Cli::parse_from(["mss65", "patch", "-i", "in.bin", "-o", "out.bin"]);
        match cli.command {
            Command::Patch {
                features,
                manifest,
                allow_unknown,
                ..
            } => {
                assert_eq!(features, PathBuf::from("features.toml"));
                assert!(manifest.is_none());
                assert!(!allow_unknown);
            }
            _ => panic!("expected patch"),
        }
    }
}
