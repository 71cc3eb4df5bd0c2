//! Library command implementation.

use std::path::Path;

use anyhow::Result;
use mss65_core::load_library;
use owo_colors::OwoColorize;

use super::with_path;

/// Run the library command
pub fn run(path: &Path, validate: bool) -> Result<()> {
    let library = with_path(load_library(path), "Patch library", path)?;

    println!("{} patches in {}", library.len(), path.display());
    println!();

    let mut failures = 0usize;
    for descriptor in library.iter() {
        let address = descriptor
            .address
            .as_ref()
            .map(|rule| rule.to_string())
            .unwrap_or_else(|| "(default)".to_string());

        match descriptor.payload() {
            Ok(payload) => {
                println!(
                    "  {:<24} {:>6} bytes  @ {}",
                    descriptor.name,
                    payload.len(),
                    address
                );
            }
            Err(e) => {
                failures += 1;
                println!("  {:<24} {}", descriptor.name, e.red());
            }
        }
    }

    if validate {
        println!();
        library.validate()?;
        println!("{}", "All payloads decode".green());
    } else if failures > 0 {
        println!();
        println!("{} entries failed to decode", failures);
    }

    Ok(())
}
