//! Template command implementation.

use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::config::TEMPLATE;

/// Run the template command
pub fn run(output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, TEMPLATE)?;
            eprintln!("Wrote feature request template to {}", path.display());
        }
        None => print!("{}", TEMPLATE),
    }
    Ok(())
}
