//! Info command implementation.

use std::path::Path;

use anyhow::Result;
use mss65_core::{BinaryImage, resolve_offsets};
use owo_colors::OwoColorize;

use super::with_path;

/// Run the info command
pub fn run(input: &Path) -> Result<()> {
    let image = with_path(BinaryImage::load(input), "Input image", input)?;
    let resolution = resolve_offsets(image.len());

    println!("File:    {}", input.display());
    println!("Length:  {} bytes (0x{:X})", image.len(), image.len());
    if resolution.is_recognized() {
        println!("Variant: {}", resolution.variant.green());
    } else {
        println!(
            "Variant: {} (patching would use neutral offsets)",
            resolution.variant.yellow()
        );
    }
    println!();
    println!("Offsets:");
    for (slot, value) in resolution.table.iter() {
        println!("  {:<18} {}", slot, value);
    }

    Ok(())
}
