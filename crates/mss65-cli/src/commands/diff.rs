//! Diff command implementation.

use std::path::Path;

use anyhow::Result;
use mss65_core::{BinaryImage, format_hex};
use owo_colors::OwoColorize;

use super::with_path;

/// Bytes shown per side for each changed range
const PREVIEW_BYTES: usize = 16;

/// Run the diff command
pub fn run(original: &Path, patched: &Path, limit: usize) -> Result<()> {
    let before = with_path(BinaryImage::load(original), "Original image", original)?;
    let after = with_path(BinaryImage::load(patched), "Patched image", patched)?;

    if before.len() != after.len() {
        println!(
            "{} lengths differ: {} vs {} bytes",
            "Warning:".yellow(),
            before.len(),
            after.len()
        );
    }

    let ranges = before.diff(&after);
    let changed: usize = ranges.iter().map(|r| r.len).sum();

    for range in ranges.iter().take(limit) {
        let preview = range.len.min(PREVIEW_BYTES);
        let old = before.read(range.start, preview).map(format_hex).unwrap_or_default();
        let new = after.read(range.start, preview).map(format_hex).unwrap_or_default();
        let more = if range.len > PREVIEW_BYTES { " ..." } else { "" };

        println!(
            "{} (+{} bytes)",
            format!("0x{:05X}", range.start).cyan(),
            range.len
        );
        println!("  - {}{}", old.red(), more);
        println!("  + {}{}", new.green(), more);
    }

    println!();
    println!("{} ranges, {} bytes changed", ranges.len(), changed);
    if ranges.len() > limit {
        println!("(limit reached, use --limit to increase)");
    }

    Ok(())
}
