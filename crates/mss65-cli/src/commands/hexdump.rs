//! Hexdump command implementation.
//!
//! Displays image bytes in traditional hexdump format, useful for checking
//! calibration fields before and after patching.
//!
//! # Output Format
//!
//! ```text
//! 0x1F0A8: 01 00 00 00 00 00 00 00  00 00 00 00 00 00 00 00  |................|
//! ```

use std::path::Path;

use anyhow::{Result, bail};
use mss65_core::BinaryImage;

use super::with_path;

/// Run the hexdump command
pub fn run(input: &Path, address: u64, size: usize, ascii: bool) -> Result<()> {
    let image = with_path(BinaryImage::load(input), "Input image", input)?;
    let start = usize::try_from(address)?;
    let size = size.min(image.len().saturating_sub(start));
    let Some(bytes) = image.read(start, size).filter(|b| !b.is_empty()) else {
        bail!(
            "Address 0x{:X} is outside the image ({} bytes)",
            address,
            image.len()
        );
    };

    println!("Hexdump at 0x{:X} ({} bytes):", address, size);
    println!();

    for line in format_lines(start, bytes, ascii) {
        println!("{}", line);
    }

    Ok(())
}

fn format_lines(start: usize, bytes: &[u8], ascii: bool) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, chunk) in bytes.chunks(16).enumerate() {
        let mut line = format!("0x{:05X}: ", start + i * 16);

        // Hex bytes
        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                line.push(' ');
            }
            line.push_str(&format!("{:02X} ", byte));
        }

        // Padding for incomplete lines
        for j in chunk.len()..16 {
            if j == 8 {
                line.push(' ');
            }
            line.push_str("   ");
        }

        // ASCII representation
        if ascii {
            line.push_str(" |");
            for byte in chunk {
                if (0x20..0x7F).contains(byte) {
                    line.push(*byte as char);
                } else {
                    line.push('.');
                }
            }
            for _ in chunk.len()..16 {
                line.push(' ');
            }
            line.push('|');
        }

        lines.push(line.trim_end().to_string());
    }

    lines
}
