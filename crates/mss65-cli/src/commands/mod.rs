//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

use std::path::Path;

use anyhow::anyhow;

pub mod diff;
pub mod hexdump;
pub mod info;
pub mod library;
pub mod patch;
pub mod template;

/// Replace a bare "file not found" IO error with one naming the file
pub(crate) fn with_path<T>(
    result: mss65_core::Result<T>,
    what: &str,
    path: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| {
        if e.is_not_found() {
            anyhow!("{} not found: {}", what, path.display())
        } else {
            anyhow::Error::from(e).context(format!("{} {}", what, path.display()))
        }
    })
}
