//! Patch command implementation.
//!
//! Loads the image, library and feature request, runs the engine on a
//! private copy and writes the result only if every step succeeded.

use std::path::Path;

use anyhow::{Result, bail};
use mss65_core::{
    BinaryImage, FeatureComposer, PatchEngine, PatchManifest, PatchOutcome, load_library,
    resolve_offsets,
};
use owo_colors::OwoColorize;
use tracing::{error, info, warn};

use crate::config::load_request;
use crate::hex_utils::format_hex_address;

use super::with_path;

pub struct PatchArgs<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub library: &'a Path,
    pub features: &'a Path,
    pub manifest: Option<&'a Path>,
    pub allow_unknown: bool,
}

/// Run the patch command
pub fn run(args: PatchArgs<'_>) -> Result<()> {
    let outcome = execute(&args)?;

    for patch in &outcome.report.applied {
        println!(
            "  {:<28} {:>10} {:>5} bytes",
            patch.name,
            format_hex_address(patch.address),
            patch.len
        );
    }
    println!(
        "{} {} bytes processed ({}), {} bytes written by {} patches -> {}",
        "Done:".green(),
        outcome.image.len(),
        outcome.report.variant,
        outcome.report.bytes_written(),
        outcome.report.patch_count(),
        args.output.display()
    );

    Ok(())
}

/// Patch `args.input` into `args.output`, plus the manifest if requested.
///
/// Nothing is written unless the whole run succeeds.
fn execute(args: &PatchArgs<'_>) -> Result<PatchOutcome> {
    let image = with_path(BinaryImage::load(args.input), "Input image", args.input)?;
    info!("Loaded {} bytes from {}", image.len(), args.input.display());

    let resolution = resolve_offsets(image.len());
    if !resolution.is_recognized() {
        if !args.allow_unknown {
            bail!(
                "{} does not match a known MSS65 layout ({}); use --allow-unknown to patch with neutral offsets",
                args.input.display(),
                resolution.variant
            );
        }
        warn!("Continuing with neutral offsets on an unrecognized image");
    }

    let library = with_path(load_library(args.library), "Patch library", args.library)?;
    library.validate()?;

    let request = load_request(args.features)?;
    if request.is_empty() {
        warn!("Feature request enables nothing; output will match input");
    }

    let missing = library.missing(&FeatureComposer::required_patches(&request));
    if !missing.is_empty() {
        bail!("Patch library is missing: {}", missing.join(", "));
    }

    let engine = PatchEngine::new(library);
    let outcome = match engine.run(image.as_bytes(), &request) {
        Ok(outcome) => outcome,
        Err(e) => {
            let patch = e.patch_name().unwrap_or("unknown");
            error!("Patch '{}' failed: {}", patch, e);
            bail!("Patching aborted at '{}', no output written: {}", patch, e);
        }
    };

    outcome.image.save(args.output)?;

    if let Some(path) = args.manifest {
        PatchManifest::from_report(&outcome.report, &request).save(path)?;
        info!("Saved manifest to {}", path.display());
    }

    Ok(outcome)
}
