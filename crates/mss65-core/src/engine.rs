//! One-shot patch runs.
//!
//! A run resolves the variant once, copies the input into a private buffer,
//! composes the requested features and hands back the patched buffer
//! together with a [`PatchReport`]. The caller's bytes are never mutated.
//!
//! A failed run returns only the error; the partially patched buffer is
//! dropped so it cannot be mistaken for a usable image.

use tracing::{info, warn};

use crate::error::Result;
use crate::feature::{FeatureComposer, FeatureRequest};
use crate::image::BinaryImage;
use crate::patch::{PatchLibrary, PatchReport};
use crate::variant::resolve_offsets;

/// Patched image and what was written to it
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub image: BinaryImage,
    pub report: PatchReport,
}

/// Owns the process-wide patch library and runs feature requests against it
#[derive(Debug, Clone)]
pub struct PatchEngine {
    library: PatchLibrary,
    default_offset: u64,
}

impl PatchEngine {
    pub fn new(library: PatchLibrary) -> Self {
        Self {
            library,
            default_offset: 0,
        }
    }

    /// Address for library patches without an address rule
    pub fn with_default_offset(mut self, default_offset: u64) -> Self {
        self.default_offset = default_offset;
        self
    }

    pub fn library(&self) -> &PatchLibrary {
        &self.library
    }

    /// Patch a copy of `input` with everything in `request`
    pub fn run(&self, input: &[u8], request: &FeatureRequest) -> Result<PatchOutcome> {
        let resolution = resolve_offsets(input.len());
        if !resolution.is_recognized() {
            warn!("Patching an image of unknown layout; addresses may be wrong");
        }

        let mut image = BinaryImage::from_bytes(input.to_vec());
        let applied = FeatureComposer::new(&self.library, &resolution.table)
            .with_default_offset(self.default_offset)
            .apply(&mut image, request)?;

        let mut report = PatchReport::new(resolution.variant, image.len());
        report.applied = applied;

        info!(
            "Applied {} patches ({} bytes written) to {} byte image",
            report.patch_count(),
            report.bytes_written(),
            report.image_len
        );

        Ok(PatchOutcome { image, report })
    }
}
