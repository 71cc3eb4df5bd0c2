use serde::Serialize;

use crate::variant::FirmwareVariant;

/// A single completed write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedPatch {
    /// Library patch name, or the feature step for computed writes
    pub name: String,
    pub address: u64,
    pub len: usize,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub variant: FirmwareVariant,
    pub image_len: usize,
    pub applied: Vec<AppliedPatch>,
}

impl PatchReport {
    pub fn new(variant: FirmwareVariant, image_len: usize) -> Self {
        Self {
            variant,
            image_len,
            applied: Vec::new(),
        }
    }

    /// Total bytes written across all patches, counting overlaps twice
    pub fn bytes_written(&self) -> usize {
        self.applied.iter().map(|p| p.len).sum()
    }

    pub fn patch_count(&self) -> usize {
        self.applied.len()
    }
}
