//! # mss65-core
//!
//! Binary patch engine for MSS65 engine-control-unit calibration dumps.
//!
//! This crate provides:
//! - Firmware variant detection (image length to offset table)
//! - Patch descriptors, hex payload decoding and a bounds-checked applier
//! - The patch library loaded from JSON
//! - Feature requests and the composer that turns them into writes
//! - Run reports and JSON manifests of applied patches
//!
//! ## Example
//!
//! ```ignore
//! use mss65_core::{FeatureRequest, PatchEngine, load_library};
//!
//! let library = load_library("patches.json")?;
//! let engine = PatchEngine::new(library);
//!
//! let request = FeatureRequest { alphan: true, ..Default::default() };
//! let outcome = engine.run(&bytes, &request)?;
//! outcome.image.save("patched.bin")?;
//! ```

pub mod engine;
pub mod error;
pub mod feature;
pub mod image;
pub mod manifest;
pub mod patch;
pub mod variant;

pub use engine::{PatchEngine, PatchOutcome};
pub use error::{Error, HexError, Result};
pub use feature::{
    FeatureComposer, FeatureRequest, RemapStage, RevLimitByTemp, ThrottleMaps, ThrottleMode,
    TransmissionMode, encode_temperature, encode_u16_le,
};
pub use image::{BinaryImage, ByteRange};
pub use manifest::PatchManifest;
pub use patch::{
    AddressRule, AppliedPatch, PatchDescriptor, PatchLibrary, PatchReport, apply_patch,
    decode_hex, format_hex, load_library, write_bytes,
};
pub use variant::{FirmwareVariant, OffsetSlot, OffsetTable, Resolution, resolve_offsets};
