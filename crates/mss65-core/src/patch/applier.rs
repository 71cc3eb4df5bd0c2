use tracing::debug;

use crate::error::{Error, Result};
use crate::image::BinaryImage;
use crate::variant::OffsetTable;

use super::{AppliedPatch, PatchDescriptor};

/// Write a library patch into the image.
///
/// The payload is decoded and the target range bounds checked before any
/// byte is touched, so a failing descriptor leaves the image unchanged.
pub fn apply_patch(
    image: &mut BinaryImage,
    descriptor: &PatchDescriptor,
    table: &OffsetTable,
    default_offset: u64,
) -> Result<AppliedPatch> {
    let address = descriptor.resolve_address(table, default_offset);
    let payload = descriptor.payload()?;
    write_bytes(image, &descriptor.name, address, &payload)
}

/// Bounds-checked overwrite of `bytes` at `address`.
///
/// `name` identifies the write in errors and reports.
pub fn write_bytes(
    image: &mut BinaryImage,
    name: &str,
    address: i128,
    bytes: &[u8],
) -> Result<AppliedPatch> {
    let range = image
        .checked_range(address, bytes.len())
        .ok_or_else(|| Error::OutOfBounds {
            patch: name.to_string(),
            address,
            len: bytes.len(),
            image_len: image.len(),
        })?;

    debug!(
        "Writing {} ({} bytes) at 0x{:X}",
        name,
        bytes.len(),
        range.start
    );

    let start = range.start;
    image.overwrite(range, bytes);

    Ok(AppliedPatch {
        name: name.to_string(),
        address: start as u64,
        len: bytes.len(),
    })
}
