use std::fmt;

use tracing::{debug, warn};

use super::OffsetTable;

/// Length of the base MSS65 dump (0xC0000)
pub const BASE_IMAGE_LEN: usize = 786_432;
/// Length of the extended MSS65 dump
pub const EXTENDED_IMAGE_LEN: usize = 788_740;
/// Shift applied to every slot on the extended layout
pub const EXTENDED_SHIFT: i64 = 4860;

/// Known firmware layouts, keyed by exact image length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirmwareVariant {
    Base,
    Extended,
    Unrecognized(usize),
}

impl FirmwareVariant {
    pub fn from_len(len: usize) -> Self {
        match len {
            BASE_IMAGE_LEN => Self::Base,
            EXTENDED_IMAGE_LEN => Self::Extended,
            other => Self::Unrecognized(other),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    pub fn expected_len(&self) -> usize {
        match self {
            Self::Base => BASE_IMAGE_LEN,
            Self::Extended => EXTENDED_IMAGE_LEN,
            Self::Unrecognized(len) => *len,
        }
    }

    pub fn offset_table(&self) -> OffsetTable {
        match self {
            Self::Base | Self::Unrecognized(_) => OffsetTable::zero(),
            Self::Extended => OffsetTable::uniform(EXTENDED_SHIFT),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Extended => "extended",
            Self::Unrecognized(_) => "unrecognized",
        }
    }
}

impl fmt::Display for FirmwareVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized(len) => write!(f, "unrecognized ({} bytes)", len),
            other => write!(f, "{} ({} bytes)", other.as_str(), other.expected_len()),
        }
    }
}

/// Detected variant and the offset table that goes with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub variant: FirmwareVariant,
    pub table: OffsetTable,
}

impl Resolution {
    pub fn is_recognized(&self) -> bool {
        self.variant.is_recognized()
    }
}

/// Pick the offset table for an image of `len` bytes.
///
/// Unknown lengths fall back to the all-zero table instead of failing.
/// Patching such an image may hit the wrong addresses, so the fallback is
/// logged and reported through [`Resolution::is_recognized`].
pub fn resolve_offsets(len: usize) -> Resolution {
    let variant = FirmwareVariant::from_len(len);
    if variant.is_recognized() {
        debug!("Detected firmware variant: {}", variant);
    } else {
        warn!(
            "Unrecognized image length {} (expected {} or {}), using neutral offsets",
            len, BASE_IMAGE_LEN, EXTENDED_IMAGE_LEN
        );
    }

    Resolution {
        variant,
        table: variant.offset_table(),
    }
}
