use std::fmt;
use std::sync::Arc;

use crate::error::{Error, HexError, Result};
use crate::variant::{OffsetSlot, OffsetTable};

use super::decode_hex;

type AddressFn = dyn Fn(&OffsetTable) -> i128 + Send + Sync;

/// Address computed from the active offset table
#[derive(Clone)]
pub struct DerivedAddress {
    label: String,
    func: Arc<AddressFn>,
}

impl DerivedAddress {
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for DerivedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DerivedAddress").field(&self.label).finish()
    }
}

/// Where a patch lands in the image
#[derive(Debug, Clone)]
pub enum AddressRule {
    /// Absolute address, the same on every variant
    Fixed(u64),
    /// Address that depends on the detected variant
    Derived(DerivedAddress),
}

impl AddressRule {
    /// `base + table[slot]`, the shape used by every shifted calibration field
    pub fn relative(slot: OffsetSlot, base: u64) -> Self {
        Self::derived(format!("{} + {}", base, slot), move |table| {
            i128::from(base) + i128::from(table.get(slot))
        })
    }

    pub fn derived<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&OffsetTable) -> i128 + Send + Sync + 'static,
    {
        Self::Derived(DerivedAddress {
            label: label.into(),
            func: Arc::new(func),
        })
    }

    /// Resolved address, widened so that no base or shift can wrap
    pub fn resolve(&self, table: &OffsetTable) -> i128 {
        match self {
            Self::Fixed(address) => i128::from(*address),
            Self::Derived(derived) => (derived.func)(table),
        }
    }
}

impl fmt::Display for AddressRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(address) => write!(f, "{}", address),
            Self::Derived(derived) => f.write_str(&derived.label),
        }
    }
}

/// One discrete binary modification: a hex payload and its address rule.
///
/// A descriptor without an address rule is written at the default offset
/// supplied by the caller.
#[derive(Debug, Clone)]
pub struct PatchDescriptor {
    pub name: String,
    pub hex: String,
    pub address: Option<AddressRule>,
}

impl PatchDescriptor {
    pub fn new(name: impl Into<String>, hex: impl Into<String>, address: AddressRule) -> Self {
        Self {
            name: name.into(),
            hex: hex.into(),
            address: Some(address),
        }
    }

    pub fn at_default(name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hex: hex.into(),
            address: None,
        }
    }

    /// Decoded payload bytes
    pub fn payload(&self) -> Result<Vec<u8>> {
        decode_hex(&self.hex).map_err(|source| self.decode_error(source))
    }

    /// Resolved write address for the given table
    pub fn resolve_address(&self, table: &OffsetTable, default_offset: u64) -> i128 {
        match &self.address {
            Some(rule) => rule.resolve(table),
            None => i128::from(default_offset),
        }
    }

    fn decode_error(&self, source: HexError) -> Error {
        Error::Decode {
            patch: self.name.clone(),
            source,
        }
    }
}
