use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::variant::OffsetSlot;

use super::{AddressRule, PatchDescriptor};

/// Address as written in the library file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OffsetSpec {
    Fixed(u64),
    Relative { slot: OffsetSlot, base: u64 },
}

impl From<&OffsetSpec> for AddressRule {
    fn from(spec: &OffsetSpec) -> Self {
        match *spec {
            OffsetSpec::Fixed(address) => AddressRule::Fixed(address),
            OffsetSpec::Relative { slot, base } => AddressRule::relative(slot, base),
        }
    }
}

/// One entry of the library file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub hex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<OffsetSpec>,
}

/// Immutable map from patch name to descriptor.
///
/// Built once at startup and shared read-only by every run.
#[derive(Debug, Clone, Default)]
pub struct PatchLibrary {
    entries: BTreeMap<String, PatchDescriptor>,
}

impl PatchLibrary {
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = PatchDescriptor>,
    {
        let entries = descriptors
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: BTreeMap<String, LibraryEntry>) -> Self {
        Self::from_descriptors(entries.into_iter().map(|(name, entry)| PatchDescriptor {
            address: entry.offset.as_ref().map(AddressRule::from),
            name,
            hex: entry.hex,
        }))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: BTreeMap<String, LibraryEntry> = serde_json::from_str(content)?;
        Ok(Self::from_entries(entries))
    }

    pub fn get(&self, name: &str) -> Result<&PatchDescriptor> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::PatchNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Patch names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatchDescriptor> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode every payload and fail on the first bad entry
    pub fn validate(&self) -> Result<()> {
        for descriptor in self.entries.values() {
            descriptor.payload()?;
        }
        Ok(())
    }

    /// Names from `required` that are missing from the library
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }
}

/// Load the patch library from a JSON file
pub fn load_library<P: AsRef<Path>>(path: P) -> Result<PatchLibrary> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let library = PatchLibrary::from_json(&content).map_err(|e| match e {
        Error::Json(json) => Error::InvalidLibrary(format!("{}: {}", path.display(), json)),
        other => other,
    })?;
    info!("Loaded {} patches from {}", library.len(), path.display());
    Ok(library)
}
