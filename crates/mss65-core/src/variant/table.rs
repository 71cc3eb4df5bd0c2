use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Named address-adjustment slot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[repr(usize)]
pub enum OffsetSlot {
    LocationOffset1 = 0,
    LocationOffset2 = 1,
    LocationOffset8 = 2,
    LocationOffset9 = 3,
    LocationOffset12 = 4,
}

impl OffsetSlot {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Per-variant address adjustments. Every slot always has a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetTable {
    values: [i64; OffsetSlot::COUNT],
}

impl OffsetTable {
    /// Neutral table used for the base layout and for unrecognized images
    pub fn zero() -> Self {
        Self::default()
    }

    /// Table with every slot set to the same shift
    pub fn uniform(shift: i64) -> Self {
        Self {
            values: [shift; OffsetSlot::COUNT],
        }
    }

    pub fn with(mut self, slot: OffsetSlot, value: i64) -> Self {
        self.values[slot as usize] = value;
        self
    }

    pub fn get(&self, slot: OffsetSlot) -> i64 {
        self.values[slot as usize]
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OffsetSlot, i64)> + '_ {
        OffsetSlot::iter().map(|slot| (slot, self.get(slot)))
    }

    /// Slot names to values, for display and manifests
    pub fn to_map(&self) -> BTreeMap<String, i64> {
        self.iter()
            .map(|(slot, value)| (slot.name().to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_slot_names() {
        assert_eq!(OffsetSlot::LocationOffset1.name(), "locationoffset1");
        assert_eq!(OffsetSlot::LocationOffset12.to_string(), "locationoffset12");
        assert_eq!(
            OffsetSlot::from_str("locationoffset9").unwrap(),
            OffsetSlot::LocationOffset9
        );
        assert!(OffsetSlot::from_str("locationoffset3").is_err());
    }

    #[test]
    fn test_slot_serde_name() {
        let slot: OffsetSlot = serde_json::from_str("\"locationoffset8\"").unwrap();
        assert_eq!(slot, OffsetSlot::LocationOffset8);
    }

    #[test]
    fn test_table_has_all_slots() {
        let table = OffsetTable::uniform(4860);
        assert_eq!(table.iter().count(), 5);
        assert!(table.iter().all(|(_, v)| v == 4860));
        assert!(!table.is_zero());
        assert!(OffsetTable::zero().is_zero());
    }

    #[test]
    fn test_table_with_overrides_single_slot() {
        let table = OffsetTable::zero().with(OffsetSlot::LocationOffset2, 12);
        assert_eq!(table.get(OffsetSlot::LocationOffset2), 12);
        assert_eq!(table.get(OffsetSlot::LocationOffset1), 0);
    }

    #[test]
    fn test_to_map() {
        let map = OffsetTable::uniform(7).to_map();
        assert_eq!(map.len(), 5);
        assert_eq!(map["locationoffset1"], 7);
    }
}
