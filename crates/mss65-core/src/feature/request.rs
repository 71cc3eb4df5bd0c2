use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{Error, Result};

use super::layout::{address, field, limits};

/// Performance remap selection
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
pub enum RemapStage {
    #[default]
    #[serde(rename = "none", alias = "off")]
    #[strum(serialize = "none")]
    Off,
    #[serde(rename = "stage1")]
    #[strum(serialize = "stage1")]
    Stage1,
    #[serde(rename = "stage2")]
    #[strum(serialize = "stage2")]
    Stage2,
}

/// Transmission coding byte
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransmissionMode {
    #[default]
    NoChange,
    Manual,
    Smg,
}

impl TransmissionMode {
    /// Byte to write, or `None` when the coding is left alone
    pub fn coding_byte(&self) -> Option<u8> {
        match self {
            Self::NoChange => None,
            Self::Manual => Some(field::TRANSMISSION_MANUAL),
            Self::Smg => Some(field::TRANSMISSION_SMG),
        }
    }
}

/// Throttle pedal map selected by the drive mode switch
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThrottleMode {
    Comfort,
    Normal,
    Sport,
}

impl ThrottleMode {
    pub fn base_address(&self) -> u64 {
        match self {
            Self::Comfort => address::THROTTLE_COMFORT,
            Self::Normal => address::THROTTLE_NORMAL,
            Self::Sport => address::THROTTLE_SPORT,
        }
    }
}

pub type ThrottleMap = [u8; field::THROTTLE_POINTS];

/// Throttle tables to overwrite; `None` leaves that mode's table as is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleMaps {
    pub comfort: Option<ThrottleMap>,
    pub normal: Option<ThrottleMap>,
    pub sport: Option<ThrottleMap>,
}

impl ThrottleMaps {
    pub fn get(&self, mode: ThrottleMode) -> Option<&ThrottleMap> {
        match mode {
            ThrottleMode::Comfort => self.comfort.as_ref(),
            ThrottleMode::Normal => self.normal.as_ref(),
            ThrottleMode::Sport => self.sport.as_ref(),
        }
    }

    /// Linear ramp 0, 16, 32 ... 240 used as the editor default
    pub fn linear() -> ThrottleMap {
        std::array::from_fn(|i| (i * 16) as u8)
    }
}

/// Rev limit by coolant temperature: parallel RPM and breakpoint columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevLimitByTemp {
    pub rpm: [u16; field::TEMP_BREAKPOINTS],
    pub celsius: [f64; field::TEMP_BREAKPOINTS],
}

impl Default for RevLimitByTemp {
    fn default() -> Self {
        Self {
            rpm: [8250; field::TEMP_BREAKPOINTS],
            celsius: [70.0, 80.0, 90.0, 100.0, 110.0, 120.0],
        }
    }
}

/// Everything the user asked for in one patch run.
///
/// The default request changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRequest {
    pub remap: RemapStage,
    pub vmax: bool,
    pub valet: bool,
    pub alphan: bool,
    pub rev_limit_gear: Option<[u16; field::GEAR_COUNT]>,
    pub rev_limit_temp: Option<RevLimitByTemp>,
    pub throttle: ThrottleMaps,
    pub sap_delete: bool,
    pub cold_start_delete: bool,
    pub cat_delete: bool,
    pub o2_delete: bool,
    pub burble: bool,
    pub transmission: TransmissionMode,
}

impl FeatureRequest {
    /// Default rev limit applied to every gear by the editor
    pub const DEFAULT_GEAR_LIMIT: u16 = 8250;

    /// Check numeric inputs against their accepted ranges
    pub fn validate(&self) -> Result<()> {
        if let Some(gears) = &self.rev_limit_gear {
            for (i, &rpm) in gears.iter().enumerate() {
                check_rpm(&format!("gear {} rev limit", i + 1), rpm)?;
            }
        }

        if let Some(temp) = &self.rev_limit_temp {
            for (i, &rpm) in temp.rpm.iter().enumerate() {
                check_rpm(&format!("temperature rev limit {}", i + 1), rpm)?;
            }
            for (i, &celsius) in temp.celsius.iter().enumerate() {
                if !(limits::CELSIUS_MIN..=limits::CELSIUS_MAX).contains(&celsius) {
                    return Err(Error::InvalidRequest(format!(
                        "temperature breakpoint {} is {} C, expected {} to {}",
                        i + 1,
                        celsius,
                        limits::CELSIUS_MIN,
                        limits::CELSIUS_MAX
                    )));
                }
            }
        }

        Ok(())
    }

    /// Names of the features this request enables, in application order
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.remap != RemapStage::Off {
            names.push(format!("remap:{}", self.remap));
        }
        let toggles = [
            (self.vmax, "vmax"),
            (self.valet, "valet"),
            (self.alphan, "alphan"),
            (self.rev_limit_gear.is_some(), "rev_limit_gear"),
            (self.rev_limit_temp.is_some(), "rev_limit_temp"),
            (self.throttle.comfort.is_some(), "throttle:comfort"),
            (self.throttle.normal.is_some(), "throttle:normal"),
            (self.throttle.sport.is_some(), "throttle:sport"),
            (self.sap_delete, "sap_delete"),
            (self.cold_start_delete, "cold_start_delete"),
            (self.cat_delete, "cat_delete"),
            (self.o2_delete, "o2_delete"),
            (self.burble, "burble"),
        ];
        names.extend(
            toggles
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, name)| name.to_string()),
        );
        if self.transmission != TransmissionMode::NoChange {
            names.push(format!("transmission:{}", self.transmission));
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names().is_empty()
    }
}

fn check_rpm(label: &str, rpm: u16) -> Result<()> {
    if rpm > limits::RPM_MAX {
        return Err(Error::InvalidRequest(format!(
            "{} is {} rpm, expected at most {}",
            label,
            rpm,
            limits::RPM_MAX
        )));
    }
    Ok(())
}
