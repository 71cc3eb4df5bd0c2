//! Calibration layout constants for the base MSS65 image.
//!
//! Every address here is relative to the base layout and is shifted by
//! `locationoffset1` before use.

/// Addresses of computed calibration fields
pub mod address {
    /// AlphaN load-sensing enable flag (1 byte)
    pub const ALPHA_N: u64 = 127_144;

    /// Transmission coding byte
    pub const TRANSMISSION_CODING: u64 = 36_000;

    /// Rev limit per gear, 8 x u16 LE
    pub const REV_LIMIT_GEAR: u64 = 19_610;

    /// Rev limit by coolant temperature: RPM column, 6 x u16 LE
    pub const REV_LIMIT_TEMP_RPM: u64 = 19_660;
    /// Rev limit by coolant temperature: breakpoint column, 6 x u16 LE
    pub const REV_LIMIT_TEMP_BREAKPOINT: u64 = 19_674;

    // Throttle pedal maps, 16 bytes each
    pub const THROTTLE_COMFORT: u64 = 33_988;
    pub const THROTTLE_NORMAL: u64 = 34_004;
    pub const THROTTLE_SPORT: u64 = 34_020;
}

/// Field sizes and value encodings
pub mod field {
    pub const GEAR_COUNT: usize = 8;
    pub const TEMP_BREAKPOINTS: usize = 6;
    pub const THROTTLE_POINTS: usize = 16;

    pub const ALPHA_N_ENABLED: u8 = 0x01;
    pub const TRANSMISSION_MANUAL: u8 = 0x01;
    pub const TRANSMISSION_SMG: u8 = 0x02;

    /// Added to degrees Celsius before scaling to tenths
    pub const TEMPERATURE_BIAS: f64 = 273.2;
    pub const TEMPERATURE_SCALE: f64 = 10.0;
}

/// Accepted input ranges for numeric features
pub mod limits {
    pub const RPM_MAX: u16 = 10_000;
    pub const CELSIUS_MIN: f64 = -40.0;
    pub const CELSIUS_MAX: f64 = 150.0;
}

/// Library patch names used by the composer
pub mod patches {
    pub const STAGE1_REMAP_MAIN: &str = "stage1_remap_main";
    pub const STAGE2_REMAP_MAIN: &str = "stage2_remap_main";

    /// Shared by both remap stages, applied after the main table
    pub const REMAP_SUPPORT: [&str; 10] = [
        "remap_axis1",
        "remap_axis2",
        "remap_axis3",
        "remap_axis4",
        "remap_axis5",
        "remap_table1",
        "remap_table2",
        "remap_table3",
        "wot_fuel_axis",
        "axis_patch2",
    ];

    pub const VMAX: &str = "vmax_check_tuned";
    pub const VALET: &str = "valet_mode";
    pub const SAP_DELETE: &str = "sap_patch";
    pub const COLD_START_DELETE: &str = "cold_start_patch";
    pub const CAT_DELETE: &str = "cat_patch";
    pub const O2_DELETE: &str = "postcat_o2_patch";
    pub const BURBLE: &str = "burble_patch";
}
