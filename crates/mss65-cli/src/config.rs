//! Feature request files.
//!
//! The request is a TOML file with one key per feature. Missing keys mean
//! "leave unchanged", so an empty file is a valid request that patches
//! nothing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mss65_core::FeatureRequest;
use tracing::info;

/// Commented request with every feature listed
pub const TEMPLATE: &str = r#"# MSS65 feature request

# Performance remap: "none", "stage1" or "stage2"
remap = "none"

vmax = false
valet = false
alphan = false

# Emissions / DTC
sap_delete = false
cold_start_delete = false
cat_delete = false
o2_delete = false
burble = false

# Transmission coding: "no_change", "manual" or "smg"
transmission = "no_change"

# Rev limit per gear (rpm, 0-10000). Delete to leave the table unchanged.
rev_limit_gear = [8250, 8250, 8250, 8250, 8250, 8250, 8250, 8250]

# Rev limit by coolant temperature (rpm 0-10000, breakpoints -40 to 150 C)
[rev_limit_temp]
rpm = [8250, 8250, 8250, 8250, 8250, 8250]
celsius = [70, 80, 90, 100, 110, 120]

# Throttle pedal maps, 16 points each (0-255). Delete a line to keep it.
[throttle]
comfort = [0, 16, 32, 48, 64, 80, 96, 112, 128, 144, 160, 176, 192, 208, 224, 240]
normal = [0, 16, 32, 48, 64, 80, 96, 112, 128, 144, 160, 176, 192, 208, 224, 240]
sport = [0, 16, 32, 48, 64, 80, 96, 112, 128, 144, 160, 176, 192, 208, 224, 240]
"#;

pub fn parse_request(content: &str) -> Result<FeatureRequest> {
    let request: FeatureRequest = toml::from_str(content)?;
    request.validate()?;
    Ok(request)
}

/// Load and validate a feature request
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<FeatureRequest> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feature request {}", path.display()))?;
    let request = parse_request(&content)
        .with_context(|| format!("Invalid feature request {}", path.display()))?;

    info!(
        "Loaded feature request from {} ({} features)",
        path.display(),
        request.feature_names().len()
    );
    Ok(request)
}
