//! JSON record of a completed patch run.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::feature::FeatureRequest;
use crate::patch::PatchReport;

/// One write in the manifest, address in hex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub address: String,
    pub len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchManifest {
    pub tool_version: String,
    pub generated_at: DateTime<Local>,
    pub variant: String,
    pub image_len: usize,
    pub offsets: BTreeMap<String, i64>,
    pub features: Vec<String>,
    pub bytes_written: usize,
    pub patches: Vec<ManifestEntry>,
}

impl PatchManifest {
    pub fn from_report(report: &PatchReport, request: &FeatureRequest) -> Self {
        let patches = report
            .applied
            .iter()
            .map(|p| ManifestEntry {
                name: p.name.clone(),
                address: format!("0x{:X}", p.address),
                len: p.len,
            })
            .collect();

        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Local::now(),
            variant: report.variant.as_str().to_string(),
            image_len: report.image_len,
            offsets: report.variant.offset_table().to_map(),
            features: request.feature_names(),
            bytes_written: report.bytes_written(),
            patches,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
