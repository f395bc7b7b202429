use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compare::scan::DEFAULT_MARKERS;
use crate::error::{Result, ToolError};

/// Threshold used when none is configured, in percent.
pub const DEFAULT_THRESHOLD: f64 = 5.0;

/// Settings shared by every comparator of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    /// Largest absolute percentage change still reported as `OK`.
    pub threshold: f64,
    /// Phrases that flag a row, matched case-insensitively.
    pub markers: Vec<String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            markers: DEFAULT_MARKERS.iter().map(|marker| marker.to_string()).collect(),
        }
    }
}

impl CompareConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let config: CompareConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the threshold and markers can drive a comparison.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ToolError::InvalidConfig(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        if self.markers.is_empty() {
            return Err(ToolError::InvalidConfig(
                "at least one marker is required".into(),
            ));
        }
        if self.markers.iter().any(|marker| marker.is_empty()) {
            return Err(ToolError::InvalidConfig(
                "markers must not be empty strings".into(),
            ));
        }
        Ok(())
    }
}
