use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "data-sweeper.json";

/// User-tunable settings. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rows shown in the per-file preview table.
    pub preview_rows: usize,
    /// Numeric columns drawn in the bar chart.
    pub chart_max_series: usize,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            chart_max_series: 2,
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

impl AppConfig {
    /// Parse settings from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Settings from `path` if it exists, otherwise defaults.
    /// A malformed file is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_path(path) {
            Ok(cfg) => {
                log::info!("Loaded settings from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }
}
