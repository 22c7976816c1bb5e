//! Histogram configuration.

use std::fs;
use std::path::Path;

use histbin_core::{Axis, AxisConfig, Error, Result};
use serde::{Deserialize, Serialize};

/// Axis layout of a histogram, axis 0 first.
///
/// Loads from JSON documents of the form
///
/// ```json
/// {
///   "axes": [
///     { "kind": "fixed", "n_bins": 2, "low": 0.0, "high": 2.0 },
///     { "kind": "growable", "n_bins": 4, "low": -1.0, "high": 1.0 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    /// Per-axis configuration.
    pub axes: Vec<AxisConfig>,
}

impl HistogramConfig {
    /// Creates a configuration without axes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an axis.
    #[must_use]
    pub fn with_axis(mut self, axis: AxisConfig) -> Self {
        self.axes.push(axis);
        self
    }

    /// Appends a fixed axis over `[low, high)`.
    #[must_use]
    pub fn with_fixed(self, n_bins: i32, low: f64, high: f64) -> Self {
        self.with_axis(AxisConfig::fixed(n_bins, low, high))
    }

    /// Appends a growable axis seeded with `[low, high)`.
    #[must_use]
    pub fn with_growable(self, n_bins: i32, low: f64, high: f64) -> Self {
        self.with_axis(AxisConfig::growable(n_bins, low, high))
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Serializes the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Builds the configured axes.
    pub fn build_axes(&self) -> Result<Vec<Box<dyn Axis>>> {
        self.axes.iter().map(AxisConfig::build).collect()
    }
}
