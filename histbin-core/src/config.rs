//! Axis configuration.

use crate::axis::Axis;
use crate::fixed::FixedAxis;
use crate::grow::GrowAxis;
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Construction parameters for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum AxisConfig {
    /// Fixed range `[low, high)` with underflow and overflow bins.
    Fixed { n_bins: i32, low: f64, high: f64 },
    /// Growable axis seeded with the range `[low, high)`.
    Growable { n_bins: i32, low: f64, high: f64 },
}

impl AxisConfig {
    /// Fixed axis configuration.
    #[must_use]
    pub fn fixed(n_bins: i32, low: f64, high: f64) -> Self {
        AxisConfig::Fixed { n_bins, low, high }
    }

    /// Growable axis configuration.
    #[must_use]
    pub fn growable(n_bins: i32, low: f64, high: f64) -> Self {
        AxisConfig::Growable { n_bins, low, high }
    }

    /// Builds the configured axis.
    pub fn build(&self) -> Result<Box<dyn Axis>> {
        Ok(match *self {
            AxisConfig::Fixed { n_bins, low, high } => Box::new(FixedAxis::new(n_bins, low, high)?),
            AxisConfig::Growable { n_bins, low, high } => {
                Box::new(GrowAxis::new(n_bins, low, high)?)
            }
        })
    }
}
