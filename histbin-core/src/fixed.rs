//! Fixed-range axis with equidistant bins.
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use crate::axis::{Axis, BinExtent, BinKind, MAX_REGULAR_BINS, OVERFLOW_BIN, UNDERFLOW_BIN};
use crate::{Error, Result};

/// Axis over `[low, high)` split into equal bins, with underflow and
/// overflow bins collecting everything outside that range.
///
/// Every real input, infinities included, lands in some bin. `NaN` is
/// collected by the overflow bin.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedAxis {
    n_bins: i32,
    low: f64,
    high: f64,
    width: f64,
}

impl FixedAxis {
    /// Creates an axis with `n_bins` regular bins over `[low, high)`.
    pub fn new(n_bins: i32, low: f64, high: f64) -> Result<Self> {
        let width = validate_range(n_bins, low, high)?;
        Ok(Self {
            n_bins,
            low,
            high,
            width,
        })
    }

    /// Lower edge of the first regular bin.
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper edge of the last regular bin.
    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Width of each regular bin.
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        self.width
    }

    /// Edge at bin position `k`, with position `n_bins` pinned to `high`.
    #[inline]
    fn edge(&self, k: i64) -> f64 {
        if k >= i64::from(self.n_bins) {
            self.high
        } else {
            self.low + k as f64 * self.width
        }
    }
}

impl Axis for FixedAxis {
    fn n_bins_no_over(&self) -> i32 {
        self.n_bins
    }

    fn can_grow(&self) -> bool {
        false
    }

    fn find_bin(&self, x: f64) -> Option<i32> {
        if x < self.low {
            return Some(UNDERFLOW_BIN);
        }
        if x >= self.high || x.is_nan() {
            return Some(OVERFLOW_BIN);
        }
        let last = i64::from(self.n_bins) - 1;
        let estimate = (((x - self.low) / self.width).floor() as i64).clamp(0, last);
        let k = snap(x, estimate, |k| self.edge(k)).clamp(0, last);
        Some(k as i32 + 1)
    }

    fn bin_extent(&self, bin: i32) -> Result<BinExtent> {
        match self.check_bin(bin)? {
            BinKind::Underflow => Ok(BinExtent::new(f64::MIN, self.low)),
            BinKind::Overflow => Ok(BinExtent::new(self.high, f64::MAX)),
            BinKind::Regular(b) => {
                let k = i64::from(b) - 1;
                Ok(BinExtent::new(self.edge(k), self.edge(k + 1)))
            }
        }
    }
}

/// Checks axis construction parameters and returns the bin width.
pub(crate) fn validate_range(n_bins: i32, low: f64, high: f64) -> Result<f64> {
    if !(1..=MAX_REGULAR_BINS).contains(&n_bins) {
        return Err(Error::InvalidAxis(format!(
            "bin count must be in 1..={MAX_REGULAR_BINS}, got {n_bins}"
        )));
    }
    if !low.is_finite() || !high.is_finite() {
        return Err(Error::InvalidAxis(format!(
            "range bounds must be finite, got [{low}, {high})"
        )));
    }
    if low >= high {
        return Err(Error::InvalidAxis(format!(
            "lower bound must be below upper bound, got [{low}, {high})"
        )));
    }
    let width = (high - low) / f64::from(n_bins);
    if !(width.is_finite() && width > 0.0) {
        return Err(Error::InvalidAxis(format!(
            "range [{low}, {high}) cannot be split into {n_bins} bins"
        )));
    }
    if !resolvable(width, low.abs().max(high.abs())) {
        return Err(Error::InvalidAxis(format!(
            "bins of width {width} are below floating-point resolution over [{low}, {high})"
        )));
    }
    Ok(width)
}

/// True if edges `width` apart stay strictly increasing at `magnitude`.
pub(crate) fn resolvable(width: f64, magnitude: f64) -> bool {
    width > 4.0 * magnitude * f64::EPSILON
}

/// Corrects a floor-based position estimate so that
/// `edge(k) <= x < edge(k + 1)`.
///
/// The estimate is off by at most one when the edges are resolvable.
pub(crate) fn snap(x: f64, k: i64, edge: impl Fn(i64) -> f64) -> i64 {
    if x < edge(k) {
        k - 1
    } else if x >= edge(k + 1) {
        k + 1
    } else {
        k
    }
}
