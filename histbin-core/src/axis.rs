//! Axis trait and shared bin types.
//!
//! An axis maps a coordinate along one dimension to a *local bin index*.
//! Regular bins are numbered `1..=n`. Axes with a fixed range add two
//! boundary bins: [`UNDERFLOW_BIN`] for values below the range and
//! [`OVERFLOW_BIN`] for values at or above it. Growable axes have no
//! boundary bins and extend their range instead.

use std::fmt;

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Local index of the underflow bin.
pub const UNDERFLOW_BIN: i32 = -1;

/// Local index of the overflow bin.
pub const OVERFLOW_BIN: i32 = -2;

/// Largest number of regular bins an axis may hold.
///
/// Leaves room for the two boundary bins within an `i32` bin count.
pub const MAX_REGULAR_BINS: i32 = i32::MAX - 2;

/// Classification of a local bin index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinKind {
    /// Values below the axis range.
    Underflow,
    /// A regular bin, numbered from 1.
    Regular(i32),
    /// Values at or above the axis range.
    Overflow,
}

impl BinKind {
    /// Classifies a local bin index, without checking it against any axis.
    ///
    /// Returns `None` for indices that are neither regular nor boundary.
    #[must_use]
    pub fn of(bin: i32) -> Option<Self> {
        match bin {
            UNDERFLOW_BIN => Some(BinKind::Underflow),
            OVERFLOW_BIN => Some(BinKind::Overflow),
            b if b >= 1 => Some(BinKind::Regular(b)),
            _ => None,
        }
    }

    /// Returns the local bin index.
    #[must_use]
    pub fn index(self) -> i32 {
        match self {
            BinKind::Underflow => UNDERFLOW_BIN,
            BinKind::Regular(b) => b,
            BinKind::Overflow => OVERFLOW_BIN,
        }
    }

    /// Returns true for regular bins.
    #[must_use]
    pub fn is_regular(self) -> bool {
        matches!(self, BinKind::Regular(_))
    }
}

/// Lower edge, center and upper edge of one bin along one axis.
///
/// Boundary bins use `f64::MIN` / `f64::MAX` for their open edge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinExtent {
    /// Inclusive lower edge.
    pub from: f64,
    /// Midpoint between the edges.
    pub center: f64,
    /// Exclusive upper edge.
    pub to: f64,
}

impl BinExtent {
    /// Creates the extent `[from, to)` with its midpoint.
    ///
    /// The midpoint is computed without overflowing for sentinel edges.
    #[inline]
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from,
            center: 0.5 * from + 0.5 * to,
            to,
        }
    }

    /// Returns true if `x` falls inside `[from, to)`.
    #[inline]
    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        self.from <= x && x < self.to
    }
}

/// Extension of a growable axis, in whole bins on each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Growth {
    /// Bins added below the current range. Shifts existing local indices.
    pub below: i32,
    /// Bins added above the current range.
    pub above: i32,
}

impl Growth {
    /// Returns true if the growth adds no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.below == 0 && self.above == 0
    }
}

/// Binning of one histogram dimension.
///
/// Implementations decide how coordinates map to local bin indices.
/// Global indexing only relies on [`Axis::can_grow`] and
/// [`Axis::n_bins_no_over`], so new axis kinds plug in without changes
/// elsewhere.
pub trait Axis: fmt::Debug + Send + Sync {
    /// Number of regular bins.
    fn n_bins_no_over(&self) -> i32;

    /// True if the axis grows instead of using boundary bins.
    fn can_grow(&self) -> bool;

    /// Total number of bins, boundary bins included.
    fn n_bins(&self) -> i32 {
        if self.can_grow() {
            self.n_bins_no_over()
        } else {
            self.n_bins_no_over() + 2
        }
    }

    /// Finds the local bin of `x` in the current axis range.
    ///
    /// Returns `None` only when a growable axis has to grow before it
    /// can admit `x`.
    fn find_bin(&self, x: f64) -> Option<i32>;

    /// Edges and center of a local bin.
    fn bin_extent(&self, bin: i32) -> Result<BinExtent>;

    /// Computes the growth needed to admit `x`, without applying it.
    ///
    /// Returns `Ok(None)` when `x` already fits. Axes that cannot grow
    /// never need to.
    fn growth_for(&self, _x: f64) -> Result<Option<Growth>> {
        Ok(None)
    }

    /// Applies a growth previously computed by [`Axis::growth_for`].
    ///
    /// Fails without changing the axis if the growth cannot be applied,
    /// for example when it is negative or exceeds [`MAX_REGULAR_BINS`].
    fn grow(&mut self, growth: Growth) -> Result<()> {
        if growth.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidAxis(format!("axis cannot grow by {growth:?}")))
        }
    }

    /// Lower edge of a local bin.
    fn bin_from(&self, bin: i32) -> Result<f64> {
        self.bin_extent(bin).map(|e| e.from)
    }

    /// Center of a local bin.
    fn bin_center(&self, bin: i32) -> Result<f64> {
        self.bin_extent(bin).map(|e| e.center)
    }

    /// Upper edge of a local bin.
    fn bin_to(&self, bin: i32) -> Result<f64> {
        self.bin_extent(bin).map(|e| e.to)
    }

    /// Checks that `bin` is a local index of this axis.
    fn check_bin(&self, bin: i32) -> Result<BinKind> {
        match BinKind::of(bin) {
            Some(BinKind::Regular(b)) if b <= self.n_bins_no_over() => Ok(BinKind::Regular(b)),
            Some(kind @ (BinKind::Underflow | BinKind::Overflow)) if !self.can_grow() => Ok(kind),
            _ => Err(Error::InvalidLocalBin { axis: 0, bin }),
        }
    }
}

/// Local bin indices of `axis` in traversal order.
///
/// Underflow first, then regular bins ascending, then overflow. Growable
/// axes yield only their regular bins.
pub fn ordered_bins(axis: &dyn Axis) -> impl Iterator<Item = i32> {
    let flow = !axis.can_grow();
    let underflow = flow.then_some(UNDERFLOW_BIN);
    let overflow = flow.then_some(OVERFLOW_BIN);
    underflow
        .into_iter()
        .chain(1..=axis.n_bins_no_over())
        .chain(overflow)
}
