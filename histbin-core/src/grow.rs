//! Growable axis with equidistant bins.
//!
//! A growable axis has no boundary bins. When a value falls outside its
//! range the axis is extended by the smallest whole number of bins, of
//! unchanged width, that covers the value. Bin edges are always computed
//! as `origin + k * width` for an integer bin position `k`, except that the
//! upper seed edge is exactly `high`. The edges of bins that already
//! existed are therefore bit-identical after growth. Bins added below the
//! range shift the local index of every existing bin.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_lossless
)]

use crate::axis::{Axis, BinExtent, BinKind, Growth, MAX_REGULAR_BINS};
use crate::fixed::{resolvable, snap, validate_range};
use crate::{Error, Result};

/// Largest bin position magnitude that converts exactly between `f64`
/// and `i64` (2^53).
const POSITION_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Equidistant axis that extends its range to admit out-of-range values.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowAxis {
    /// Lower edge of the seed range; position 0.
    origin: f64,
    /// Upper edge of the seed range; position `n_seed`.
    seed_high: f64,
    n_seed: i64,
    width: f64,
    /// Position of the first regular bin relative to `origin` (never positive).
    first: i64,
    n_bins: i32,
}

impl GrowAxis {
    /// Creates an axis with `n_bins` regular bins over the seed range
    /// `[low, high)`.
    pub fn new(n_bins: i32, low: f64, high: f64) -> Result<Self> {
        let width = validate_range(n_bins, low, high)?;
        Ok(Self {
            origin: low,
            seed_high: high,
            n_seed: i64::from(n_bins),
            width,
            first: 0,
            n_bins,
        })
    }

    /// Current lower edge of the first regular bin.
    #[must_use]
    pub fn low(&self) -> f64 {
        self.edge(self.first)
    }

    /// Current upper edge of the last regular bin.
    #[must_use]
    pub fn high(&self) -> f64 {
        self.edge(self.end())
    }

    /// Width of each regular bin.
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        self.width
    }

    #[inline]
    fn edge(&self, position: i64) -> f64 {
        if position == self.n_seed {
            self.seed_high
        } else {
            self.origin + position as f64 * self.width
        }
    }

    /// One past the position of the last regular bin.
    #[inline]
    fn end(&self) -> i64 {
        self.first + i64::from(self.n_bins)
    }

    #[inline]
    fn contains(&self, x: f64) -> bool {
        self.low() <= x && x < self.high()
    }

    /// Bin position `k` with `edge(k) <= x < edge(k + 1)`.
    ///
    /// Returns `None` for `NaN` and for values too far from the origin to
    /// have an exact position.
    fn locate(&self, x: f64) -> Option<i64> {
        let estimate = ((x - self.origin) / self.width).floor();
        if !(estimate.abs() < POSITION_LIMIT) {
            return None;
        }
        Some(snap(x, estimate as i64, |k| self.edge(k)))
    }
}

impl Axis for GrowAxis {
    fn n_bins_no_over(&self) -> i32 {
        self.n_bins
    }

    fn can_grow(&self) -> bool {
        true
    }

    fn find_bin(&self, x: f64) -> Option<i32> {
        if !self.contains(x) {
            return None;
        }
        let k = self.locate(x)?.clamp(self.first, self.end() - 1);
        Some((k - self.first + 1) as i32)
    }

    fn bin_extent(&self, bin: i32) -> Result<BinExtent> {
        match self.check_bin(bin)? {
            BinKind::Regular(b) => {
                let k = self.first + i64::from(b) - 1;
                Ok(BinExtent::new(self.edge(k), self.edge(k + 1)))
            }
            _ => Err(Error::InvalidLocalBin { axis: 0, bin }),
        }
    }

    fn growth_for(&self, x: f64) -> Result<Option<Growth>> {
        if x.is_nan() {
            return Err(Error::InvalidCoordinate { axis: 0, value: x });
        }
        if self.contains(x) {
            return Ok(None);
        }
        let overflow = || Error::AxisGrowthOverflow { axis: 0, value: x };
        let k = self.locate(x).ok_or_else(overflow)?;

        let (below, above) = if x < self.low() {
            ((self.first - k).max(1), 0)
        } else {
            (0, (k - self.end() + 1).max(1))
        };
        if i64::from(self.n_bins) + below + above > i64::from(MAX_REGULAR_BINS) {
            return Err(overflow());
        }
        let magnitude = self
            .edge(self.first - below)
            .abs()
            .max(self.edge(self.end() + above).abs());
        if !resolvable(self.width, magnitude) {
            return Err(overflow());
        }

        Ok(Some(Growth {
            below: i32::try_from(below).map_err(|_| overflow())?,
            above: i32::try_from(above).map_err(|_| overflow())?,
        }))
    }

    fn grow(&mut self, growth: Growth) -> Result<()> {
        let n_bins = self
            .n_bins
            .checked_add(growth.below)
            .and_then(|n| n.checked_add(growth.above))
            .filter(|&n| growth.below >= 0 && growth.above >= 0 && n <= MAX_REGULAR_BINS)
            .ok_or_else(|| {
                Error::InvalidAxis(format!(
                    "cannot grow an axis of {} bins by {growth:?}",
                    self.n_bins
                ))
            })?;
        self.first -= i64::from(growth.below);
        self.n_bins = n_bins;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grow_to(axis: &mut GrowAxis, x: f64) -> Growth {
        let growth = axis.growth_for(x).unwrap().unwrap_or_default();
        axis.grow(growth).unwrap();
        growth
    }

    #[test]
    fn test_seed_range() {
        let axis = GrowAxis::new(4, 1.0, 3.0).unwrap();
        assert_eq!(axis.n_bins_no_over(), 4);
        assert_eq!(axis.n_bins(), 4);
        assert!(axis.can_grow());
        assert_relative_eq!(axis.low(), 1.0);
        assert_relative_eq!(axis.high(), 3.0);
        assert_relative_eq!(axis.bin_width(), 0.5);

        assert_eq!(axis.find_bin(1.0), Some(1));
        assert_eq!(axis.find_bin(1.6), Some(2));
        assert_eq!(axis.find_bin(2.9), Some(4));
        assert_eq!(axis.find_bin(3.0), None);
        assert_eq!(axis.find_bin(0.9), None);
    }

    /// Largest value below `x`.
    fn next_down(x: f64) -> f64 {
        if x > 0.0 {
            f64::from_bits(x.to_bits() - 1)
        } else if x < 0.0 {
            f64::from_bits(x.to_bits() + 1)
        } else {
            -f64::from_bits(1)
        }
    }

    #[test]
    fn test_values_below_seed_high_need_no_growth() {
        for (n, low, high) in [(5, -7.2, -2.1), (6, -4.8, 2.5), (3, 0.0, 0.3), (9, -6.1, 8.7)] {
            let axis = GrowAxis::new(n, low, high).unwrap();
            let x = next_down(high);
            assert_eq!(axis.high(), high);
            assert_eq!(axis.growth_for(x).unwrap(), None, "({n}, {low}, {high})");
            assert_eq!(axis.find_bin(x), Some(n), "({n}, {low}, {high})");
            assert_eq!(axis.find_bin(low), Some(1), "({n}, {low}, {high})");
        }
    }

    #[test]
    fn test_found_bin_contains_value() {
        for (n, low, high) in [(3, 0.0, 0.3), (5, -7.2, -2.1), (6, -4.8, 2.5), (8, 0.6, 1.0)] {
            let mut axis = GrowAxis::new(n, low, high).unwrap();
            for i in -50..150 {
                let x = f64::from(i) * 0.1 - 5.0;
                grow_to(&mut axis, x);
                let bin = axis.find_bin(x).unwrap();
                let extent = axis.bin_extent(bin).unwrap();
                assert!(extent.contains(x), "{x} not in {extent:?} on ({n}, {low}, {high})");
                assert_eq!(axis.find_bin(extent.from), Some(bin));
            }
        }
    }

    #[test]
    fn test_invalid_growth_is_rejected() {
        let mut axis = GrowAxis::new(2, 0.0, 1.0).unwrap();
        assert!(axis.grow(Growth { below: -1, above: 0 }).is_err());
        assert!(axis.grow(Growth { below: 0, above: i32::MAX }).is_err());
        assert!(axis.grow(Growth { below: MAX_REGULAR_BINS, above: 0 }).is_err());
        assert_eq!(axis.n_bins_no_over(), 2);
        assert_relative_eq!(axis.low(), 0.0);
    }

    #[test]
    fn test_no_boundary_bins() {
        let axis = GrowAxis::new(2, 0.0, 1.0).unwrap();
        assert!(axis.bin_extent(-1).is_err());
        assert!(axis.bin_extent(-2).is_err());
        assert!(axis.bin_extent(0).is_err());
        assert!(axis.bin_extent(3).is_err());
        assert!(axis.bin_extent(2).is_ok());
    }

    #[test]
    fn test_value_inside_needs_no_growth() {
        let axis = GrowAxis::new(4, 0.0, 4.0).unwrap();
        assert_eq!(axis.growth_for(0.0).unwrap(), None);
        assert_eq!(axis.growth_for(3.99).unwrap(), None);
    }

    #[test]
    fn test_grow_above_appends_bins() {
        let mut axis = GrowAxis::new(4, 0.0, 4.0).unwrap();
        let growth = grow_to(&mut axis, 6.5);
        assert_eq!(growth, Growth { below: 0, above: 3 });
        assert_eq!(axis.n_bins_no_over(), 7);
        assert_eq!(axis.find_bin(6.5), Some(7));
        // Existing bins keep their numbers
        assert_eq!(axis.find_bin(0.5), Some(1));

        // The upper edge itself needs one more bin
        let mut axis = GrowAxis::new(4, 0.0, 4.0).unwrap();
        assert_eq!(grow_to(&mut axis, 4.0), Growth { below: 0, above: 1 });
        assert_eq!(axis.find_bin(4.0), Some(5));
    }

    #[test]
    fn test_grow_below_prepends_and_renumbers() {
        let mut axis = GrowAxis::new(4, 0.0, 4.0).unwrap();
        let before = axis.bin_extent(1).unwrap();

        let growth = grow_to(&mut axis, -1.5);
        assert_eq!(growth, Growth { below: 2, above: 0 });
        assert_eq!(axis.n_bins_no_over(), 6);
        assert_eq!(axis.find_bin(-1.5), Some(1));
        assert_relative_eq!(axis.low(), -2.0);

        // The former first bin is now bin 3 with identical edges
        assert_eq!(axis.bin_extent(3).unwrap(), before);
        assert_eq!(axis.find_bin(0.5), Some(3));
    }

    #[test]
    fn test_existing_edges_are_preserved() {
        let mut axis = GrowAxis::new(5, -7.2, -2.1).unwrap();
        let edges: Vec<BinExtent> = (1..=5).map(|b| axis.bin_extent(b).unwrap()).collect();

        grow_to(&mut axis, -100.0);
        grow_to(&mut axis, 250.0);

        let shift = axis.find_bin(edges[0].center).unwrap() - 1;
        for (i, edge) in edges.iter().enumerate() {
            let bin = i32::try_from(i).unwrap() + 1 + shift;
            assert_eq!(axis.bin_extent(bin).unwrap(), *edge);
        }
    }

    #[test]
    fn test_never_returns_boundary_after_growth() {
        let mut axis = GrowAxis::new(3, -1.0, 1.0).unwrap();
        for x in [-1e6, -3.3, 0.0, 0.99, 1.0, 17.0, 1e6] {
            grow_to(&mut axis, x);
            let bin = axis.find_bin(x).unwrap();
            assert!(bin >= 1 && bin <= axis.n_bins_no_over());
        }
    }

    #[test]
    fn test_growth_overflow() {
        let axis = GrowAxis::new(2, 0.0, 1.0).unwrap();
        assert!(matches!(
            axis.growth_for(f64::INFINITY),
            Err(Error::AxisGrowthOverflow { .. })
        ));
        assert!(matches!(
            axis.growth_for(f64::NEG_INFINITY),
            Err(Error::AxisGrowthOverflow { .. })
        ));
        assert!(matches!(
            axis.growth_for(1e300),
            Err(Error::AxisGrowthOverflow { .. })
        ));
    }

    #[test]
    fn test_nan_is_rejected() {
        let axis = GrowAxis::new(2, 0.0, 1.0).unwrap();
        assert_eq!(axis.find_bin(f64::NAN), None);
        assert!(matches!(
            axis.growth_for(f64::NAN),
            Err(Error::InvalidCoordinate { .. })
        ));
    }
}
