//! Global bin indexing.
//!
//! Cells of an N-dimensional histogram are enumerated in row-major order,
//! axis 0 varying fastest. Along each axis the slot sequence is
//! `[underflow, 1..=n, overflow]` for fixed axes and `[1..=n]` for
//! growable axes. Walking the cells in that order, cells whose every local
//! bin is regular are numbered `1, 2, 3, ...` and all other cells
//! `-1, -2, -3, ...`. Index `0` is never issued.
//!
//! Both directions are computed in closed form from per-axis strides, so
//! no cell enumeration happens at lookup time.
#![allow(clippy::cast_possible_truncation)]

use histbin_core::{Axis, Error, Growth, Result, MAX_REGULAR_BINS};

/// Index-relevant shape of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisShape {
    n_regular: i32,
    flow: bool,
}

impl AxisShape {
    /// Shape of a fixed axis with `n_regular` regular bins.
    #[must_use]
    pub fn fixed(n_regular: i32) -> Self {
        Self {
            n_regular,
            flow: true,
        }
    }

    /// Shape of a growable axis with `n_regular` regular bins.
    #[must_use]
    pub fn growable(n_regular: i32) -> Self {
        Self {
            n_regular,
            flow: false,
        }
    }

    /// Shape of an existing axis.
    #[must_use]
    pub fn of(axis: &dyn Axis) -> Self {
        Self {
            n_regular: axis.n_bins_no_over(),
            flow: !axis.can_grow(),
        }
    }

    /// Shape after applying `growth`.
    ///
    /// Returns `None` for negative growth and for axes with boundary bins.
    /// Also returns `None` when the result exceeds [`MAX_REGULAR_BINS`].
    #[must_use]
    pub fn grown(self, growth: Growth) -> Option<Self> {
        if growth.is_empty() {
            return Some(self);
        }
        if self.flow || growth.below < 0 || growth.above < 0 {
            return None;
        }
        let n_regular = self
            .n_regular
            .checked_add(growth.below)?
            .checked_add(growth.above)?;
        (n_regular <= MAX_REGULAR_BINS).then_some(Self { n_regular, ..self })
    }

    /// Number of regular bins.
    #[must_use]
    pub fn n_regular(self) -> i32 {
        self.n_regular
    }

    /// True for axes with underflow and overflow bins.
    #[must_use]
    pub fn has_flow_bins(self) -> bool {
        self.flow
    }

    fn n_slots(self) -> i64 {
        i64::from(self.n_regular) + if self.flow { 2 } else { 0 }
    }

    /// 0-based position of a local bin within the slot sequence.
    fn slot_of(self, bin: i32) -> Option<i64> {
        match bin {
            b if (1..=self.n_regular).contains(&b) => {
                Some(i64::from(b) - if self.flow { 0 } else { 1 })
            }
            -1 if self.flow => Some(0),
            -2 if self.flow => Some(i64::from(self.n_regular) + 1),
            _ => None,
        }
    }

    /// Local bin at a slot position.
    fn bin_at(self, slot: i64) -> i32 {
        if !self.flow {
            return slot as i32 + 1;
        }
        match slot {
            0 => -1,
            s if s > i64::from(self.n_regular) => -2,
            s => s as i32,
        }
    }

    fn is_regular_slot(self, slot: i64) -> bool {
        !self.flow || (1..=i64::from(self.n_regular)).contains(&slot)
    }

    /// Number of regular slots before `slot`.
    fn regular_before(self, slot: i64) -> i64 {
        if self.flow {
            slot.clamp(1, i64::from(self.n_regular) + 1) - 1
        } else {
            slot
        }
    }
}

/// Converts between local bin vectors and global bin indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalIndexer {
    shapes: Vec<AxisShape>,
    /// Cells per slot step on each axis: product of slot counts of lower axes.
    slot_strides: Vec<i64>,
    /// Regular cells per regular step: product of regular counts of lower axes.
    regular_strides: Vec<i64>,
    n_cells: i64,
    n_regular: i64,
}

impl GlobalIndexer {
    /// Creates an indexer for the given axis shapes.
    ///
    /// Fails with [`Error::InvalidAxis`] if an axis has no regular bins or
    /// more than [`MAX_REGULAR_BINS`], and with [`Error::BinCountOverflow`]
    /// if the number of cells does not fit in an `i64`.
    pub fn new(shapes: Vec<AxisShape>) -> Result<Self> {
        let mut slot_strides = Vec::with_capacity(shapes.len());
        let mut regular_strides = Vec::with_capacity(shapes.len());
        let mut n_cells: i64 = 1;
        let mut n_regular: i64 = 1;

        for (axis, shape) in shapes.iter().enumerate() {
            if !(1..=MAX_REGULAR_BINS).contains(&shape.n_regular) {
                return Err(Error::InvalidAxis(format!(
                    "axis {axis} has {} regular bins",
                    shape.n_regular
                )));
            }
            slot_strides.push(n_cells);
            regular_strides.push(n_regular);
            n_cells = n_cells
                .checked_mul(shape.n_slots())
                .ok_or(Error::BinCountOverflow)?;
            n_regular = n_regular
                .checked_mul(i64::from(shape.n_regular))
                .ok_or(Error::BinCountOverflow)?;
        }

        Ok(Self {
            shapes,
            slot_strides,
            regular_strides,
            n_cells,
            n_regular,
        })
    }

    /// Creates an indexer for the current state of `axes`.
    pub fn from_axes(axes: &[Box<dyn Axis>]) -> Result<Self> {
        Self::new(axes.iter().map(|a| AxisShape::of(&**a)).collect())
    }

    /// Axis shapes, axis 0 first.
    #[must_use]
    pub fn shapes(&self) -> &[AxisShape] {
        &self.shapes
    }

    /// Number of axes.
    #[must_use]
    pub fn n_dims(&self) -> usize {
        self.shapes.len()
    }

    /// Total number of cells.
    #[must_use]
    pub fn n_cells(&self) -> i64 {
        self.n_cells
    }

    /// Number of cells with positive global index.
    #[must_use]
    pub fn n_regular_cells(&self) -> i64 {
        self.n_regular
    }

    /// Number of cells with negative global index.
    #[must_use]
    pub fn n_flow_cells(&self) -> i64 {
        self.n_cells - self.n_regular
    }

    /// Global index of the cell at the given local bins.
    pub fn to_global(&self, bins: &[i32]) -> Result<i64> {
        self.check_len(bins.len())?;

        let mut cell_rank = 0;
        let mut regular_before = 0;
        let mut regular = true;

        // Most significant axis first, so the regular count can stop
        // accumulating once a boundary slot is seen.
        for (axis, &bin) in bins.iter().enumerate().rev() {
            let shape = self.shapes[axis];
            let slot = shape
                .slot_of(bin)
                .ok_or(Error::InvalidLocalBin { axis, bin })?;
            cell_rank += slot * self.slot_strides[axis];
            if regular {
                regular_before += shape.regular_before(slot) * self.regular_strides[axis];
                regular = shape.is_regular_slot(slot);
            }
        }

        Ok(if regular {
            regular_before + 1
        } else {
            -(cell_rank - regular_before + 1)
        })
    }

    /// Local bins of the cell with the given global index.
    pub fn to_local(&self, global: i64) -> Result<Vec<i32>> {
        if global > 0 && global <= self.n_regular {
            Ok(self.regular_bins(global - 1))
        } else if global < 0 && global >= -self.n_flow_cells() {
            self.flow_bins(-global - 1)
                .ok_or(Error::InvalidIndex(global))
        } else {
            Err(Error::InvalidIndex(global))
        }
    }

    /// Iterates over all cells in row-major order, yielding local bins.
    pub fn cells(&self) -> impl Iterator<Item = Vec<i32>> + '_ {
        (0..self.n_cells).map(move |rank| {
            self.shapes
                .iter()
                .zip(&self.slot_strides)
                .map(|(shape, stride)| shape.bin_at(rank / stride % shape.n_slots()))
                .collect()
        })
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len == self.shapes.len() {
            Ok(())
        } else {
            Err(Error::InvalidDimensionality {
                expected: self.shapes.len(),
                actual: len,
            })
        }
    }

    /// Local bins of the `rank`-th regular cell (0-based).
    fn regular_bins(&self, mut rank: i64) -> Vec<i32> {
        self.shapes
            .iter()
            .map(|shape| {
                let n = i64::from(shape.n_regular);
                let bin = rank % n;
                rank /= n;
                bin as i32 + 1
            })
            .collect()
    }

    /// Local bins of the `rank`-th non-regular cell (0-based).
    fn flow_bins(&self, mut rank: i64) -> Option<Vec<i32>> {
        let mut bins = vec![0; self.shapes.len()];
        let mut regular = true;

        for axis in (0..self.shapes.len()).rev() {
            let shape = self.shapes[axis];
            let block = self.slot_strides[axis];

            let slot = if regular {
                // Non-regular cells below one regular slot of this axis.
                let inner = block - self.regular_strides[axis];
                let lead = if shape.flow { block } else { 0 };
                let middle = inner * i64::from(shape.n_regular);

                if rank < lead {
                    regular = false;
                    0
                } else if rank - lead < middle {
                    rank -= lead;
                    let slot = rank / inner + i64::from(shape.flow);
                    rank %= inner;
                    slot
                } else if shape.flow && rank - lead - middle < block {
                    rank -= lead + middle;
                    regular = false;
                    i64::from(shape.n_regular) + 1
                } else {
                    return None;
                }
            } else {
                let slot = rank / block;
                rank %= block;
                slot
            };
            bins[axis] = shape.bin_at(slot);
        }

        (!regular).then_some(bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexer(shapes: &[AxisShape]) -> GlobalIndexer {
        GlobalIndexer::new(shapes.to_vec()).unwrap()
    }

    #[test]
    fn test_one_dimensional_fixed() {
        let idx = indexer(&[AxisShape::fixed(3)]);
        assert_eq!(idx.to_global(&[-1]).unwrap(), -1);
        assert_eq!(idx.to_global(&[1]).unwrap(), 1);
        assert_eq!(idx.to_global(&[3]).unwrap(), 3);
        assert_eq!(idx.to_global(&[-2]).unwrap(), -2);
        assert_eq!(idx.n_cells(), 5);
        assert_eq!(idx.n_regular_cells(), 3);
        assert_eq!(idx.n_flow_cells(), 2);
    }

    #[test]
    fn test_two_dimensional_fixed_layout() {
        //           Axis 0
        //        UF  R1  R2  OF
        //   UF | -1  -2  -3  -4
        //   R1 | -5   1   2  -6
        //   R2 | -7   3   4  -8
        //   OF | -9 -10 -11 -12
        let idx = indexer(&[AxisShape::fixed(2), AxisShape::fixed(2)]);
        let expected = [
            -1, -2, -3, -4, -5, 1, 2, -6, -7, 3, 4, -8, -9, -10, -11, -12,
        ];
        let actual: Vec<i64> = idx.cells().map(|c| idx.to_global(&c).unwrap()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_growable_inner_axis_layout() {
        //          Axis 0
        //        R1  R2
        //   UF | -1  -2
        //   R1 |  1   2
        //   R2 |  3   4
        //   R3 |  5   6
        //   OF | -3  -4
        let idx = indexer(&[AxisShape::growable(2), AxisShape::fixed(3)]);
        let expected = [-1, -2, 1, 2, 3, 4, 5, 6, -3, -4];
        let actual: Vec<i64> = idx.cells().map(|c| idx.to_global(&c).unwrap()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_round_trip_mixed_axes() {
        let idx = indexer(&[
            AxisShape::fixed(3),
            AxisShape::growable(2),
            AxisShape::fixed(4),
            AxisShape::growable(3),
        ]);
        for cell in idx.cells() {
            let global = idx.to_global(&cell).unwrap();
            assert_ne!(global, 0);
            assert_eq!(idx.to_local(global).unwrap(), cell);
        }
        for global in 1..=idx.n_regular_cells() {
            assert_eq!(idx.to_global(&idx.to_local(global).unwrap()).unwrap(), global);
        }
        for global in 1..=idx.n_flow_cells() {
            let global = -global;
            assert_eq!(idx.to_global(&idx.to_local(global).unwrap()).unwrap(), global);
        }
    }

    #[test]
    fn test_all_growable_has_no_flow_cells() {
        let idx = indexer(&[
            AxisShape::growable(5),
            AxisShape::growable(9),
            AxisShape::growable(9),
        ]);
        assert_eq!(idx.n_cells(), 405);
        assert_eq!(idx.n_flow_cells(), 0);
        assert!(idx.to_local(-1).is_err());
        assert_eq!(idx.to_local(405).unwrap(), vec![5, 9, 9]);
    }

    #[test]
    fn test_invalid_global_indices() {
        let idx = indexer(&[AxisShape::fixed(2), AxisShape::fixed(2)]);
        assert_eq!(idx.to_local(0), Err(Error::InvalidIndex(0)));
        assert_eq!(idx.to_local(5), Err(Error::InvalidIndex(5)));
        assert_eq!(idx.to_local(-13), Err(Error::InvalidIndex(-13)));
        assert_eq!(idx.to_local(i64::MIN), Err(Error::InvalidIndex(i64::MIN)));
        assert!(idx.to_local(4).is_ok());
        assert!(idx.to_local(-12).is_ok());
    }

    #[test]
    fn test_invalid_local_bins() {
        let idx = indexer(&[AxisShape::fixed(2), AxisShape::growable(2)]);
        assert_eq!(
            idx.to_global(&[1, -1]),
            Err(Error::InvalidLocalBin { axis: 1, bin: -1 })
        );
        assert_eq!(
            idx.to_global(&[0, 1]),
            Err(Error::InvalidLocalBin { axis: 0, bin: 0 })
        );
        assert_eq!(
            idx.to_global(&[3, 1]),
            Err(Error::InvalidLocalBin { axis: 0, bin: 3 })
        );
        assert_eq!(
            idx.to_global(&[1]),
            Err(Error::InvalidDimensionality {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_cell_count_overflow() {
        let shape = AxisShape::fixed(i32::MAX - 2);
        let result = GlobalIndexer::new(vec![shape, shape, shape]);
        assert_eq!(result, Err(Error::BinCountOverflow));
    }

    #[test]
    fn test_grown_shape() {
        let shape = AxisShape::growable(4)
            .grown(Growth { below: 2, above: 1 })
            .unwrap();
        assert_eq!(shape.n_regular(), 7);
        assert!(!shape.has_flow_bins());

        assert_eq!(AxisShape::fixed(4).grown(Growth::default()), Some(AxisShape::fixed(4)));
        assert_eq!(AxisShape::fixed(4).grown(Growth { below: 1, above: 0 }), None);
        assert_eq!(AxisShape::growable(4).grown(Growth { below: -1, above: 0 }), None);
        assert_eq!(AxisShape::growable(4).grown(Growth { below: 0, above: i32::MAX }), None);
    }

    #[test]
    fn test_rejects_empty_axes() {
        for shape in [AxisShape::fixed(0), AxisShape::growable(-3)] {
            assert!(matches!(
                GlobalIndexer::new(vec![AxisShape::fixed(2), shape]),
                Err(Error::InvalidAxis(_))
            ));
        }
    }
}
