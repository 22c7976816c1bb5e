//! N-dimensional histogram binning.

use histbin_core::{Axis, BinExtent, Error, Growth, Result};

use crate::config::HistogramConfig;
use crate::content::{BinContent, BinCounts};
use crate::index::GlobalIndexer;
use crate::remap::BinRemap;

/// Histogram over a fixed number of axes.
///
/// Resolves coordinates to global bin indices and forwards fills to a
/// [`BinContent`] store. Growable axes are extended during
/// [`Histogram::fill`]; when that happens every index issued so far may
/// change and the store is remapped accordingly.
///
/// A histogram is not synchronized. Concurrent fills need external locking.
#[derive(Debug)]
pub struct Histogram<C = BinCounts> {
    axes: Vec<Box<dyn Axis>>,
    indexer: GlobalIndexer,
    content: C,
}

impl Histogram<BinCounts> {
    /// Creates a histogram that counts entries per bin.
    pub fn new(axes: Vec<Box<dyn Axis>>) -> Result<Self> {
        Self::with_content(axes, BinCounts::new())
    }

    /// Creates a counting histogram from a configuration.
    pub fn from_config(config: &HistogramConfig) -> Result<Self> {
        Self::new(config.build_axes()?)
    }
}

impl<C: BinContent> Histogram<C> {
    /// Creates a histogram that forwards fills to `content`.
    pub fn with_content(axes: Vec<Box<dyn Axis>>, content: C) -> Result<Self> {
        if axes.is_empty() {
            return Err(Error::InvalidAxis(
                "a histogram needs at least one axis".to_string(),
            ));
        }
        let indexer = GlobalIndexer::from_axes(&axes)?;
        Ok(Self {
            axes,
            indexer,
            content,
        })
    }

    /// Number of axes.
    #[must_use]
    pub fn n_dims(&self) -> usize {
        self.axes.len()
    }

    /// Axis number `axis`.
    #[must_use]
    pub fn axis(&self, axis: usize) -> Option<&dyn Axis> {
        self.axes.get(axis).map(|a| &**a)
    }

    /// Iterates over the axes, axis 0 first.
    pub fn axes(&self) -> impl Iterator<Item = &dyn Axis> {
        self.axes.iter().map(|a| &**a)
    }

    /// Global indexer for the current axis ranges.
    #[must_use]
    pub fn indexer(&self) -> &GlobalIndexer {
        &self.indexer
    }

    /// Total number of cells.
    #[must_use]
    pub fn n_cells(&self) -> i64 {
        self.indexer.n_cells()
    }

    /// Number of cells with positive global index.
    #[must_use]
    pub fn n_regular_cells(&self) -> i64 {
        self.indexer.n_regular_cells()
    }

    /// Content store.
    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Consumes the histogram and returns its content store.
    pub fn into_content(self) -> C {
        self.content
    }

    /// Global bin index of `coords` in the current axis ranges.
    ///
    /// Never grows an axis: a coordinate outside the range of a growable
    /// axis is reported as [`Error::OutOfAxisRange`].
    pub fn bin_index(&self, coords: &[f64]) -> Result<i64> {
        self.check_dims(coords.len())?;
        let bins = self.find_bins(coords)?;
        self.indexer.to_global(&bins)
    }

    /// Records one entry at `coords` and returns its global bin index.
    ///
    /// Growable axes are extended first if needed. Growth is checked for
    /// all axes, and the content store is remapped, before any axis
    /// changes. A failed fill leaves the histogram as it was, provided the
    /// store keeps its content when [`BinContent::remap`] fails.
    pub fn fill(&mut self, coords: &[f64]) -> Result<i64> {
        self.check_dims(coords.len())?;
        self.grow_to(coords)?;
        let global = self.bin_index(coords)?;
        self.content.fill(global);
        Ok(global)
    }

    /// Global bin index of the cell at the given local bins.
    pub fn global_bin(&self, bins: &[i32]) -> Result<i64> {
        self.indexer.to_global(bins)
    }

    /// Local bins of the cell with global index `global`.
    pub fn local_bins(&self, global: i64) -> Result<Vec<i32>> {
        self.indexer.to_local(global)
    }

    /// Per-axis extent of the cell with global index `global`.
    pub fn bin_extent(&self, global: i64) -> Result<Vec<BinExtent>> {
        self.indexer
            .to_local(global)?
            .into_iter()
            .zip(&self.axes)
            .enumerate()
            .map(|(i, (bin, axis))| axis.bin_extent(bin).map_err(|e| e.at_axis(i)))
            .collect()
    }

    /// Per-axis lower edges of a cell.
    pub fn bin_from(&self, global: i64) -> Result<Vec<f64>> {
        self.map_extent(global, |e| e.from)
    }

    /// Per-axis centers of a cell.
    pub fn bin_center(&self, global: i64) -> Result<Vec<f64>> {
        self.map_extent(global, |e| e.center)
    }

    /// Per-axis upper edges of a cell.
    pub fn bin_to(&self, global: i64) -> Result<Vec<f64>> {
        self.map_extent(global, |e| e.to)
    }

    fn map_extent(&self, global: i64, f: impl Fn(&BinExtent) -> f64) -> Result<Vec<f64>> {
        Ok(self.bin_extent(global)?.iter().map(f).collect())
    }

    fn check_dims(&self, len: usize) -> Result<()> {
        if len == self.axes.len() {
            Ok(())
        } else {
            Err(Error::InvalidDimensionality {
                expected: self.axes.len(),
                actual: len,
            })
        }
    }

    fn find_bins(&self, coords: &[f64]) -> Result<Vec<i32>> {
        self.axes
            .iter()
            .zip(coords)
            .enumerate()
            .map(|(axis, (a, &value))| {
                a.find_bin(value)
                    .ok_or(Error::OutOfAxisRange { axis, value })
            })
            .collect()
    }

    /// Extends growable axes so that every coordinate falls into a bin.
    fn grow_to(&mut self, coords: &[f64]) -> Result<()> {
        let growths = self
            .axes
            .iter()
            .zip(coords)
            .enumerate()
            .map(|(i, (axis, &x))| {
                axis.growth_for(x)
                    .map(Option::unwrap_or_default)
                    .map_err(|e| e.at_axis(i))
            })
            .collect::<Result<Vec<Growth>>>()?;

        if growths.iter().all(Growth::is_empty) {
            return Ok(());
        }

        let shapes = self
            .indexer
            .shapes()
            .iter()
            .zip(&growths)
            .map(|(shape, &growth)| shape.grown(growth))
            .collect::<Option<Vec<_>>>();
        let indexer = shapes
            .ok_or(Error::BinCountOverflow)
            .and_then(GlobalIndexer::new)
            .map_err(|_| {
                let axis = growths.iter().position(|g| !g.is_empty()).unwrap_or(0);
                log::warn!(
                    "rejected growth of axis {axis} to admit {}: too many bins",
                    coords[axis]
                );
                Error::AxisGrowthOverflow {
                    axis,
                    value: coords[axis],
                }
            })?;

        // Content is remapped before any axis changes.
        let remap = BinRemap::new(self.indexer.clone(), indexer, &growths);
        self.content.remap(&remap)?;

        // Shapes were validated above; built-in axes accept the same growth.
        for (i, (axis, &growth)) in self.axes.iter_mut().zip(&growths).enumerate() {
            if growth.is_empty() {
                continue;
            }
            axis.grow(growth).map_err(|e| e.at_axis(i))?;
            log::debug!(
                "axis {i} grew by {} bins below and {} above, now {} bins over [{}, {})",
                growth.below,
                growth.above,
                axis.n_bins_no_over(),
                axis.bin_from(1).unwrap_or(f64::NAN),
                axis.bin_to(axis.n_bins_no_over()).unwrap_or(f64::NAN),
            );
        }

        self.indexer = remap.into_after();
        Ok(())
    }
}
