//! Global index translation across axis growth.

use histbin_core::{Growth, Result};

use crate::index::GlobalIndexer;

/// Maps global indices issued before an axis growth to the indices of the
/// same cells after it.
///
/// Growth renumbers cells in two ways: bins prepended to a growable axis
/// shift its local indices, and any change in bin count changes the
/// row-major strides. Cell identity (the bin edges) is preserved.
#[derive(Debug, Clone)]
pub struct BinRemap {
    before: GlobalIndexer,
    after: GlobalIndexer,
    shifts: Vec<i32>,
}

impl BinRemap {
    pub(crate) fn new(before: GlobalIndexer, after: GlobalIndexer, growths: &[Growth]) -> Self {
        Self {
            before,
            after,
            shifts: growths.iter().map(|g| g.below).collect(),
        }
    }

    /// New global index of the cell that had index `global` before growth.
    pub fn map(&self, global: i64) -> Result<i64> {
        let mut bins = self.before.to_local(global)?;
        for (bin, shift) in bins.iter_mut().zip(&self.shifts) {
            if *bin >= 1 {
                *bin += shift;
            }
        }
        self.after.to_global(&bins)
    }

    /// Indexer in effect before the growth.
    #[must_use]
    pub fn before(&self) -> &GlobalIndexer {
        &self.before
    }

    /// Indexer in effect after the growth.
    #[must_use]
    pub fn after(&self) -> &GlobalIndexer {
        &self.after
    }

    pub(crate) fn into_after(self) -> GlobalIndexer {
        self.after
    }
}
