//! Bin content storage.
//!
//! Histogram statistics live outside the binning core. The histogram only
//! hands a store the global index of every fill and, after an axis grows,
//! the translation from old to new indices.

use std::collections::BTreeMap;

use histbin_core::Result;

use crate::remap::BinRemap;

/// Storage for bin contents, keyed by global bin index.
///
/// Keys are never `0`. Both positive (regular) and negative (boundary)
/// keys must be accepted.
pub trait BinContent {
    /// Records one entry in `bin`.
    fn fill(&mut self, bin: i64);

    /// Moves stored content to the indices of the same cells after growth.
    ///
    /// Called before any axis changes. On error the store must keep its
    /// previous content; the fill is then aborted and nothing grows.
    fn remap(&mut self, remap: &BinRemap) -> Result<()>;
}

/// Sparse entry counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinCounts {
    counts: BTreeMap<i64, u64>,
}

impl BinCounts {
    /// Creates an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in `bin`.
    #[must_use]
    pub fn get(&self, bin: i64) -> u64 {
        self.counts.get(&bin).copied().unwrap_or(0)
    }

    /// Total number of entries.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of bins with at least one entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing was filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over filled bins in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.counts.iter().map(|(&bin, &count)| (bin, count))
    }
}

impl BinContent for BinCounts {
    fn fill(&mut self, bin: i64) {
        *self.counts.entry(bin).or_insert(0) += 1;
    }

    fn remap(&mut self, remap: &BinRemap) -> Result<()> {
        let counts = self
            .counts
            .iter()
            .map(|(&bin, &count)| remap.map(bin).map(|bin| (bin, count)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        self.counts = counts;
        Ok(())
    }
}
