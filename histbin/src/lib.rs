//! histbin: N-dimensional histogram binning with global bin indices.
//!
//! Maps sample coordinates to a single global bin index and back, over a
//! tuple of independently configured axes:
//! - **Fixed** axes have regular bins plus underflow and overflow bins.
//! - **Growable** axes have regular bins only and extend their range when a
//!   fill falls outside it.
//!
//! Cells where every axis bin is regular get indices `1, 2, 3, ...`, all
//! other cells `-1, -2, -3, ...`, both in row-major order with axis 0
//! varying fastest. See [`index`] for the full numbering scheme.
//!
//! # Example
//!
//! ```
//! use histbin::{Histogram, HistogramConfig};
//!
//! let config = HistogramConfig::new()
//!     .with_fixed(2, 0.0, 2.0)
//!     .with_fixed(2, -1.0, 1.0);
//! let mut hist = Histogram::from_config(&config).unwrap();
//!
//! assert_eq!(hist.fill(&[0.5, -0.5]).unwrap(), 1);
//! assert_eq!(hist.bin_index(&[1.5, 0.5]).unwrap(), 4);
//! assert_eq!(hist.bin_index(&[-100.0, -100.0]).unwrap(), -1);
//! assert_eq!(hist.bin_center(4).unwrap(), vec![1.5, 0.5]);
//! ```
#![warn(missing_docs)]

pub mod config;
pub mod content;
mod histogram;
pub mod index;
mod remap;

pub use config::HistogramConfig;
pub use content::{BinContent, BinCounts};
pub use histogram::Histogram;
pub use index::{AxisShape, GlobalIndexer};
pub use remap::BinRemap;

// Re-export core axis types for convenience
pub use histbin_core::{
    ordered_bins, Axis, AxisConfig, BinExtent, BinKind, Error, FixedAxis, GrowAxis, Growth,
    Result, MAX_REGULAR_BINS, OVERFLOW_BIN, UNDERFLOW_BIN,
};
