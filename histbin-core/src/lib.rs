//! histbin-core: Axis types for N-dimensional histogram binning.
//!
//! This crate provides the per-dimension building blocks: the [`Axis`]
//! trait, fixed-range and growable equidistant axes, local bin
//! classification and bin extents.
//!

pub mod axis;
pub mod config;
pub mod error;
pub mod fixed;
pub mod grow;

pub use axis::{
    ordered_bins, Axis, BinExtent, BinKind, Growth, MAX_REGULAR_BINS, OVERFLOW_BIN, UNDERFLOW_BIN,
};
pub use config::AxisConfig;
pub use error::{Error, Result};
pub use fixed::FixedAxis;
pub use grow::GrowAxis;
