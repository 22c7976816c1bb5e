//! Error types for histbin.

use thiserror::Error;

/// Result type alias for histbin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for histbin operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Coordinate or local-bin vector does not match the number of axes.
    #[error("expected {expected} values (one per axis), got {actual}")]
    InvalidDimensionality { expected: usize, actual: usize },

    /// Global bin index that does not identify any cell.
    #[error("invalid global bin index: {0}")]
    InvalidIndex(i64),

    /// Local bin index that does not exist on the given axis.
    #[error("invalid local bin {bin} on axis {axis}")]
    InvalidLocalBin { axis: usize, bin: i32 },

    /// Growing an axis to admit a value would exhaust the bin count.
    #[error("axis {axis} cannot grow to admit {value}: bin count overflow")]
    AxisGrowthOverflow { axis: usize, value: f64 },

    /// Value lies outside the current range of a growable axis.
    #[error("value {value} is outside the current range of growable axis {axis}")]
    OutOfAxisRange { axis: usize, value: f64 },

    /// Value that no bin of a growable axis can ever admit.
    #[error("value {value} cannot be binned on growable axis {axis}")]
    InvalidCoordinate { axis: usize, value: f64 },

    /// Axis construction error.
    #[error("invalid axis: {0}")]
    InvalidAxis(String),

    /// Total number of cells does not fit the global index.
    #[error("total number of histogram cells overflows the global bin index")]
    BinCountOverflow,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Attributes an axis-level error to axis number `axis`.
    ///
    /// Axes report their own errors with axis `0`; owners of several axes
    /// use this to name the offending dimension.
    #[must_use]
    pub fn at_axis(self, axis: usize) -> Self {
        match self {
            Error::InvalidLocalBin { bin, .. } => Error::InvalidLocalBin { axis, bin },
            Error::AxisGrowthOverflow { value, .. } => Error::AxisGrowthOverflow { axis, value },
            Error::OutOfAxisRange { value, .. } => Error::OutOfAxisRange { axis, value },
            Error::InvalidCoordinate { value, .. } => Error::InvalidCoordinate { axis, value },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_axis_rewrites_axis_number() {
        let err = Error::InvalidLocalBin { axis: 0, bin: 7 }.at_axis(2);
        assert_eq!(err, Error::InvalidLocalBin { axis: 2, bin: 7 });

        let err = Error::InvalidIndex(0).at_axis(2);
        assert_eq!(err, Error::InvalidIndex(0));
    }

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidDimensionality {
            expected: 2,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "expected 2 values (one per axis), got 3"
        );
        assert_eq!(
            Error::InvalidIndex(-13).to_string(),
            "invalid global bin index: -13"
        );
    }
}
