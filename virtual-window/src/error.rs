//! Error types for configuration and measurement.
//!
//! Range errors (scroll offsets or indexes outside the list) are never reported: they are
//! clamped at every entry point, because scroll and resize events arrive continuously and the
//! read path must not fail.

/// A rejected configuration.
///
/// Returned synchronously by `configure`-style calls. The virtualizer that received it renders
/// an empty window until a valid configuration is applied.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A grid was configured with zero columns.
    #[error("grid column count must be at least 1")]
    ZeroColumns,

    /// A fixed size estimate that is not a positive, finite number.
    #[error("size estimate must be a positive finite number, got {value}")]
    InvalidEstimate { value: f64 },

    /// A load-more threshold that is negative or not finite.
    #[error("load-more threshold must be a non-negative finite number, got {value}")]
    InvalidThreshold { value: f64 },
}

/// A discarded measurement.
///
/// The prior size (estimate or earlier measurement) is kept and rendering continues; this is a
/// warning for the caller, not a failure of the virtualizer.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum MeasurementError {
    #[error("measured size for item {index} is not finite ({size})")]
    NonFinite { index: usize, size: f64 },

    #[error("measured size for item {index} is negative ({size})")]
    Negative { index: usize, size: f64 },
}

impl MeasurementError {
    /// The index the rejected measurement was reported for.
    pub fn index(&self) -> usize {
        match *self {
            Self::NonFinite { index, .. } | Self::Negative { index, .. } => index,
        }
    }

    pub(crate) fn check(index: usize, size: f64) -> Result<f64, Self> {
        if !size.is_finite() {
            return Err(Self::NonFinite { index, size });
        }
        if size < 0.0 {
            return Err(Self::Negative { index, size });
        }
        Ok(size)
    }
}
