use alloc::sync::Arc;

use crate::ConfigError;

/// Default size estimate for list items.
pub const DEFAULT_ESTIMATE: f64 = 100.0;
/// Default number of items rendered beyond each edge of the viewport.
pub const DEFAULT_OVERSCAN: usize = 10;
/// Row estimate used by [`VirtualizerOptions::table`].
pub const TABLE_ROW_ESTIMATE: f64 = 52.0;
/// Overscan used by [`VirtualizerOptions::table`].
pub const TABLE_OVERSCAN: usize = 20;

/// A per-index size estimator.
pub type EstimateFn = Arc<dyn Fn(usize) -> f64 + Send + Sync>;

/// The fallback size for items that have not been measured yet.
#[derive(Clone)]
pub enum Estimate {
    /// The same estimate for every index.
    Fixed(f64),
    /// An estimate computed per index. Non-finite or negative results are treated as `0.0`.
    PerIndex(EstimateFn),
}

impl Estimate {
    pub fn per_index(f: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        Self::PerIndex(Arc::new(f))
    }

    /// Returns the sanitized estimate for `index`.
    pub fn size_for(&self, index: usize) -> f64 {
        match self {
            Self::Fixed(v) => *v,
            Self::PerIndex(f) => {
                let v = f(index);
                if v.is_finite() && v >= 0.0 {
                    v
                } else {
                    vwarn!(index, estimate = v, "estimator returned an invalid size");
                    0.0
                }
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Fixed(value) if !(value.is_finite() && value > 0.0) => {
                Err(ConfigError::InvalidEstimate { value })
            }
            _ => Ok(()),
        }
    }

    /// Whether `other` yields the same estimates without calling into it.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a.to_bits() == b.to_bits(),
            (Self::PerIndex(a), Self::PerIndex(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for Estimate {
    fn default() -> Self {
        Self::Fixed(DEFAULT_ESTIMATE)
    }
}

impl From<f64> for Estimate {
    fn from(value: f64) -> Self {
        Self::Fixed(value)
    }
}

impl core::fmt::Debug for Estimate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::PerIndex(_) => f.write_str("PerIndex(..)"),
        }
    }
}

/// Configuration for [`crate::Virtualizer`].
///
/// Cheap to clone: the estimator lives in an `Arc`, so hosts can tweak a field and call
/// `Virtualizer::set_options` on every render without reallocating closures.
#[derive(Clone, Debug)]
pub struct VirtualizerOptions {
    pub count: usize,
    pub estimate: Estimate,
    pub overscan: usize,

    /// Enables/disables the virtualizer. When disabled, query methods return empty results.
    pub enabled: bool,

    /// Scroll offset applied when the virtualizer is created.
    pub initial_offset: f64,
    /// Viewport extent applied when the virtualizer is created.
    pub initial_viewport_extent: f64,
}

impl VirtualizerOptions {
    /// Creates options for `count` items sized by `estimate` (a fixed size or an
    /// [`Estimate::PerIndex`] estimator).
    pub fn new(count: usize, estimate: impl Into<Estimate>) -> Self {
        Self {
            count,
            estimate: estimate.into(),
            overscan: DEFAULT_OVERSCAN,
            enabled: true,
            initial_offset: 0.0,
            initial_viewport_extent: 0.0,
        }
    }

    /// Options for a data table with fixed-height rows.
    pub fn table(count: usize) -> Self {
        Self::new(count, TABLE_ROW_ESTIMATE).with_overscan(TABLE_OVERSCAN)
    }

    pub fn with_estimate(mut self, estimate: impl Into<Estimate>) -> Self {
        self.estimate = estimate.into();
        self
    }

    pub fn with_estimate_fn(mut self, f: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        self.estimate = Estimate::per_index(f);
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_initial_offset(mut self, offset: f64) -> Self {
        self.initial_offset = offset;
        self
    }

    pub fn with_initial_viewport_extent(mut self, extent: f64) -> Self {
        self.initial_viewport_extent = extent;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.estimate.validate()
    }
}

impl Default for VirtualizerOptions {
    fn default() -> Self {
        Self::new(0, DEFAULT_ESTIMATE)
    }
}
