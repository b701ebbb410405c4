/// A lightweight, serializable snapshot of the scroll state.
///
/// Owned by the virtualizer and changed only through `on_scroll`/`on_resize`.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: f64,
    pub viewport_extent: f64,
}

impl ScrollState {
    pub fn new(offset: f64, viewport_extent: f64) -> Self {
        Self {
            offset: sanitize(offset),
            viewport_extent: sanitize(viewport_extent),
        }
    }

    /// The far edge of the viewport.
    pub fn end(&self) -> f64 {
        self.offset + self.viewport_extent
    }

    /// Remaining scrollable distance below the viewport for content of `total_extent`.
    ///
    /// Negative when the viewport extends past the content (short lists).
    pub fn distance_from_end(&self, total_extent: f64) -> f64 {
        total_extent - self.end()
    }
}

/// Maps NaN and negative values to `0.0`. Positive infinity is kept and clamped later
/// against the total extent.
pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}
