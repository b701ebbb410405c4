use alloc::vec::Vec;

/// Where an item should land in the viewport for `scroll_to_index`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    /// Keep the current offset if the item is fully visible, otherwise align to the nearest
    /// edge.
    Auto,
}

/// A half-open index range `[start_index, end_index)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl VirtualRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
    };

    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    /// Expands both ends by `overscan`, clamped to `[0, count)`.
    pub fn overscanned(self, overscan: usize, count: usize) -> Self {
        if self.is_empty() {
            return self;
        }
        Self {
            start_index: self.start_index.saturating_sub(overscan),
            end_index: self.end_index.saturating_add(overscan).min(count),
        }
    }
}

/// A positioned entry for exactly one index of the current window.
///
/// Items are rebuilt on every window recomputation and are never updated in place.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualItem {
    pub index: usize,
    /// Start offset along the scroll axis, ready for absolute positioning.
    pub start: f64,
    /// Size along the scroll axis (measured if known, otherwise the estimate).
    pub size: f64,
}

impl VirtualItem {
    pub fn end(&self) -> f64 {
        self.start + self.size
    }

    /// Translation for a row kept in normal flow at `position` within the window.
    ///
    /// Table bodies lay rows out one after another, so each row only needs to be shifted by
    /// the distance between its absolute start and where the flow would put it.
    pub fn flow_offset(&self, position: usize) -> f64 {
        self.start - position as f64 * self.size
    }
}

/// The materialized window: contiguous ascending items plus the extents around them.
///
/// `before_extent` and `after_extent` are the spacer sizes a flow-layout host places above
/// and below the items; `before_extent + sum(sizes) + after_extent == total_extent`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub items: Vec<VirtualItem>,
    pub before_extent: f64,
    pub after_extent: f64,
    pub total_extent: f64,
}

impl Window {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The index range covered by the window (empty when there are no items).
    pub fn range(&self) -> VirtualRange {
        match (self.items.first(), self.items.last()) {
            (Some(first), Some(last)) => VirtualRange::new(first.index, last.index + 1),
            _ => VirtualRange::EMPTY,
        }
    }

    pub fn iter(&self) -> core::slice::Iter<'_, VirtualItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Window {
    type Item = &'a VirtualItem;
    type IntoIter = core::slice::Iter<'a, VirtualItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
