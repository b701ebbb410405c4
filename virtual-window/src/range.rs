//! Offset → index-range queries over a [`MeasurementStore`].
//!
//! These are free functions over an explicit store so that several independent lists can
//! share the math without sharing state.

use alloc::vec::Vec;

use crate::{MeasurementStore, VirtualItem, VirtualRange, Window};

/// Largest scroll offset that still fills the viewport.
pub fn max_scroll_offset(store: &mut MeasurementStore, viewport_extent: f64) -> f64 {
    let total = store.total_extent();
    (total - viewport_extent.max(0.0)).max(0.0)
}

/// Clamps `offset` into `[0, max_scroll_offset]`. NaN maps to `0.0`.
pub fn clamp_scroll_offset(store: &mut MeasurementStore, offset: f64, viewport_extent: f64) -> f64 {
    if offset.is_nan() {
        return 0.0;
    }
    offset.clamp(0.0, max_scroll_offset(store, viewport_extent))
}

/// The strictly visible range (no overscan) for a viewport at `scroll_offset`.
///
/// The offset is clamped to `[0, total_extent]`, not to the max scroll offset: a viewport
/// parked past the last full page shows only the items it actually overlaps, and an offset
/// past the end yields the last item alone.
///
/// The first visible item is the first one whose end lies past the clamped offset; an item
/// whose end abuts the top edge is not visible, an item whose start does is. The forward scan
/// for the last visible item only walks the items that fit in the viewport.
pub fn visible_range(
    store: &mut MeasurementStore,
    scroll_offset: f64,
    viewport_extent: f64,
) -> VirtualRange {
    let count = store.len();
    // `!(x > 0)` also rejects NaN.
    if count == 0 || !(viewport_extent > 0.0) {
        return VirtualRange::EMPTY;
    }

    let total = store.total_extent();
    let offset = if scroll_offset.is_nan() {
        0.0
    } else {
        scroll_offset.clamp(0.0, total)
    };
    let viewport_end = offset + viewport_extent;

    let first = store.index_at_offset(offset);
    let mut end = first + 1;
    while end < count && store.offset_of(end) < viewport_end {
        end += 1;
    }

    VirtualRange::new(first, end)
}

/// The visible range expanded by `overscan` on both sides, clamped to the list.
pub fn overscanned_range(
    store: &mut MeasurementStore,
    scroll_offset: f64,
    viewport_extent: f64,
    overscan: usize,
) -> VirtualRange {
    let count = store.len();
    visible_range(store, scroll_offset, viewport_extent).overscanned(overscan, count)
}

/// Materializes `range` into positioned items plus the spacer extents around them.
pub fn materialize(store: &mut MeasurementStore, range: VirtualRange) -> Window {
    let total_extent = store.total_extent();
    let end_index = range.end_index.min(store.len());
    if range.start_index >= end_index {
        return Window {
            items: Vec::new(),
            before_extent: 0.0,
            after_extent: total_extent,
            total_extent,
        };
    }

    let before_extent = store.offset_of(range.start_index);
    let mut items = Vec::with_capacity(end_index - range.start_index);
    let mut start = before_extent;
    for index in range.start_index..end_index {
        let size = store.size_of(index);
        items.push(VirtualItem { index, start, size });
        start += size;
    }
    // Read back from the cache rather than `start` to keep float error out of the spacer.
    let after_extent = total_extent - store.offset_of(end_index);

    Window {
        items,
        before_extent,
        after_extent,
        total_extent,
    }
}

/// Full window computation: visible range, overscan, materialization.
pub fn compute_window(
    store: &mut MeasurementStore,
    scroll_offset: f64,
    viewport_extent: f64,
    overscan: usize,
) -> Window {
    let range = overscanned_range(store, scroll_offset, viewport_extent, overscan);
    materialize(store, range)
}
