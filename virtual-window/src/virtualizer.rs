use alloc::vec::Vec;

use crate::range;
use crate::state::sanitize;
use crate::{
    Align, ConfigError, Estimate, MeasurementError, MeasurementStore, ScrollHost, ScrollState,
    VirtualItem, VirtualRange, VirtualizerOptions, Window,
};

/// A headless windowing engine.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects.
/// - Your host drives it by reporting viewport extent and scroll offset
///   (`on_resize`/`on_scroll`) and measured item sizes (`record_measurement`).
/// - Derived output is pull-based: nothing is recomputed until the next read, so a burst of
///   scroll events costs one window computation.
///
/// Reads take `&mut self` because they may extend the internal prefix-sum cache.
#[derive(Clone, Debug)]
pub struct Virtualizer {
    options: VirtualizerOptions,
    scroll: ScrollState,
    store: MeasurementStore,
    config_error: Option<ConfigError>,
    window: Option<Window>, // None when stale
}

impl Virtualizer {
    /// Creates a new virtualizer from options.
    ///
    /// Invalid options do not panic: the virtualizer starts misconfigured (see
    /// [`Self::config_error`]) and renders nothing until valid options are applied.
    pub fn new(options: VirtualizerOptions) -> Self {
        let config_error = options.validate().err();
        vdebug!(
            count = options.count,
            enabled = options.enabled,
            overscan = options.overscan,
            valid = config_error.is_none(),
            "Virtualizer::new"
        );
        let store = match config_error {
            None => MeasurementStore::with_len(options.estimate.clone(), options.count),
            Some(_err) => {
                vwarn!(err = %_err, "Virtualizer::new: rejected options");
                MeasurementStore::new(Estimate::default())
            }
        };
        Self {
            scroll: ScrollState::new(options.initial_offset, options.initial_viewport_extent),
            store,
            config_error,
            window: None,
            options,
        }
    }

    /// Like [`Self::new`], but rejects invalid options instead of starting misconfigured.
    pub fn try_new(options: VirtualizerOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self::new(options))
    }

    pub fn options(&self) -> &VirtualizerOptions {
        &self.options
    }

    /// Applies new options.
    ///
    /// A count decrease drops measurements for indexes that no longer exist; an increase keeps
    /// them and estimates the new indexes. Measurements survive an estimate change.
    ///
    /// On error the previous options are kept but the window stays empty until a valid
    /// configuration is applied.
    pub fn set_options(&mut self, options: VirtualizerOptions) -> Result<(), ConfigError> {
        self.window = None;
        if let Err(err) = options.validate() {
            vwarn!(%err, "Virtualizer::set_options: rejected options");
            self.config_error = Some(err);
            return Err(err);
        }

        let was_enabled = self.options.enabled;
        let recovering = self.config_error.take().is_some();
        let estimate_changed = recovering || !self.options.estimate.same_as(&options.estimate);
        self.options = options;
        vtrace!(
            count = self.options.count,
            enabled = self.options.enabled,
            overscan = self.options.overscan,
            estimate_changed,
            "Virtualizer::set_options"
        );

        if estimate_changed {
            self.store.set_estimate(self.options.estimate.clone());
        }
        if self.store.len() != self.options.count {
            self.store.set_len(self.options.count);
        }
        if self.options.enabled && !was_enabled {
            self.reset_to_initial();
        }
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(
        &mut self,
        f: impl FnOnce(&mut VirtualizerOptions),
    ) -> Result<(), ConfigError> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    /// (Re)configures the list in one call.
    pub fn configure(
        &mut self,
        count: usize,
        estimate: impl Into<Estimate>,
        overscan: usize,
    ) -> Result<(), ConfigError> {
        let estimate = estimate.into();
        self.update_options(|o| {
            o.count = count;
            o.estimate = estimate;
            o.overscan = overscan;
        })
    }

    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count && self.store.len() == count {
            return;
        }
        vdebug!(from = self.options.count, to = count, "Virtualizer::set_count");
        self.options.count = count;
        if self.config_error.is_none() {
            self.store.set_len(count);
        }
        self.window = None;
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.options.overscan == overscan {
            return;
        }
        self.options.overscan = overscan;
        self.window = None;
    }

    pub fn set_estimate(&mut self, estimate: impl Into<Estimate>) -> Result<(), ConfigError> {
        let estimate = estimate.into();
        self.update_options(|o| o.estimate = estimate)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.options.enabled == enabled {
            return;
        }
        self.options.enabled = enabled;
        if enabled {
            self.reset_to_initial();
        }
        self.window = None;
    }

    fn reset_to_initial(&mut self) {
        self.scroll = ScrollState::new(
            self.options.initial_offset,
            self.options.initial_viewport_extent,
        );
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn overscan(&self) -> usize {
        self.options.overscan
    }

    pub fn enabled(&self) -> bool {
        self.options.enabled
    }

    /// The error from the last rejected configuration, if it has not been corrected since.
    pub fn config_error(&self) -> Option<ConfigError> {
        self.config_error
    }

    fn is_active(&self) -> bool {
        self.options.enabled && self.config_error.is_none()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset
    }

    pub fn viewport_extent(&self) -> f64 {
        self.scroll.viewport_extent
    }

    /// Records a scroll offset reported by the host.
    ///
    /// Negative and NaN offsets are treated as `0.0`; offsets past the end are clamped when the
    /// window is computed.
    pub fn on_scroll(&mut self, offset: f64) {
        let offset = sanitize(offset);
        if self.scroll.offset.to_bits() == offset.to_bits() {
            return;
        }
        vtrace!(offset, "on_scroll");
        self.scroll.offset = offset;
        self.window = None;
    }

    /// Records a viewport extent reported by the host.
    pub fn on_resize(&mut self, viewport_extent: f64) {
        let viewport_extent = sanitize(viewport_extent);
        if self.scroll.viewport_extent.to_bits() == viewport_extent.to_bits() {
            return;
        }
        vtrace!(viewport_extent, "on_resize");
        self.scroll.viewport_extent = viewport_extent;
        self.window = None;
    }

    /// Pulls the current geometry from a host binding.
    pub fn sync_from_host(&mut self, host: &impl ScrollHost) {
        self.on_resize(host.viewport_extent());
        self.on_scroll(host.scroll_offset());
    }

    /// Records the rendered size of `index`.
    ///
    /// Returns the change in total extent. A non-finite or negative size is discarded, the
    /// previous size is kept, and the error is returned as a warning. Indexes outside the list
    /// are ignored.
    pub fn record_measurement(
        &mut self,
        index: usize,
        size: f64,
    ) -> Result<f64, MeasurementError> {
        if self.config_error.is_some() {
            return Ok(0.0);
        }
        vtrace!(index, size, "record_measurement");
        let delta = self.store.record(index, size)?;
        if delta != 0.0 {
            self.window = None;
        }
        Ok(delta)
    }

    /// Records many measurements and returns how many were accepted.
    ///
    /// Rejected entries are logged and skipped; the rest are still applied.
    pub fn record_measurements(
        &mut self,
        measurements: impl IntoIterator<Item = (usize, f64)>,
    ) -> usize {
        let mut applied = 0usize;
        for (index, size) in measurements {
            if index >= self.store.len() {
                continue;
            }
            if self.record_measurement(index, size).is_ok() {
                applied += 1;
            }
        }
        applied
    }

    /// Forgets every measured size (e.g. after a width change reflows every item).
    pub fn reset_measurements(&mut self) {
        vdebug!(measured = self.store.measured_count(), "reset_measurements");
        self.store.reset_measurements();
        self.window = None;
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.store.is_measured(index)
    }

    /// The measurement store backing this virtualizer.
    pub fn measurements(&self) -> &MeasurementStore {
        &self.store
    }

    pub fn total_size(&mut self) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        self.store.total_extent()
    }

    /// The strictly visible range for the current scroll state.
    pub fn visible_range(&mut self) -> VirtualRange {
        let ScrollState {
            offset,
            viewport_extent,
        } = self.scroll;
        self.visible_range_for(offset, viewport_extent)
    }

    pub fn visible_range_for(&mut self, scroll_offset: f64, viewport_extent: f64) -> VirtualRange {
        if !self.is_active() {
            return VirtualRange::EMPTY;
        }
        range::visible_range(&mut self.store, scroll_offset, viewport_extent)
    }

    /// The visible range plus overscan for the current scroll state.
    pub fn virtual_range(&mut self) -> VirtualRange {
        self.window().range()
    }

    /// The current window.
    ///
    /// Recomputed on the first read after a scroll, resize, measurement or configuration
    /// change; repeated reads without intervening changes return the same window.
    pub fn window(&mut self) -> &Window {
        if self.window.is_none() {
            let window = self.compute_window();
            vtrace!(
                start = window.range().start_index,
                end = window.range().end_index,
                "window recomputed"
            );
            self.window = Some(window);
        }
        self.window.get_or_insert_with(Window::default)
    }

    /// The positioned items of the current window, in ascending index order.
    pub fn virtual_items(&mut self) -> &[VirtualItem] {
        &self.window().items
    }

    /// Collects virtual items into `out` (clears `out` first).
    pub fn collect_virtual_items(&mut self, out: &mut Vec<VirtualItem>) {
        out.clear();
        out.extend_from_slice(self.virtual_items());
    }

    /// Calls `render_item` once per item of the current window.
    ///
    /// Indexes past the end of `items` (a data slice shorter than `count`) are skipped.
    pub fn render<T, R>(
        &mut self,
        items: &[T],
        mut render_item: impl FnMut(&T, VirtualItem) -> R,
    ) -> Vec<R> {
        let window = self.window();
        let mut out = Vec::with_capacity(window.len());
        for it in window {
            if let Some(item) = items.get(it.index) {
                out.push(render_item(item, *it));
            }
        }
        out
    }

    fn compute_window(&mut self) -> Window {
        if !self.is_active() {
            return Window::default();
        }
        let ScrollState {
            offset,
            viewport_extent,
        } = self.scroll;
        range::compute_window(
            &mut self.store,
            offset,
            viewport_extent,
            self.options.overscan,
        )
    }

    pub fn index_at_offset(&mut self, offset: f64) -> Option<usize> {
        if !self.is_active() || self.store.is_empty() {
            return None;
        }
        Some(self.store.index_at_offset(offset))
    }

    pub fn item_start(&mut self, index: usize) -> Option<f64> {
        if !self.is_active() || index >= self.store.len() {
            return None;
        }
        Some(self.store.offset_of(index))
    }

    pub fn item_size(&self, index: usize) -> Option<f64> {
        if !self.is_active() || index >= self.store.len() {
            return None;
        }
        Some(self.store.size_of(index))
    }

    pub fn item_end(&mut self, index: usize) -> Option<f64> {
        let start = self.item_start(index)?;
        let size = self.item_size(index)?;
        Some(start + size)
    }

    pub fn max_scroll_offset(&mut self) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        range::max_scroll_offset(&mut self.store, self.scroll.viewport_extent)
    }

    pub fn clamp_scroll_offset(&mut self, offset: f64) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        range::clamp_scroll_offset(&mut self.store, offset, self.scroll.viewport_extent)
    }

    /// Computes the scroll offset that brings `index` into view per `align`.
    ///
    /// Out-of-range indexes are clamped to the last item, and the result is clamped to the
    /// scrollable range. The scroll state is not changed: hosts apply the offset to their
    /// container (see [`Self::scroll_to_index_on`]) and report it back through `on_scroll`.
    pub fn scroll_to_index_offset(&mut self, index: usize, align: Align) -> f64 {
        if !self.is_active() {
            return self.scroll.offset;
        }
        let count = self.store.len();
        if count == 0 {
            return 0.0;
        }
        let index = index.min(count - 1);
        let start = self.store.offset_of(index);
        let end = start + self.store.size_of(index);
        let view = self.scroll.viewport_extent;

        let target = match align {
            Align::Start => start,
            Align::End => end - view,
            Align::Center => start + (end - start) / 2.0 - view / 2.0,
            Align::Auto => {
                let cur = self.scroll.offset;
                if start >= cur && end <= cur + view {
                    cur
                } else if start < cur {
                    start
                } else {
                    end - view
                }
            }
        };

        self.clamp_scroll_offset(target)
    }

    /// Computes the target offset for `index` and hands it to the host.
    ///
    /// Returns the applied (clamped) offset.
    pub fn scroll_to_index_on(
        &mut self,
        host: &mut impl ScrollHost,
        index: usize,
        align: Align,
    ) -> f64 {
        let offset = self.scroll_to_index_offset(index, align);
        vtrace!(index, offset, "scroll_to_index_on");
        host.set_scroll_offset(offset);
        offset
    }
}
