use alloc::vec::Vec;

use virtual_window::{
    ConfigError, MeasurementError, ScrollHost, VirtualItem, Virtualizer, VirtualizerOptions,
    Window,
};

use crate::{InfiniteOptions, LoadController, LoadOutcome, LoadState, LoadTicket};

/// A framework-neutral auto-paginating list: a [`Virtualizer`] and a [`LoadController`] fed
/// from the same scroll observations.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_resize` / `on_scroll` (or `sync_from_host`) when UI events occur
/// - `complete(ticket, outcome, new_count)` when a page requested by the loader arrives
///
/// Every scroll observation re-checks the load threshold against the current total extent, so
/// a crossing that happens while measurements are still settling is picked up by the next one.
#[derive(Clone, Debug)]
pub struct InfiniteList {
    v: Virtualizer,
    loader: LoadController,
}

impl InfiniteList {
    pub fn new(options: VirtualizerOptions, infinite: InfiniteOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            v: Virtualizer::try_new(options)?,
            loader: LoadController::new(infinite)?,
        })
    }

    pub fn from_parts(v: Virtualizer, loader: LoadController) -> Self {
        Self { v, loader }
    }

    pub fn with_loader(mut self, f: impl Fn(LoadTicket) + Send + Sync + 'static) -> Self {
        self.loader = self.loader.with_loader(f);
        self
    }

    pub fn virtualizer(&self) -> &Virtualizer {
        &self.v
    }

    pub fn virtualizer_mut(&mut self) -> &mut Virtualizer {
        &mut self.v
    }

    pub fn load_controller(&self) -> &LoadController {
        &self.loader
    }

    pub fn load_controller_mut(&mut self) -> &mut LoadController {
        &mut self.loader
    }

    pub fn load_state(&self) -> LoadState {
        self.loader.state()
    }

    /// Call this when the UI reports a scroll offset change.
    ///
    /// Returns the ticket of a load fired by this observation.
    pub fn on_scroll(&mut self, offset: f64) -> Option<LoadTicket> {
        self.v.on_scroll(offset);
        self.check_threshold()
    }

    pub fn on_resize(&mut self, viewport_extent: f64) -> Option<LoadTicket> {
        self.v.on_resize(viewport_extent);
        self.check_threshold()
    }

    pub fn sync_from_host(&mut self, host: &impl ScrollHost) -> Option<LoadTicket> {
        self.v.sync_from_host(host);
        self.check_threshold()
    }

    fn check_threshold(&mut self) -> Option<LoadTicket> {
        if !self.v.enabled() || self.v.config_error().is_some() {
            return None;
        }
        let total = self.v.total_size();
        self.loader.observe(self.v.scroll_state(), total)
    }

    /// Applies the result of a load. `new_count` is the item count after the page was
    /// appended; it is ignored when the ticket is stale.
    ///
    /// Returns whether the completion was applied.
    pub fn complete(&mut self, ticket: LoadTicket, outcome: LoadOutcome, new_count: usize) -> bool {
        if !self.loader.complete(ticket, outcome) {
            return false;
        }
        self.v.set_count(new_count);
        true
    }

    /// Replaces the collection wholesale (e.g. on a filter change): drops measurements, sets
    /// the new count, scrolls to the top and returns the loader to `Idle`.
    pub fn reset(&mut self, count: usize) {
        vdebug!(count, "InfiniteList::reset");
        self.v.reset_measurements();
        self.v.set_count(count);
        self.v.on_scroll(0.0);
        self.loader.reset();
    }

    /// Mirrors externally owned flags, see [`LoadController::sync_flags`].
    pub fn sync_flags(&mut self, has_more: bool, is_loading: bool) {
        self.loader.sync_flags(has_more, is_loading);
    }

    pub fn set_count(&mut self, count: usize) {
        self.v.set_count(count);
    }

    pub fn count(&self) -> usize {
        self.v.count()
    }

    pub fn total_size(&mut self) -> f64 {
        self.v.total_size()
    }

    pub fn window(&mut self) -> &Window {
        self.v.window()
    }

    pub fn virtual_items(&mut self) -> &[VirtualItem] {
        self.v.virtual_items()
    }

    /// Where a host paints its "loading more" row: the end of the content while a load is in
    /// flight, `None` otherwise.
    pub fn loader_start(&mut self) -> Option<f64> {
        if self.loader.is_loading() {
            Some(self.v.total_size())
        } else {
            None
        }
    }

    pub fn record_measurement(&mut self, index: usize, size: f64) -> Result<f64, MeasurementError> {
        self.v.record_measurement(index, size)
    }

    pub fn render<T, R>(
        &mut self,
        items: &[T],
        render_item: impl FnMut(&T, VirtualItem) -> R,
    ) -> Vec<R> {
        self.v.render(items, render_item)
    }
}
