use alloc::vec::Vec;
use core::ops::Range;

use virtual_window::{
    Align, ConfigError, ScrollHost, VirtualItem, Virtualizer, VirtualizerOptions,
};

/// Default column count for grids.
pub const DEFAULT_COLUMNS: usize = 3;
/// Default row estimate for grids.
pub const DEFAULT_ROW_ESTIMATE: f64 = 200.0;
/// Default overscan (in rows) for grids.
pub const DEFAULT_GRID_OVERSCAN: usize = 5;

/// Number of rows needed for `count` items laid out in `columns` columns.
pub fn row_count(count: usize, columns: usize) -> usize {
    if columns == 0 {
        return 0;
    }
    count.div_ceil(columns)
}

/// Configuration for a [`GridVirtualizer`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOptions {
    pub count: usize,
    pub columns: usize,
    /// Size of a row along the scroll axis, independent of its cells.
    pub row_estimate: f64,
    /// Extra rows rendered beyond each edge of the viewport.
    pub overscan: usize,
}

impl GridOptions {
    pub fn new(count: usize, columns: usize) -> Self {
        Self {
            count,
            columns,
            row_estimate: DEFAULT_ROW_ESTIMATE,
            overscan: DEFAULT_GRID_OVERSCAN,
        }
    }

    pub fn with_row_estimate(mut self, row_estimate: f64) -> Self {
        self.row_estimate = row_estimate;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn row_count(&self) -> usize {
        row_count(self.count, self.columns)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        self.row_options().validate()
    }

    fn row_options(&self) -> VirtualizerOptions {
        VirtualizerOptions::new(self.row_count(), self.row_estimate).with_overscan(self.overscan)
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::new(0, DEFAULT_COLUMNS)
    }
}

/// One materialized grid row and the item indexes it holds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridRow {
    /// The row as positioned by the row virtualizer (`row.index` is the row number).
    pub row: VirtualItem,
    pub first_item: usize,
    pub end_item: usize, // exclusive
}

impl GridRow {
    /// Item indexes in this row. A trailing partial row holds fewer than `columns` items.
    pub fn items(&self) -> Range<usize> {
        self.first_item..self.end_item
    }

    pub fn len(&self) -> usize {
        self.end_item - self.first_item
    }

    pub fn is_empty(&self) -> bool {
        self.first_item >= self.end_item
    }
}

/// A single cell of a materialized grid row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    pub index: usize,
    pub row: usize,
    pub column: usize,
    /// Start of the enclosing row along the scroll axis.
    pub start: f64,
    /// Size of the enclosing row along the scroll axis.
    pub size: f64,
}

/// 2-D windowing over a flat sequence, by virtualizing rows of `columns` items.
///
/// All offset and range logic is delegated to a [`Virtualizer`] over rows; this type only
/// maps rows back to item indexes.
#[derive(Clone, Debug)]
pub struct GridVirtualizer {
    rows: Virtualizer,
    options: GridOptions,
    config_error: Option<ConfigError>,
}

impl GridVirtualizer {
    /// Creates a grid virtualizer.
    ///
    /// Invalid options (such as `columns == 0`) leave it misconfigured: it renders nothing
    /// until [`Self::set_options`] succeeds.
    pub fn new(options: GridOptions) -> Self {
        let config_error = options.validate().err();
        vdebug!(
            count = options.count,
            columns = options.columns,
            rows = options.row_count(),
            valid = config_error.is_none(),
            "GridVirtualizer::new"
        );
        Self {
            rows: Virtualizer::new(options.row_options()),
            options,
            config_error,
        }
    }

    pub fn try_new(options: GridOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self::new(options))
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: GridOptions) -> Result<(), ConfigError> {
        if let Err(err) = options.validate() {
            vwarn!(%err, columns = options.columns, "GridVirtualizer: rejected options");
            self.config_error = Some(err);
            return Err(err);
        }
        let row_options = options.row_options();
        self.rows.update_options(|o| {
            o.count = row_options.count;
            o.estimate = row_options.estimate;
            o.overscan = row_options.overscan;
        })?;
        self.options = options;
        self.config_error = None;
        Ok(())
    }

    pub fn configure(
        &mut self,
        count: usize,
        columns: usize,
        row_estimate: f64,
        overscan: usize,
    ) -> Result<(), ConfigError> {
        self.set_options(
            GridOptions::new(count, columns)
                .with_row_estimate(row_estimate)
                .with_overscan(overscan),
        )
    }

    /// Updates the item count (e.g. after a page of items was appended).
    pub fn set_count(&mut self, count: usize) {
        self.options.count = count;
        if self.config_error.is_none() {
            self.rows.set_count(self.options.row_count());
        }
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn columns(&self) -> usize {
        self.options.columns
    }

    pub fn row_count(&self) -> usize {
        self.options.row_count()
    }

    pub fn config_error(&self) -> Option<ConfigError> {
        self.config_error
    }

    /// The row virtualizer this grid delegates to.
    pub fn rows(&self) -> &Virtualizer {
        &self.rows
    }

    pub fn on_scroll(&mut self, offset: f64) {
        self.rows.on_scroll(offset);
    }

    pub fn on_resize(&mut self, viewport_extent: f64) {
        self.rows.on_resize(viewport_extent);
    }

    pub fn sync_from_host(&mut self, host: &impl ScrollHost) {
        self.rows.sync_from_host(host);
    }

    pub fn total_size(&mut self) -> f64 {
        if self.config_error.is_some() {
            return 0.0;
        }
        self.rows.total_size()
    }

    /// The row holding item `index`, or `None` past the end.
    pub fn row_of(&self, index: usize) -> Option<usize> {
        if self.config_error.is_some() || index >= self.options.count {
            return None;
        }
        Some(index / self.options.columns)
    }

    /// Item indexes held by `row` (empty past the last row).
    pub fn row_items(&self, row: usize) -> Range<usize> {
        if self.config_error.is_some() {
            return 0..0;
        }
        let count = self.options.count;
        let first = row.saturating_mul(self.options.columns).min(count);
        let end = first.saturating_add(self.options.columns).min(count);
        first..end
    }

    /// The rows of the current window, each expanded to its item indexes.
    pub fn virtual_rows(&mut self) -> Vec<GridRow> {
        let mut out = Vec::new();
        self.collect_virtual_rows(&mut out);
        out
    }

    /// Collects the rows of the current window into `out` (clears `out` first).
    pub fn collect_virtual_rows(&mut self, out: &mut Vec<GridRow>) {
        out.clear();
        if self.config_error.is_some() {
            return;
        }
        let columns = self.options.columns;
        let count = self.options.count;
        for row in self.rows.virtual_items() {
            let first_item = (row.index * columns).min(count);
            let end_item = (first_item + columns).min(count);
            out.push(GridRow {
                row: *row,
                first_item,
                end_item,
            });
        }
    }

    /// Calls `render_cell` once per item in the current window, row by row.
    ///
    /// Indexes past the end of `items` are skipped.
    pub fn render<T, R>(
        &mut self,
        items: &[T],
        mut render_cell: impl FnMut(&T, GridCell) -> R,
    ) -> Vec<R> {
        let rows = self.virtual_rows();
        let mut out = Vec::with_capacity(rows.len() * self.options.columns);
        for row in &rows {
            for (column, index) in row.items().enumerate() {
                let Some(item) = items.get(index) else {
                    continue;
                };
                let cell = GridCell {
                    index,
                    row: row.row.index,
                    column,
                    start: row.row.start,
                    size: row.row.size,
                };
                out.push(render_cell(item, cell));
            }
        }
        out
    }

    /// Records the rendered height of a whole row.
    pub fn record_row_measurement(
        &mut self,
        row: usize,
        size: f64,
    ) -> Result<f64, virtual_window::MeasurementError> {
        self.rows.record_measurement(row, size)
    }

    /// Scroll offset that brings the row holding item `index` into view.
    ///
    /// Out-of-range indexes clamp to the last item.
    pub fn scroll_to_item_offset(&mut self, index: usize, align: Align) -> f64 {
        if self.config_error.is_some() {
            return self.rows.scroll_offset();
        }
        let index = index.min(self.options.count.saturating_sub(1));
        self.rows
            .scroll_to_index_offset(index / self.options.columns, align)
    }

    pub fn scroll_to_item_on(
        &mut self,
        host: &mut impl ScrollHost,
        index: usize,
        align: Align,
    ) -> f64 {
        let offset = self.scroll_to_item_offset(index, align);
        host.set_scroll_offset(offset);
        offset
    }
}
