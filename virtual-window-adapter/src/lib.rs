//! Adapters for the `virtual-window` engine.
//!
//! The `virtual-window` crate is UI-agnostic and focuses on the measurement/offset math and the
//! windowed range. This crate builds the two layouts most hosts need on top of it:
//!
//! - [`GridVirtualizer`]: groups a flat sequence into fixed-column rows and windows the rows
//! - [`LoadController`] / [`InfiniteList`]: fires a caller-supplied loader once when the
//!   remaining scrollable distance drops below a threshold, with no duplicate requests in flight
//!
//! This crate is intentionally framework-agnostic (no UI toolkit bindings).
//!
//! ```
//! use virtual_window_adapter::{GridOptions, GridVirtualizer};
//!
//! let mut grid = GridVirtualizer::new(GridOptions::new(10, 4).with_row_estimate(100.0));
//! grid.on_resize(1_000.0);
//!
//! let rows = grid.virtual_rows();
//! assert_eq!(rows.len(), 3);
//! assert_eq!(rows[2].items(), 8..10);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod feed;
mod grid;
mod infinite;


pub use feed::InfiniteList;
pub use grid::{
    DEFAULT_COLUMNS, DEFAULT_GRID_OVERSCAN, DEFAULT_ROW_ESTIMATE, GridCell, GridOptions, GridRow,
    GridVirtualizer, row_count,
};
pub use infinite::{
    DEFAULT_LOAD_MORE_THRESHOLD, InfiniteOptions, LoadController, LoadOutcome, LoadState,
    LoadTicket, OnLoadMore,
};
