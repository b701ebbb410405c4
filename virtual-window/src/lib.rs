//! A headless windowing engine for large ordered collections.
//!
//! For grid layouts and auto-paginating feeds, see the `virtual-window-adapter` crate.
//!
//! This crate renders nothing itself. It keeps rendering cost proportional to the viewport
//! instead of the collection: per-item sizes (estimated until measured), a lazily extended
//! prefix-sum cache over them, offset → index search, and an overscanned window of positioned
//! items.
//!
//! It is UI-agnostic. A TUI/GUI/DOM layer is expected to provide:
//! - viewport extent and scroll offset (`on_resize`/`on_scroll`, or a [`ScrollHost`])
//! - item size estimates and, once items are rendered, their measured sizes
//!
//! ```
//! use virtual_window::{Virtualizer, VirtualizerOptions};
//!
//! let mut v = Virtualizer::new(VirtualizerOptions::new(1_000, 50.0).with_overscan(5));
//! v.on_resize(500.0);
//! v.on_scroll(0.0);
//!
//! let items = v.virtual_items();
//! assert_eq!(items.first().map(|it| it.index), Some(0));
//! assert_eq!(items.last().map(|it| it.index), Some(14));
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod host;
mod measurement;
mod options;
pub mod range;
mod state;
mod types;
mod virtualizer;

#[cfg(test)]
mod tests;

pub use error::{ConfigError, MeasurementError};
pub use host::ScrollHost;
pub use measurement::MeasurementStore;
pub use options::{
    DEFAULT_ESTIMATE, DEFAULT_OVERSCAN, Estimate, EstimateFn, TABLE_OVERSCAN,
    TABLE_ROW_ESTIMATE, VirtualizerOptions,
};
pub use state::ScrollState;
pub use types::{Align, VirtualItem, VirtualRange, Window};
pub use virtualizer::Virtualizer;
