use alloc::sync::Arc;
use core::fmt;

use virtual_window::{ConfigError, ScrollState};

/// Default remaining-distance threshold below which more data is requested.
pub const DEFAULT_LOAD_MORE_THRESHOLD: f64 = 500.0;

/// Loader callback. Receives the ticket that must be passed back to `complete`.
pub type OnLoadMore = Arc<dyn Fn(LoadTicket) + Send + Sync>;

/// Where the controller is in the load cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadState {
    #[default]
    Idle,
    /// A load is in flight; threshold crossings are ignored.
    Loading,
    /// The source reported no more data. Only `reset` (or `sync_flags`) leaves this state.
    Exhausted,
}

/// Identifies one load request.
///
/// Completions carrying an older generation (for example, a page that arrives after the list
/// was reset for a new filter) are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub generation: u64,
}

/// What the loader reports when a request finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadOutcome {
    /// Data was appended and more may exist.
    More,
    /// The source has no more data.
    Exhausted,
    /// The request failed; the next threshold crossing retries.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfiniteOptions {
    /// Remaining scrollable distance below which a load fires.
    pub threshold: f64,
    /// Whether the source may hold more data. `false` starts the controller `Exhausted`.
    pub has_more: bool,
    /// Whether a load is already in flight. `true` starts the controller `Loading`.
    pub is_loading: bool,
}

impl InfiniteOptions {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }

    pub fn with_is_loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }
        Ok(())
    }
}

impl Default for InfiniteOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOAD_MORE_THRESHOLD,
            has_more: false,
            is_loading: false,
        }
    }
}

fn state_from_flags(has_more: bool, is_loading: bool) -> LoadState {
    if !has_more {
        LoadState::Exhausted
    } else if is_loading {
        LoadState::Loading
    } else {
        LoadState::Idle
    }
}

/// Fires a loader once per threshold crossing and suppresses duplicates while it runs.
///
/// The controller holds no UI objects and never looks at a scroll container. Callers feed it
/// a [`ScrollState`] plus the current total extent on every scroll observation.
#[derive(Clone)]
pub struct LoadController {
    threshold: f64,
    state: LoadState,
    generation: u64,
    on_load_more: Option<OnLoadMore>,
}

impl LoadController {
    pub fn new(options: InfiniteOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let state = state_from_flags(options.has_more, options.is_loading);
        vdebug!(threshold = options.threshold, ?state, "LoadController::new");
        Ok(Self {
            threshold: options.threshold,
            state,
            generation: 0,
            on_load_more: None,
        })
    }

    pub fn with_loader(mut self, f: impl Fn(LoadTicket) + Send + Sync + 'static) -> Self {
        self.on_load_more = Some(Arc::new(f));
        self
    }

    pub fn set_loader(&mut self, loader: Option<OnLoadMore>) {
        self.on_load_more = loader;
    }

    pub fn has_loader(&self) -> bool {
        self.on_load_more.is_some()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
        InfiniteOptions::new(threshold).validate()?;
        self.threshold = threshold;
        Ok(())
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == LoadState::Exhausted
    }

    /// The ticket of the load in flight, if any was issued by this controller.
    pub fn pending(&self) -> Option<LoadTicket> {
        (self.state == LoadState::Loading).then_some(LoadTicket {
            generation: self.generation,
        })
    }

    /// Observes a scroll position against the current content extent.
    ///
    /// When `Idle`, a loader is set and the remaining distance is below the threshold, moves
    /// to `Loading`, invokes the loader exactly once and returns its ticket. Every other call is
    /// a no-op. A zero viewport (host not laid out yet) never fires.
    pub fn observe(&mut self, scroll: ScrollState, total_extent: f64) -> Option<LoadTicket> {
        if self.state != LoadState::Idle || scroll.viewport_extent <= 0.0 {
            return None;
        }
        let loader = self.on_load_more.clone()?;
        let distance = scroll.distance_from_end(total_extent);
        if distance.is_nan() || distance >= self.threshold {
            return None;
        }

        self.generation = self.generation.wrapping_add(1);
        self.state = LoadState::Loading;
        let ticket = LoadTicket {
            generation: self.generation,
        };
        vdebug!(distance, generation = ticket.generation, "load more");
        loader(ticket);
        Some(ticket)
    }

    /// Reports the result of the load identified by `ticket`.
    ///
    /// Returns `false` (and changes nothing) if the ticket is stale or no load is in flight.
    pub fn complete(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> bool {
        if self.state != LoadState::Loading || ticket.generation != self.generation {
            vwarn!(
                generation = ticket.generation,
                current = self.generation,
                state = ?self.state,
                "LoadController: ignoring stale completion"
            );
            return false;
        }
        self.state = match outcome {
            LoadOutcome::More | LoadOutcome::Failed => LoadState::Idle,
            LoadOutcome::Exhausted => LoadState::Exhausted,
        };
        vdebug!(?outcome, state = ?self.state, "load complete");
        true
    }

    /// Returns to `Idle` and invalidates any ticket in flight.
    pub fn reset(&mut self) {
        vdebug!(from = ?self.state, "LoadController::reset");
        self.generation = self.generation.wrapping_add(1);
        self.state = LoadState::Idle;
    }

    /// Mirrors externally owned `has_more`/`is_loading` flags.
    ///
    /// Entering or leaving `Loading` this way starts a new generation, so tickets issued
    /// before the change are stale.
    pub fn sync_flags(&mut self, has_more: bool, is_loading: bool) {
        let next = state_from_flags(has_more, is_loading);
        if next == self.state {
            return;
        }
        if self.state == LoadState::Loading || next == LoadState::Loading {
            self.generation = self.generation.wrapping_add(1);
        }
        vtrace!(from = ?self.state, to = ?next, "LoadController::sync_flags");
        self.state = next;
    }
}

impl fmt::Debug for LoadController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadController")
            .field("threshold", &self.threshold)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("has_loader", &self.on_load_more.is_some())
            .finish()
    }
}
