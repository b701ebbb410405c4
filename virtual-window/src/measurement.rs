//! Per-index sizes and a lazily extended prefix-sum cache over them.

use alloc::vec::Vec;

use crate::{Estimate, MeasurementError};

/// Holds, per index, either an estimated or a measured size, and answers cumulative-offset
/// queries.
///
/// Offsets are kept in a prefix-sum cache that is only valid up to a watermark. Changing the
/// size of item `i` lowers the watermark to `i`; queries extend it again from there, so a
/// measurement costs work proportional to the number of offsets actually re-read rather than
/// to the length of the list.
///
/// Methods that consult offsets take `&mut self` so the cache can be extended in place.
#[derive(Clone, Debug)]
pub struct MeasurementStore {
    estimate: Estimate,
    sizes: Vec<f64>, // measured size if known, else the estimate
    measured: Vec<bool>,
    // starts[i] == offset of item i; starts[len] == total extent.
    starts: Vec<f64>,
    // Number of leading entries of `starts` that are up to date (always >= 1).
    valid: usize,
}

impl Default for MeasurementStore {
    fn default() -> Self {
        Self::new(Estimate::default())
    }
}

impl MeasurementStore {
    pub fn new(estimate: Estimate) -> Self {
        Self {
            estimate,
            sizes: Vec::new(),
            measured: Vec::new(),
            starts: alloc::vec![0.0],
            valid: 1,
        }
    }

    pub fn with_len(estimate: Estimate, len: usize) -> Self {
        let mut store = Self::new(estimate);
        store.set_len(len);
        store
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn estimate(&self) -> &Estimate {
        &self.estimate
    }

    /// Replaces the fallback sizing. Measured sizes are kept; every unmeasured index is
    /// re-estimated.
    pub fn set_estimate(&mut self, estimate: Estimate) {
        self.estimate = estimate;
        let mut lowest = None;
        for i in 0..self.sizes.len() {
            if self.measured[i] {
                continue;
            }
            let next = self.estimate.size_for(i);
            if next.to_bits() != self.sizes[i].to_bits() {
                self.sizes[i] = next;
                lowest.get_or_insert(i);
            }
        }
        if let Some(i) = lowest {
            self.invalidate_from(i);
        }
    }

    /// Grows or shrinks the store to `len` items.
    ///
    /// Shrinking drops measurements for indexes that no longer exist. Growing keeps every
    /// existing measurement and estimates the new indexes.
    pub fn set_len(&mut self, len: usize) {
        let cur = self.sizes.len();
        if len < cur {
            self.sizes.truncate(len);
            self.measured.truncate(len);
            self.starts.truncate(len + 1);
            self.valid = self.valid.min(len + 1);
        } else if len > cur {
            self.sizes.reserve_exact(len - cur);
            self.measured.reserve_exact(len - cur);
            for i in cur..len {
                let size = self.estimate.size_for(i);
                self.sizes.push(size);
                self.measured.push(false);
            }
            self.starts.resize(len + 1, 0.0);
        }
    }

    /// Stores an authoritative size for `index`.
    ///
    /// Returns the change in total extent. Non-finite or negative sizes are rejected and the
    /// previous size is kept. Indexes outside the store are ignored.
    pub fn record(&mut self, index: usize, size: f64) -> Result<f64, MeasurementError> {
        let size = MeasurementError::check(index, size).inspect_err(|_err| {
            vwarn!(index, err = %_err, "discarding measurement");
        })?;
        let Some(cur) = self.sizes.get(index).copied() else {
            vtrace!(index, len = self.sizes.len(), "measurement outside of list ignored");
            return Ok(0.0);
        };
        self.measured[index] = true;
        if cur.to_bits() == size.to_bits() {
            return Ok(0.0);
        }
        self.sizes[index] = size;
        self.invalidate_from(index);
        Ok(size - cur)
    }

    /// Forgets every measurement and falls back to estimates.
    pub fn reset_measurements(&mut self) {
        let mut lowest = None;
        for i in 0..self.sizes.len() {
            if !self.measured[i] {
                continue;
            }
            self.measured[i] = false;
            let next = self.estimate.size_for(i);
            if next.to_bits() != self.sizes[i].to_bits() {
                self.sizes[i] = next;
                lowest.get_or_insert(i);
            }
        }
        if let Some(i) = lowest {
            self.invalidate_from(i);
        }
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Number of indexes with a measured size.
    pub fn measured_count(&self) -> usize {
        self.measured.iter().filter(|m| **m).count()
    }

    /// The measured size of `index` if present, else its estimate. `0.0` past the end.
    pub fn size_of(&self, index: usize) -> f64 {
        self.sizes.get(index).copied().unwrap_or(0.0)
    }

    /// Cumulative size of all items before `index`. `index` is clamped to `len`, so
    /// `offset_of(len)` is the total extent.
    pub fn offset_of(&mut self, index: usize) -> f64 {
        let index = index.min(self.sizes.len());
        self.ensure_through(index);
        self.starts[index]
    }

    pub fn total_extent(&mut self) -> f64 {
        self.offset_of(self.sizes.len())
    }

    /// The smallest index whose item ends after `offset`, clamped to the last item.
    ///
    /// An item that ends exactly at `offset` is *not* returned: items occupy `[start, end)`.
    /// Returns `0` for an empty store.
    pub fn index_at_offset(&mut self, offset: f64) -> usize {
        let len = self.sizes.len();
        if len == 0 {
            return 0;
        }
        self.ensure_through(len);
        // starts[1..=len] are the item ends, non-decreasing.
        let ends = &self.starts[1..=len];
        let first = ends.partition_point(|&end| end <= offset);
        first.min(len - 1)
    }

    fn invalidate_from(&mut self, index: usize) {
        // The start of `index` itself does not depend on its own size.
        self.valid = self.valid.min(index + 1);
    }

    fn ensure_through(&mut self, index: usize) {
        if index < self.valid {
            return;
        }
        let from = self.valid;
        let mut pos = self.starts[from - 1];
        for i in from..=index {
            pos += self.sizes[i - 1];
            self.starts[i] = pos;
        }
        vtrace!(from, through = index, "extended prefix sums");
        self.valid = index + 1;
    }
}
