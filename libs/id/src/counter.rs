//! Bounded wraparound counter used to disambiguate IDs minted within the
//! same second.

use std::sync::atomic::{AtomicU32, Ordering};

/// Default wrap limit. Counter values stay in `[0, DEFAULT_WRAP_LIMIT)`.
pub const DEFAULT_WRAP_LIMIT: u32 = 1000;

/// A lock-free counter that wraps back to zero at a fixed limit.
///
/// Values are unique over any run of fewer than `limit` increments; after
/// that they repeat. The counter is owned by whoever constructs it, so
/// independent services (and tests) never share state.
#[derive(Debug)]
pub struct MonotonicCounter {
    value: AtomicU32,
    limit: u32,
}

impl MonotonicCounter {
    /// Creates a counter starting at zero with the default limit of 1000.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_WRAP_LIMIT)
    }

    /// Creates a counter starting at zero that wraps at `limit`.
    ///
    /// A limit of zero is treated as one.
    #[must_use]
    pub fn with_limit(limit: u32) -> Self {
        Self {
            value: AtomicU32::new(0),
            limit: limit.max(1),
        }
    }

    /// Returns the value before the increment, then advances the counter,
    /// resetting it to zero when it reaches the limit.
    ///
    /// The increment and the reset happen in one compare-and-swap, so the
    /// stored value never reaches `limit`, even under contention.
    pub fn increase(&self) -> u32 {
        let limit = self.limit;
        self.value
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                let next = cur.saturating_add(1);
                Some(if next >= limit { 0 } else { next })
            })
            .unwrap_or_else(|cur| cur)
    }

    /// Returns the value the next call to [`increase`](Self::increase) would hand out.
    #[must_use]
    pub fn current(&self) -> u32 {
        self.value.load(Ordering::Acquire)
    }

    /// Returns the wrap limit.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for MonotonicCounter {
    fn default() -> Self {
        Self::new()
    }
}
