//! Identifier types for deferred values.
//!
//! Every [`Deferred`](crate::Deferred) receives a process-unique id when it is
//! created. Ids appear in log records and `Debug` output so a chain of derived
//! values can be followed through the microtask queue.

use core::fmt;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DEFERRED_ID: AtomicU64 = AtomicU64::new(1);

/// A unique identifier for a deferred value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeferredId(u64);

impl DeferredId {
    /// Allocates the next id.
    #[inline]
    #[must_use]
    pub(crate) fn next() -> Self {
        Self(NEXT_DEFERRED_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Creates a deferred id for testing purposes.
    #[doc(hidden)]
    #[must_use]
    pub const fn new_for_test(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for DeferredId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeferredId({})", self.0)
    }
}

impl fmt::Display for DeferredId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}
