//! What a deferred value can be resolved with.

use super::Deferred;
use crate::runtime::SchedulerHandle;
use crate::types::Payload;
use std::fmt;

/// The argument of a resolve operation.
///
/// A plain value fulfils directly. A deferred value is adopted: the resolved
/// value settles when, and how, the inner one does. The distinction is
/// nominal, so a `T` that happens to be callable is never mistaken for
/// something to subscribe to.
pub enum Resolution<T, E> {
    /// Fulfil with this value.
    Value(T),
    /// Adopt the outcome of this deferred value.
    Deferred(Deferred<T, E>),
}

impl<T, E> From<T> for Resolution<T, E> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T, E> From<Deferred<T, E>> for Resolution<T, E> {
    fn from(deferred: Deferred<T, E>) -> Self {
        Self::Deferred(deferred)
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Resolution<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Deferred(deferred) => f.debug_tuple("Deferred").field(deferred).finish(),
        }
    }
}

impl<T: Payload, E: Payload> Resolution<T, E> {
    /// Converts into a deferred value on `scheduler`.
    ///
    /// A deferred value is returned as-is (same handle, not a copy); a plain
    /// value becomes a fulfilled one.
    #[must_use]
    pub fn into_deferred(self, scheduler: &SchedulerHandle) -> Deferred<T, E> {
        match self {
            Self::Deferred(deferred) => deferred,
            Self::Value(value) => {
                let deferred = Deferred::pending(scheduler.clone());
                deferred.fulfill(value);
                deferred
            }
        }
    }
}
