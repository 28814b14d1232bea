//! The settle capability handed to executors.

use super::{Deferred, Resolution};
use crate::types::Payload;
use std::fmt;

/// Settles one deferred value.
///
/// Only the first call to [`resolve`](Self::resolve) or
/// [`reject`](Self::reject) across all clones has an effect.
pub struct Resolver<T, E> {
    deferred: Deferred<T, E>,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            deferred: self.deferred.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("deferred", &self.deferred.id())
            .finish()
    }
}

impl<T, E> Resolver<T, E> {
    pub(crate) const fn new(deferred: Deferred<T, E>) -> Self {
        Self { deferred }
    }

    /// Returns the deferred value this resolver settles.
    #[must_use]
    pub const fn deferred(&self) -> &Deferred<T, E> {
        &self.deferred
    }

    /// Returns true once the deferred value has settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.deferred.is_pending()
    }
}

impl<T: Payload, E: Payload> Resolver<T, E> {
    /// Resolves with a plain value or adopts a deferred one.
    pub fn resolve(&self, value: impl Into<Resolution<T, E>>) {
        self.deferred.resolve(value);
    }

    /// Rejects with `reason`.
    pub fn reject(&self, reason: E) {
        self.deferred.reject(reason);
    }
}
