//! Settlement states and outcome records.
//!
//! [`DeferredState`] is the three-valued state of a deferred value.
//! [`Settlement`] is the payload-carrying record of a settled value; it is
//! also the per-input record produced by
//! [`all_settled`](crate::combinator::all_settled).

use core::fmt;
use serde::{Deserialize, Serialize};

/// Bound shared by every value and reason carried through a deferred value.
///
/// Payloads are cloned once per attached reaction (fan-out) and may be moved
/// into jobs that another thread drains.
pub trait Payload: Clone + Send + 'static {}

impl<P: Clone + Send + 'static> Payload for P {}

/// The state of a deferred value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeferredState {
    /// Not yet settled; reactions are queued.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a reason.
    Rejected,
}

impl DeferredState {
    /// Returns `true` once the value has left `Pending`.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns the lowercase state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled => "fulfilled",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DeferredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a settled deferred value.
///
/// Serializes as `{"status":"fulfilled","value":..}` or
/// `{"status":"rejected","reason":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Settlement<T, E> {
    /// The value was fulfilled.
    Fulfilled {
        /// The fulfillment value.
        value: T,
    },
    /// The value was rejected.
    Rejected {
        /// The rejection reason.
        reason: E,
    },
}

impl<T, E> Settlement<T, E> {
    /// Creates a fulfilled settlement.
    pub const fn fulfilled(value: T) -> Self {
        Self::Fulfilled { value }
    }

    /// Creates a rejected settlement.
    pub const fn rejected(reason: E) -> Self {
        Self::Rejected { reason }
    }

    /// Returns the state this settlement corresponds to.
    #[must_use]
    pub const fn state(&self) -> DeferredState {
        match self {
            Self::Fulfilled { .. } => DeferredState::Fulfilled,
            Self::Rejected { .. } => DeferredState::Rejected,
        }
    }

    /// Returns `true` if fulfilled.
    #[must_use]
    pub const fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled { .. })
    }

    /// Returns `true` if rejected.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Returns the fulfillment value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Fulfilled { value } => Some(value),
            Self::Rejected { .. } => None,
        }
    }

    /// Returns the rejection reason, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<&E> {
        match self {
            Self::Fulfilled { .. } => None,
            Self::Rejected { reason } => Some(reason),
        }
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Fulfilled { value } => Ok(value),
            Self::Rejected { reason } => Err(reason),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settlement<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Fulfilled { value },
            Err(reason) => Self::Rejected { reason },
        }
    }
}
