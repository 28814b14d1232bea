//! Error types.
//!
//! Two families live here:
//!
//! - rejection reasons: [`TypeError`], [`AggregateError`] and the default
//!   reason type [`Reason`]. These travel through deferred values as
//!   payloads; they are never returned from `then` or a combinator call.
//! - runtime errors: [`RunError`], returned by the drain and observation
//!   operations of [`Runtime`](crate::Runtime).

use crate::types::DeferredId;
use thiserror::Error;

/// Message carried by an [`AggregateError`].
pub const ALL_REJECTED_MESSAGE: &str = "all deferred values were rejected";

/// A type-error-shaped rejection reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum TypeError {
    /// A combinator received an input that cannot be iterated.
    #[error("{type_name} is not iterable")]
    NotIterable {
        /// The dynamic type name of the rejected input (e.g. `"number"`).
        type_name: &'static str,
    },
}

impl TypeError {
    /// Creates a not-iterable error for the given type name.
    #[must_use]
    pub const fn not_iterable(type_name: &'static str) -> Self {
        Self::NotIterable { type_name }
    }
}

/// Rejection produced by [`any`](crate::combinator::any) when every input
/// rejects.
///
/// Holds one reason per input, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("all deferred values were rejected ({} errors)", .errors.len())]
pub struct AggregateError<E> {
    errors: Vec<E>,
}

impl<E> AggregateError<E> {
    /// Creates an aggregate from the collected reasons.
    #[must_use]
    pub fn new(errors: Vec<E>) -> Self {
        Self { errors }
    }

    /// Returns the collected reasons in input order.
    #[must_use]
    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    /// Consumes the aggregate and returns the reasons.
    #[must_use]
    pub fn into_errors(self) -> Vec<E> {
        self.errors
    }

    /// Returns the number of collected reasons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no reasons were collected (empty input).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The default rejection reason.
///
/// Any `Clone + Send + 'static` type can serve as a reason; `Reason` covers
/// the common cases and is what [`any`](crate::combinator::any) and the
/// dynamic combinators produce out of the box.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Reason {
    /// A plain message.
    #[error("{0}")]
    Message(String),
    /// A type error (e.g. non-iterable combinator input).
    #[error(transparent)]
    Type(#[from] TypeError),
    /// Every input of an `any` rejected.
    #[error(transparent)]
    Aggregate(#[from] AggregateError<Reason>),
    /// An arbitrary JSON value used as a reason.
    #[error("{0}")]
    Value(serde_json::Value),
}

impl Reason {
    /// Creates a message reason.
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Returns the aggregate, if this reason is one.
    #[must_use]
    pub const fn as_aggregate(&self) -> Option<&AggregateError<Self>> {
        match self {
            Self::Aggregate(aggregate) => Some(aggregate),
            _ => None,
        }
    }

    /// Returns the type error, if this reason is one.
    #[must_use]
    pub const fn as_type_error(&self) -> Option<&TypeError> {
        match self {
            Self::Type(error) => Some(error),
            _ => None,
        }
    }
}

impl From<&str> for Reason {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for Reason {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<serde_json::Value> for Reason {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

/// Errors returned by runtime drain and observation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// The configured drain budget ran out before the queue emptied.
    #[error("drain budget of {budget} jobs exhausted with {pending} jobs still queued")]
    BudgetExhausted {
        /// The configured budget.
        budget: usize,
        /// Jobs still queued when the drain stopped.
        pending: usize,
    },
    /// The queue is idle but the observed deferred value is still pending.
    #[error("deferred value {id} is still pending after the queue went idle")]
    Stalled {
        /// The pending deferred value.
        id: DeferredId,
    },
}
