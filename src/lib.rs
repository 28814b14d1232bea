//! Pledge: deferred values with strict FIFO microtask ordering.
//!
//! # Overview
//!
//! A [`Deferred`] is a single-assignment value that is eventually fulfilled
//! with a `T` or rejected with a reason `E`. Reactions attached with
//! [`Deferred::then`] and friends never run inline: they are handed to an
//! injectable [`Scheduler`] and run in the order they were scheduled, after
//! the code that attached them has returned.
//!
//! # Core Guarantees
//!
//! - **Single settlement**: a deferred value transitions out of `Pending` at most once
//! - **FIFO reactions**: reactions attached while pending fire in attachment order
//! - **Never inline**: attaching to a settled value schedules the reaction
//! - **Flattening**: resolving with another deferred value adopts its outcome
//! - **Errors are values**: executors and handlers return `Result`; `Err` becomes a rejection
//!
//! # Module Structure
//!
//! - [`types`]: Identifiers, states and settlement records
//! - [`deferred`]: The deferred state machine, resolvers and the resolution procedure
//! - [`runtime`]: Scheduler trait, microtask queue and the [`Runtime`] facade
//! - [`combinator`]: `all`, `race`, `any`, `all_settled`
//! - [`config`]: Runtime configuration and loading
//! - [`error`](mod@error): Error and rejection reason types
//! - [`tracing_compat`]: Optional tracing integration (requires `tracing-integration` feature)
//!
//! # Example
//!
//! ```
//! use pledge::{Deferred, Reason, Runtime};
//!
//! let rt = Runtime::new();
//! let doubled: Deferred<i32, Reason> = rt
//!     .deferred(|resolver| {
//!         resolver.resolve(21);
//!         Ok(())
//!     })
//!     .then_fulfilled(|value| Ok(value * 2));
//!
//! assert!(doubled.is_pending());
//! rt.run_until_idle().expect("drain");
//! assert_eq!(doubled.peek().and_then(|s| s.into_result().ok()), Some(42));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_inception)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod combinator;
pub mod config;
pub mod deferred;
pub mod error;
pub mod runtime;
pub mod tracing_compat;
pub mod types;

// ── Test-only modules ───────────────────────────────────────────────────
#[cfg(any(test, feature = "test-internals"))]
pub mod test_utils;

// Re-exports for convenient access to core types
pub use config::{ConfigError, RuntimeConfig};
pub use deferred::{Deferred, Resolution, Resolver, Settled};
pub use error::{AggregateError, Reason, RunError, TypeError};
pub use runtime::{
    Job, MicrotaskQueue, QueueStats, Runtime, RuntimeBuilder, Scheduler, SchedulerHandle,
};
pub use types::{DeferredId, DeferredState, Payload, Settlement};
