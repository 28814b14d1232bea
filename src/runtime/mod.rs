//! Scheduling and the runtime facade.
//!
//! - [`scheduler`]: the [`Scheduler`] trait and the default [`MicrotaskQueue`]
//! - [`Runtime`]: owns a microtask queue and creates deferred values on it
//! - [`RuntimeBuilder`]: validated construction from a [`RuntimeConfig`]
//!
//! A `Runtime` never runs jobs on its own. The host decides when to drain,
//! either one job at a time with [`Runtime::tick`] or all at once with
//! [`Runtime::run_until_idle`].

pub mod builder;
pub(crate) mod callback_queue;
pub mod scheduler;

pub use builder::RuntimeBuilder;
pub use scheduler::{Job, MicrotaskQueue, QueueStats, Scheduler, SchedulerHandle};

use crate::combinator;
use crate::config::{ConfigError, RuntimeConfig};
use crate::deferred::{Deferred, Resolution, Resolver};
use crate::error::{AggregateError, RunError};
use crate::tracing_compat::debug;
use crate::types::{Payload, Settlement};
use std::sync::Arc;

/// Owns a [`MicrotaskQueue`] and creates deferred values scheduled on it.
///
/// Cloning a `Runtime` shares the queue.
#[derive(Debug, Clone)]
pub struct Runtime {
    queue: Arc<MicrotaskQueue>,
    config: RuntimeConfig,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates a runtime with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_valid_config(RuntimeConfig::default())
    }

    /// Returns a builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from `config` after validating it.
    pub fn with_config(config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    pub(crate) fn with_valid_config(config: RuntimeConfig) -> Self {
        debug!(
            drain_budget = ?config.drain_budget,
            queue_capacity = config.queue_capacity,
            "runtime created"
        );
        Self {
            queue: Arc::new(MicrotaskQueue::with_limits(
                config.drain_budget,
                config.queue_capacity,
            )),
            config,
        }
    }

    /// Returns the configuration the runtime was built with.
    #[must_use]
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Returns a scheduler handle onto this runtime's queue.
    #[must_use]
    pub fn handle(&self) -> SchedulerHandle {
        self.queue.clone()
    }

    /// Returns the underlying queue.
    #[must_use]
    pub const fn queue(&self) -> &Arc<MicrotaskQueue> {
        &self.queue
    }

    /// Creates a deferred value, running `executor` synchronously.
    ///
    /// See [`Deferred::new`].
    pub fn deferred<T, E, F>(&self, executor: F) -> Deferred<T, E>
    where
        T: Payload,
        E: Payload,
        F: FnOnce(Resolver<T, E>) -> Result<(), E>,
    {
        Deferred::new(self.handle(), executor)
    }

    /// Creates a pending deferred value and its resolver.
    #[must_use]
    pub fn with_resolvers<T: Payload, E: Payload>(&self) -> (Deferred<T, E>, Resolver<T, E>) {
        Deferred::with_resolvers(self.handle())
    }

    /// Returns `value` itself if it is already a deferred value, otherwise a
    /// value fulfilled with it.
    pub fn resolve<T: Payload, E: Payload>(
        &self,
        value: impl Into<Resolution<T, E>>,
    ) -> Deferred<T, E> {
        value.into().into_deferred(&self.handle())
    }

    /// Returns a value rejected with `reason`.
    pub fn reject<T: Payload, E: Payload>(&self, reason: E) -> Deferred<T, E> {
        Deferred::rejected(self.handle(), reason)
    }

    /// See [`combinator::all`].
    pub fn all<T, E, I>(&self, inputs: I) -> Deferred<Vec<T>, E>
    where
        T: Payload,
        E: Payload,
        I: IntoIterator,
        I::Item: Into<Resolution<T, E>>,
    {
        combinator::all(&self.handle(), inputs)
    }

    /// See [`combinator::race`].
    pub fn race<T, E, I>(&self, inputs: I) -> Deferred<T, E>
    where
        T: Payload,
        E: Payload,
        I: IntoIterator,
        I::Item: Into<Resolution<T, E>>,
    {
        combinator::race(&self.handle(), inputs)
    }

    /// See [`combinator::any`].
    pub fn any<T, E, I>(&self, inputs: I) -> Deferred<T, E>
    where
        T: Payload,
        E: Payload + From<AggregateError<E>>,
        I: IntoIterator,
        I::Item: Into<Resolution<T, E>>,
    {
        combinator::any(&self.handle(), inputs)
    }

    /// See [`combinator::all_settled`].
    pub fn all_settled<T, E, I>(&self, inputs: I) -> Deferred<Vec<Settlement<T, E>>, E>
    where
        T: Payload,
        E: Payload,
        I: IntoIterator,
        I::Item: Into<Resolution<T, E>>,
    {
        combinator::all_settled(&self.handle(), inputs)
    }

    /// Runs one queued job. Returns `false` if the queue was empty.
    pub fn tick(&self) -> bool {
        self.queue.tick()
    }

    /// Drains the queue, subject to the configured drain budget.
    pub fn run_until_idle(&self) -> Result<usize, RunError> {
        self.queue.run_until_idle()
    }

    /// Returns the number of queued jobs.
    #[must_use]
    pub fn pending_jobs(&self) -> usize {
        self.queue.len()
    }

    /// Returns the queue counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// Drains the queue and returns the settlement of `deferred`.
    ///
    /// Fails with [`RunError::Stalled`] if the queue went idle while the value
    /// is still pending.
    pub fn run_until_settled<T: Payload, E: Payload>(
        &self,
        deferred: &Deferred<T, E>,
    ) -> Result<Settlement<T, E>, RunError> {
        self.run_until_idle()?;
        deferred
            .peek()
            .ok_or(RunError::Stalled { id: deferred.id() })
    }
}
