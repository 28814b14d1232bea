//! Fluent construction of a [`Runtime`].

use super::Runtime;
use crate::config::{ConfigError, RuntimeConfig};

/// Builder for [`Runtime`].
///
/// ```
/// use pledge::Runtime;
///
/// let rt = Runtime::builder().drain_budget(10_000).build().expect("valid config");
/// assert_eq!(rt.config().drain_budget, Some(10_000));
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
}

impl RuntimeBuilder {
    /// Creates a builder starting from [`RuntimeConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration (e.g. one loaded from the environment).
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Caps the number of jobs a single drain may run.
    pub fn drain_budget(mut self, budget: usize) -> Self {
        self.config.drain_budget = Some(budget);
        self
    }

    /// Lets drains run until the queue is empty.
    pub fn unbounded_drain(mut self) -> Self {
        self.config.drain_budget = None;
        self
    }

    /// Sets the initial capacity of the microtask queue.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Validates the configuration and builds the runtime.
    pub fn build(self) -> Result<Runtime, ConfigError> {
        self.config.validate()?;
        Ok(Runtime::with_valid_config(self.config))
    }
}
