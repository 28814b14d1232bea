//! Runtime configuration.
//!
//! [`RuntimeConfig`] controls the microtask queue owned by a
//! [`Runtime`](crate::Runtime). Values come from code (usually through
//! [`RuntimeBuilder`](crate::RuntimeBuilder)), from environment variables, or
//! with the `config-file` feature from a TOML document:
//!
//! ```toml
//! drain_budget = 10000
//! queue_capacity = 64
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the drain budget (`none` for unbounded).
pub const ENV_DRAIN_BUDGET: &str = "PLEDGE_DRAIN_BUDGET";
/// Environment variable holding the initial queue capacity.
pub const ENV_QUEUE_CAPACITY: &str = "PLEDGE_QUEUE_CAPACITY";

/// Default initial capacity of the microtask queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A drain budget of zero would refuse to run any job.
    #[error("drain budget must be at least 1 (use no budget for unbounded drains)")]
    ZeroDrainBudget,
    /// An environment variable held a value that does not parse.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// The variable name.
        key: &'static str,
        /// The raw value.
        value: String,
    },
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML for [`RuntimeConfig`].
    #[cfg(feature = "config-file")]
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a [`Runtime`](crate::Runtime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Maximum jobs a single drain may run; `None` drains until idle.
    pub drain_budget: Option<usize>,
    /// Initial capacity of the microtask queue.
    pub queue_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            drain_budget: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl RuntimeConfig {
    /// Checks the configuration for values the runtime cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.drain_budget == Some(0) {
            return Err(ConfigError::ZeroDrainBudget);
        }
        Ok(())
    }

    /// Loads configuration from the process environment on top of the
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` to resolve variable names.
    ///
    /// Unset variables keep their defaults. The result is validated.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_DRAIN_BUDGET) {
            let trimmed = raw.trim();
            config.drain_budget = if trimmed.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_usize(ENV_DRAIN_BUDGET, trimmed)?)
            };
        }
        if let Some(raw) = lookup(ENV_QUEUE_CAPACITY) {
            config.queue_capacity = parse_usize(ENV_QUEUE_CAPACITY, raw.trim())?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML document. The result is validated.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file. The result is validated.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_toml_str(&document)
    }
}

fn parse_usize(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
