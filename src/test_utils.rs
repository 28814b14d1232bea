//! Test helpers: logging initialization and phase/assertion macros.
//!
//! Available under `cfg(test)` and with the `test-internals` feature so
//! integration tests share the same logging setup as unit tests.
//!
//! ```ignore
//! use pledge::test_utils::init_test_logging;
//!
//! init_test_logging();
//! pledge::test_phase!("my_test");
//! pledge::assert_with_log!(1 + 1 == 2, "arithmetic", 2, 1 + 1);
//! pledge::test_complete!("my_test");
//! ```

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_TEST_FILTER: &str = "pledge=trace";

/// Installs a test-friendly `tracing` subscriber exactly once per process.
///
/// Honors `RUST_LOG`; falls back to [`DEFAULT_TEST_FILTER`]. Output goes
/// through the libtest capture writer.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

#[doc(hidden)]
pub fn log_phase(name: &str) {
    tracing::info!(test = name, "test phase start");
}

#[doc(hidden)]
pub fn log_complete(name: &str) {
    tracing::info!(test = name, "test complete");
}

#[doc(hidden)]
pub fn log_assert_failure(context: &str, expected: &str, actual: &str) {
    tracing::error!(context, expected, actual, "assertion failed");
}

/// Logs the start of a test phase.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        $crate::test_utils::log_phase($name)
    };
}

/// Logs the successful completion of a test.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        $crate::test_utils::log_complete($name)
    };
}

/// Asserts a condition, logging expected and actual values on failure.
#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $msg:expr, $expected:expr, $actual:expr) => {{
        let holds: bool = $cond;
        let expected = format!("{:?}", $expected);
        let actual = format!("{:?}", $actual);
        if !holds {
            $crate::test_utils::log_assert_failure($msg, &expected, &actual);
            panic!("{}: expected {}, got {}", $msg, expected, actual);
        }
    }};
}
