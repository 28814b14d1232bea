//! Optional tracing integration.
//!
//! With the `tracing-integration` feature enabled the logging macros are
//! re-exported from [`tracing`](https://docs.rs/tracing). Without it they
//! expand to nothing, so call sites compile identically in both builds and
//! pay no cost when logging is off.
//!
//! Call sites import the macros by path:
//!
//! ```ignore
//! use crate::tracing_compat::{debug, trace};
//!
//! debug!(deferred = %id, "fulfilled");
//! ```

#[cfg(feature = "tracing-integration")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, trace, warn};

// The no-op macros carry prefixed names: a local `macro_rules! warn` would
// be ambiguous with the built-in `#[warn]` attribute.
#[cfg(not(feature = "tracing-integration"))]
#[allow(unused_macros, unused_imports)]
mod noop {
    macro_rules! noop_trace {
        ($($arg:tt)*) => {};
    }
    macro_rules! noop_debug {
        ($($arg:tt)*) => {};
    }
    macro_rules! noop_info {
        ($($arg:tt)*) => {};
    }
    macro_rules! noop_warn {
        ($($arg:tt)*) => {};
    }
    macro_rules! noop_error {
        ($($arg:tt)*) => {};
    }

    pub(crate) use noop_debug as debug;
    pub(crate) use noop_error as error;
    pub(crate) use noop_info as info;
    pub(crate) use noop_trace as trace;
    pub(crate) use noop_warn as warn;
}

#[cfg(not(feature = "tracing-integration"))]
#[allow(unused_imports)]
pub(crate) use noop::{debug, error, info, trace, warn};
