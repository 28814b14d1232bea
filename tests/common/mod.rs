//! Shared helpers for integration tests.

#![allow(dead_code, unused_macros, unused_imports)]

pub use pledge::test_utils::init_test_logging;
pub use pledge::{assert_with_log, test_complete, test_phase};

use pledge::{Deferred, Payload, Runtime, Settlement};
use std::sync::Arc;
use std::task::{Wake, Waker};

pub fn init_test(name: &str) {
    init_test_logging();
    test_phase!(name);
}

/// Drains `rt` and returns the settlement of `deferred`.
pub fn settle<T: Payload, E: Payload>(rt: &Runtime, deferred: &Deferred<T, E>) -> Settlement<T, E> {
    rt.run_until_settled(deferred).expect("deferred value should settle")
}

struct NoopWaker;

impl Wake for NoopWaker {
    fn wake(self: Arc<Self>) {}
}

pub fn noop_waker() -> Waker {
    Waker::from(Arc::new(NoopWaker))
}
