//! First settlement wins.

use super::collect_inputs;
use crate::deferred::{Deferred, Resolution};
use crate::runtime::SchedulerHandle;
use crate::types::Payload;
use std::sync::Arc;

/// Settles like the first input to settle, fulfilled or rejected.
///
/// An empty input never settles.
pub fn race<T, E, I>(scheduler: &SchedulerHandle, inputs: I) -> Deferred<T, E>
where
    T: Payload,
    E: Payload,
    I: IntoIterator,
    I::Item: Into<Resolution<T, E>>,
{
    let inputs = collect_inputs(scheduler, inputs);
    let result = Deferred::pending(Arc::clone(scheduler));
    for input in &inputs {
        let on_value = result.clone();
        let on_reason = result.clone();
        input.react(
            move |value| on_value.fulfill(value),
            move |reason| on_reason.reject(reason),
        );
    }
    result
}
