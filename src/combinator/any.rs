//! First fulfilment wins.

use super::{Slots, collect_inputs};
use crate::deferred::{Deferred, Resolution};
use crate::error::AggregateError;
use crate::runtime::SchedulerHandle;
use crate::types::Payload;
use parking_lot::Mutex;
use std::sync::Arc;

/// Fulfils with the value of the first input to fulfil.
///
/// If every input rejects, rejects with an [`AggregateError`] holding all
/// reasons in input order. An empty input rejects immediately with an empty
/// aggregate.
pub fn any<T, E, I>(scheduler: &SchedulerHandle, inputs: I) -> Deferred<T, E>
where
    T: Payload,
    E: Payload + From<AggregateError<E>>,
    I: IntoIterator,
    I::Item: Into<Resolution<T, E>>,
{
    let inputs = collect_inputs(scheduler, inputs);
    let result = Deferred::pending(Arc::clone(scheduler));
    if inputs.is_empty() {
        result.reject(E::from(AggregateError::new(Vec::new())));
        return result;
    }

    let reasons = Arc::new(Mutex::new(Slots::new(inputs.len())));
    for (index, input) in inputs.iter().enumerate() {
        let reasons = Arc::clone(&reasons);
        let on_value = result.clone();
        let on_reason = result.clone();
        input.react(
            move |value| on_value.fulfill(value),
            move |reason| {
                let done = reasons.lock().fill(index, reason);
                if let Some(reasons) = done {
                    on_reason.reject(E::from(AggregateError::new(reasons)));
                }
            },
        );
    }
    result
}
