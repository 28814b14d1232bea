//! Wait for every input to settle.

use super::{Slots, collect_inputs};
use crate::deferred::{Deferred, Resolution};
use crate::runtime::SchedulerHandle;
use crate::types::{Payload, Settlement};
use parking_lot::Mutex;
use std::sync::Arc;

/// Fulfils with one [`Settlement`] per input, in input order, once every
/// input has settled. Never rejects.
///
/// An empty input fulfils immediately with an empty vector.
pub fn all_settled<T, E, I>(
    scheduler: &SchedulerHandle,
    inputs: I,
) -> Deferred<Vec<Settlement<T, E>>, E>
where
    T: Payload,
    E: Payload,
    I: IntoIterator,
    I::Item: Into<Resolution<T, E>>,
{
    let inputs = collect_inputs(scheduler, inputs);
    let result = Deferred::pending(Arc::clone(scheduler));
    if inputs.is_empty() {
        result.fulfill(Vec::new());
        return result;
    }

    let slots = Arc::new(Mutex::new(Slots::new(inputs.len())));
    for (index, input) in inputs.iter().enumerate() {
        let on_value = (Arc::clone(&slots), result.clone());
        let on_reason = (Arc::clone(&slots), result.clone());
        input.react(
            move |value| {
                let (slots, result) = on_value;
                record(&slots, &result, index, Settlement::fulfilled(value));
            },
            move |reason| {
                let (slots, result) = on_reason;
                record(&slots, &result, index, Settlement::rejected(reason));
            },
        );
    }
    result
}

fn record<T: Payload, E: Payload>(
    slots: &Mutex<Slots<Settlement<T, E>>>,
    result: &Deferred<Vec<Settlement<T, E>>, E>,
    index: usize,
    settlement: Settlement<T, E>,
) {
    let done = slots.lock().fill(index, settlement);
    if let Some(settlements) = done {
        result.fulfill(settlements);
    }
}
