//! Wait for every input to fulfil.

use super::{Slots, collect_inputs};
use crate::deferred::{Deferred, Resolution};
use crate::runtime::SchedulerHandle;
use crate::types::Payload;
use parking_lot::Mutex;
use std::sync::Arc;

/// Fulfils with all values in input order once every input has fulfilled.
///
/// Rejects with the reason of the first input to reject; later outcomes are
/// ignored. An empty input fulfils immediately with an empty vector.
pub fn all<T, E, I>(scheduler: &SchedulerHandle, inputs: I) -> Deferred<Vec<T>, E>
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
        let slots = Arc::clone(&slots);
        let on_value = result.clone();
        let on_reason = result.clone();
        input.react(
            move |value| {
                let done = slots.lock().fill(index, value);
                if let Some(values) = done {
                    on_value.fulfill(values);
                }
            },
            move |reason| on_reason.reject(reason),
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MicrotaskQueue;
    use crate::test_utils::init_test_logging;
    use crate::types::Settlement;

    fn init_test(test_name: &str) {
        init_test_logging();
        crate::test_phase!(test_name);
    }

    fn setup() -> (Arc<MicrotaskQueue>, SchedulerHandle) {
        let queue = Arc::new(MicrotaskQueue::new());
        let handle: SchedulerHandle = queue.clone();
        (queue, handle)
    }

    #[test]
    fn values_keep_input_order() {
        init_test("values_keep_input_order");
        let (queue, handle) = setup();
        let (slow, slow_resolver) = Deferred::<u32, String>::with_resolvers(handle.clone());
        let (fast, fast_resolver) = Deferred::<u32, String>::with_resolvers(handle.clone());
        let joined: Deferred<Vec<u32>, String> = all(
            &handle,
            vec![
                Resolution::Deferred(slow),
                Resolution::Value(2),
                Resolution::Deferred(fast),
            ],
        );
        fast_resolver.resolve(3);
        queue.run_until_idle().expect("drain");
        crate::assert_with_log!(joined.is_pending(), "slow input outstanding", true, joined.state());

        slow_resolver.resolve(1);
        queue.run_until_idle().expect("drain");
        crate::assert_with_log!(
            joined.peek() == Some(Settlement::fulfilled(vec![1, 2, 3])),
            "input order, not settle order",
            "[1, 2, 3]",
            joined.peek()
        );
        crate::test_complete!("values_keep_input_order");
    }

    #[test]
    fn first_rejection_wins() {
        init_test("first_rejection_wins");
        let (queue, handle) = setup();
        let (a, a_resolver) = Deferred::<u32, String>::with_resolvers(handle.clone());
        let (b, b_resolver) = Deferred::<u32, String>::with_resolvers(handle.clone());
        let joined: Deferred<Vec<u32>, String> = all(&handle, vec![a, b]);
        b_resolver.reject("b".to_string());
        a_resolver.reject("a".to_string());
        queue.run_until_idle().expect("drain");
        crate::assert_with_log!(
            joined.peek() == Some(Settlement::rejected("b".to_string())),
            "earliest rejection",
            "Rejected(b)",
            joined.peek()
        );
        crate::test_complete!("first_rejection_wins");
    }

    #[test]
    fn empty_input_fulfils_immediately() {
        init_test("empty_input_fulfils_immediately");
        let (_queue, handle) = setup();
        let joined: Deferred<Vec<u32>, String> = all(&handle, Vec::<u32>::new());
        crate::assert_with_log!(
            joined.peek() == Some(Settlement::fulfilled(Vec::new())),
            "empty vector",
            "Fulfilled([])",
            joined.peek()
        );
        crate::test_complete!("empty_input_fulfils_immediately");
    }
}
