//! Combinators over many deferred values.
//!
//! - [`all`]: fulfils with every value in input order, or rejects with the first reason
//! - [`race`]: settles like the first input to settle
//! - [`any`]: fulfils with the first value, or rejects with an [`AggregateError`](crate::AggregateError)
//! - [`all_settled`]: fulfils with every [`Settlement`](crate::Settlement), never rejects
//! - [`dynamic`]: the same four over dynamically typed JSON input
//!
//! Each input is anything convertible into a [`Resolution`]: plain values
//! and deferred values can be mixed. Plain values are wrapped into fulfilled
//! deferred values first, so every input reports through the scheduler and
//! no combinator settles inside the call that created it, except for the
//! empty-input cases of `all`, `any` and `all_settled`.

pub mod all;
pub mod all_settled;
pub mod any;
pub mod dynamic;
pub mod race;

pub use all::all;
pub use all_settled::all_settled;
pub use any::any;
pub use race::race;

use crate::deferred::{Deferred, Resolution};
use crate::runtime::SchedulerHandle;
use crate::tracing_compat::trace;
use crate::types::Payload;

/// Normalizes combinator input into deferred values on `scheduler`.
fn collect_inputs<T, E, I>(scheduler: &SchedulerHandle, inputs: I) -> Vec<Deferred<T, E>>
where
    T: Payload,
    E: Payload,
    I: IntoIterator,
    I::Item: Into<Resolution<T, E>>,
{
    let inputs: Vec<Deferred<T, E>> = inputs
        .into_iter()
        .map(|input| input.into().into_deferred(scheduler))
        .collect();
    trace!(inputs = inputs.len(), "combining");
    inputs
}

/// Per-input result slots plus the number still outstanding.
struct Slots<A> {
    slots: Vec<Option<A>>,
    remaining: usize,
}

impl<A> Slots<A> {
    fn new(len: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(len).collect(),
            remaining: len,
        }
    }

    /// Stores `item` at `index`; returns every item in input order once the
    /// last slot is filled.
    fn fill(&mut self, index: usize, item: A) -> Option<Vec<A>> {
        if self.slots[index].replace(item).is_none() {
            self.remaining -= 1;
        }
        if self.remaining > 0 {
            return None;
        }
        Some(std::mem::take(&mut self.slots).into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_logging;

    #[test]
    fn slots_release_in_input_order() {
        init_test_logging();
        crate::test_phase!("slots_release_in_input_order");
        let mut slots = Slots::new(3);
        crate::assert_with_log!(slots.fill(2, 'c').is_none(), "waiting", None::<Vec<char>>, "");
        crate::assert_with_log!(slots.fill(0, 'a').is_none(), "waiting", None::<Vec<char>>, "");
        let done = slots.fill(1, 'b');
        crate::assert_with_log!(
            done == Some(vec!['a', 'b', 'c']),
            "ordered by index",
            "Some(['a', 'b', 'c'])",
            done
        );
        crate::test_complete!("slots_release_in_input_order");
    }
}
