//! Per-outcome callback queue.
//!
//! A deferred value keeps one queue per eventual outcome. Consumers attached
//! while it is pending push a callback onto each queue; on settlement the
//! matching queue is bound to the payload, producing zero-argument [`Job`]s in
//! attachment order, and the other queue is dropped.

use crate::runtime::Job;
use smallvec::SmallVec;

/// A callback awaiting an outcome payload.
pub(crate) type Callback<A> = Box<dyn FnOnce(A) + Send + 'static>;

/// FIFO of callbacks with O(1) append.
///
/// Most deferred values have one or two consumers, so the first two slots are
/// stored inline.
pub(crate) struct CallbackQueue<A> {
    callbacks: SmallVec<[Callback<A>; 2]>,
}

impl<A> Default for CallbackQueue<A> {
    fn default() -> Self {
        Self {
            callbacks: SmallVec::new(),
        }
    }
}

impl<A: Clone + Send + 'static> CallbackQueue<A> {
    pub(crate) fn push(&mut self, callback: Callback<A>) {
        self.callbacks.push(callback);
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Binds `payload` to every queued callback, returning jobs in attachment
    /// order. The last callback receives `payload` itself; the rest get clones.
    pub(crate) fn bind(mut self, payload: A) -> Vec<Job> {
        let Some(last) = self.callbacks.pop() else {
            return Vec::new();
        };
        let mut jobs: Vec<Job> = Vec::with_capacity(self.callbacks.len() + 1);
        for callback in self.callbacks {
            let arg = payload.clone();
            jobs.push(Box::new(move || callback(arg)));
        }
        jobs.push(Box::new(move || last(payload)));
        jobs
    }
}
