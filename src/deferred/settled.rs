//! Bridge from a deferred value to [`std::future::Future`].
//!
//! [`Settled`] registers one reaction on the deferred value. The future turns
//! ready when the scheduler runs that reaction, so a host must keep draining
//! its microtask queue for `.await` to make progress.

use super::Deferred;
use crate::types::Payload;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

struct Slot<T, E> {
    outcome: Option<Result<T, E>>,
    waker: Option<Waker>,
}

impl<T, E> Slot<T, E> {
    fn complete(slot: &Mutex<Self>, outcome: Result<T, E>) {
        let waker = {
            let mut slot = slot.lock();
            slot.outcome = Some(outcome);
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Future returned by [`Deferred::settled`].
///
/// Resolves to `Ok(value)` or `Err(reason)`. Polling after completion returns
/// `Poll::Pending` forever.
#[must_use = "futures do nothing unless polled"]
pub struct Settled<T, E> {
    slot: Arc<Mutex<Slot<T, E>>>,
}

impl<T, E> std::fmt::Debug for Settled<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settled")
            .field("ready", &self.slot.lock().outcome.is_some())
            .finish()
    }
}

impl<T: Payload, E: Payload> Settled<T, E> {
    pub(super) fn attach(deferred: &Deferred<T, E>) -> Self {
        let slot = Arc::new(Mutex::new(Slot {
            outcome: None,
            waker: None,
        }));
        let on_value = Arc::clone(&slot);
        let on_reason = Arc::clone(&slot);
        deferred.react(
            move |value| Slot::complete(&on_value, Ok(value)),
            move |reason| Slot::complete(&on_reason, Err(reason)),
        );
        Self { slot }
    }
}

impl<T, E> Future for Settled<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.lock();
        match slot.outcome.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                match &slot.waker {
                    Some(waker) if waker.will_wake(cx.waker()) => {}
                    _ => slot.waker = Some(cx.waker().clone()),
                }
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MicrotaskQueue, SchedulerHandle};
    use crate::test_utils::init_test_logging;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::Wake;

    #[derive(Default)]
    struct WakeCounter {
        wakes: AtomicUsize,
    }

    impl Wake for WakeCounter {
        fn wake(self: Arc<Self>) {
            self.wakes.fetch_add(1, Ordering::Relaxed);
        }

        fn wake_by_ref(self: &Arc<Self>) {
            self.wakes.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn init_test(test_name: &str) {
        init_test_logging();
        crate::test_phase!(test_name);
    }

    #[test]
    fn pending_until_drained_then_ready_with_single_wake() {
        init_test("pending_until_drained_then_ready_with_single_wake");
        let queue = Arc::new(MicrotaskQueue::new());
        let handle: SchedulerHandle = queue.clone();
        let (deferred, resolver) = Deferred::<i32, String>::with_resolvers(handle);

        let wake_counter = Arc::new(WakeCounter::default());
        let waker = Waker::from(Arc::clone(&wake_counter));
        let mut cx = Context::from_waker(&waker);
        let mut fut = Box::pin(deferred.settled());

        assert!(fut.as_mut().poll(&mut cx).is_pending());
        resolver.resolve(11);
        assert!(fut.as_mut().poll(&mut cx).is_pending(), "reaction not run yet");
        assert_eq!(wake_counter.wakes.load(Ordering::Relaxed), 0);

        queue.run_until_idle().expect("drain");
        assert_eq!(wake_counter.wakes.load(Ordering::Relaxed), 1);
        assert_eq!(fut.as_mut().poll(&mut cx), Poll::Ready(Ok(11)));
        crate::test_complete!("pending_until_drained_then_ready_with_single_wake");
    }

    #[test]
    fn rejection_surfaces_as_err() {
        init_test("rejection_surfaces_as_err");
        let queue = Arc::new(MicrotaskQueue::new());
        let handle: SchedulerHandle = queue.clone();
        let deferred: Deferred<i32, String> = Deferred::rejected(handle, "nope".to_string());

        let waker = Waker::from(Arc::new(WakeCounter::default()));
        let mut cx = Context::from_waker(&waker);
        let mut fut = Box::pin(std::future::IntoFuture::into_future(deferred));
        assert!(fut.as_mut().poll(&mut cx).is_pending());
        queue.run_until_idle().expect("drain");
        assert_eq!(
            fut.as_mut().poll(&mut cx),
            Poll::Ready(Err("nope".to_string()))
        );
        crate::test_complete!("rejection_surfaces_as_err");
    }
}
