//! The deferred value state machine.
//!
//! A [`Deferred`] starts `Pending` and settles at most once, either
//! `Fulfilled` with a `T` or `Rejected` with an `E`. Reactions attached while
//! pending wait in two FIFO queues, one per outcome; settling binds the
//! matching queue to the payload and hands the resulting jobs to the
//! scheduler in attachment order. Reactions attached after settlement are
//! scheduled immediately. In both cases the reaction runs only when the
//! scheduler runs it, never inside the call that attached it.
//!
//! # Chaining
//!
//! Every chaining operation returns a new child value:
//!
//! | Operation | Fulfilled parent | Rejected parent |
//! |-----------|------------------|-----------------|
//! | [`then`](Deferred::then) | `on_fulfilled(value)` | `on_rejected(reason)` |
//! | [`then_fulfilled`](Deferred::then_fulfilled) | `on_fulfilled(value)` | reason passes through |
//! | [`and_then`](Deferred::and_then) | adopt `f(value)` | reason passes through |
//! | [`catch`](Deferred::catch) | value passes through | `on_rejected(reason)` |
//! | [`finally`](Deferred::finally) | run, keep value | run, keep reason |
//!
//! A handler returning `Ok` resolves the child; returning `Err` rejects it.
//! Handlers never unwind through `then`: failure is a value. A handler that
//! panics anyway leaves its child pending.
//!
//! # Dispatch
//!
//! Jobs produced by settlement or by attaching to a settled value go into a
//! per-value outbox under the state lock, in attachment order. One caller at
//! a time drains the outbox into the scheduler with the lock released; other
//! callers only append. Scheduling order therefore matches attachment order
//! even when threads race, and a scheduler may attach further reactions to
//! the same value from inside `schedule`.

mod resolution;
mod resolver;
mod settled;

pub use resolution::Resolution;
pub use resolver::Resolver;
pub use settled::Settled;

use crate::error::Reason;
use crate::runtime::callback_queue::CallbackQueue;
use crate::runtime::{Job, SchedulerHandle};
use crate::tracing_compat::{debug, trace, warn};
use crate::types::{DeferredId, DeferredState, Payload, Settlement};
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::Arc;

enum State<T, E> {
    Pending {
        on_fulfilled: CallbackQueue<T>,
        on_rejected: CallbackQueue<E>,
    },
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> State<T, E> {
    const fn kind(&self) -> DeferredState {
        match self {
            Self::Pending { .. } => DeferredState::Pending,
            Self::Fulfilled(_) => DeferredState::Fulfilled,
            Self::Rejected(_) => DeferredState::Rejected,
        }
    }
}

/// State plus the jobs waiting to be handed to the scheduler.
///
/// Jobs enter `outbox` under the lock in attachment order. Whoever finds
/// `dispatching` unset becomes the dispatcher and moves the outbox to the
/// scheduler, lock released, until it stays empty. Everyone else only
/// appends, so scheduling order equals attachment order across threads.
struct Shared<T, E> {
    state: State<T, E>,
    outbox: Vec<Job>,
    dispatching: bool,
}

/// A single-assignment value that is eventually fulfilled or rejected.
///
/// Cloning a `Deferred` clones a handle; all clones observe the same state.
pub struct Deferred<T, E = Reason> {
    id: DeferredId,
    shared: Arc<Mutex<Shared<T, E>>>,
    scheduler: SchedulerHandle,
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            shared: Arc::clone(&self.shared),
            scheduler: Arc::clone(&self.scheduler),
        }
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("id", &self.id)
            .field("state", &self.shared.lock().state.kind())
            .finish_non_exhaustive()
    }
}

impl<T, E> Deferred<T, E> {
    /// Returns this value's id.
    #[must_use]
    pub const fn id(&self) -> DeferredId {
        self.id
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> DeferredState {
        self.shared.lock().state.kind()
    }

    /// Returns true while the value has not settled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.shared.lock().state, State::Pending { .. })
    }

    /// Returns the scheduler this value (and everything derived from it)
    /// schedules reactions on.
    #[must_use]
    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    /// Returns true if both handles refer to the same deferred value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T: Payload, E: Payload> Deferred<T, E> {
    /// Creates a deferred value and runs `executor` synchronously with its
    /// resolver.
    ///
    /// If the executor returns `Err(reason)` the value is rejected with that
    /// reason (unless the executor already settled it). The error is never
    /// returned to the caller.
    pub fn new<F>(scheduler: SchedulerHandle, executor: F) -> Self
    where
        F: FnOnce(Resolver<T, E>) -> Result<(), E>,
    {
        let deferred = Self::pending(scheduler);
        if let Err(reason) = executor(Resolver::new(deferred.clone())) {
            debug!(deferred = %deferred.id, "executor failed");
            deferred.reject(reason);
        }
        deferred
    }

    /// Creates a pending value together with its resolver.
    #[must_use]
    pub fn with_resolvers(scheduler: SchedulerHandle) -> (Self, Resolver<T, E>) {
        let deferred = Self::pending(scheduler);
        let resolver = Resolver::new(deferred.clone());
        (deferred, resolver)
    }

    /// Creates a value resolved with `value`.
    ///
    /// A plain value fulfills immediately; a deferred value is adopted, so
    /// the result settles when it does.
    pub fn resolved(scheduler: SchedulerHandle, value: impl Into<Resolution<T, E>>) -> Self {
        let deferred = Self::pending(scheduler);
        deferred.resolve(value);
        deferred
    }

    /// Creates a value rejected with `reason`.
    pub fn rejected(scheduler: SchedulerHandle, reason: E) -> Self {
        let deferred = Self::pending(scheduler);
        deferred.reject(reason);
        deferred
    }

    pub(crate) fn pending(scheduler: SchedulerHandle) -> Self {
        let deferred = Self {
            id: DeferredId::next(),
            shared: Arc::new(Mutex::new(Shared {
                state: State::Pending {
                    on_fulfilled: CallbackQueue::default(),
                    on_rejected: CallbackQueue::default(),
                },
                outbox: Vec::new(),
                dispatching: false,
            })),
            scheduler,
        };
        trace!(deferred = %deferred.id, "created");
        deferred
    }

    /// Returns the settlement, or `None` while pending.
    #[must_use]
    pub fn peek(&self) -> Option<Settlement<T, E>> {
        match &self.shared.lock().state {
            State::Pending { .. } => None,
            State::Fulfilled(value) => Some(Settlement::fulfilled(value.clone())),
            State::Rejected(reason) => Some(Settlement::rejected(reason.clone())),
        }
    }

    /// Returns the number of reactions waiting for settlement.
    #[must_use]
    pub fn pending_reactions(&self) -> usize {
        match &self.shared.lock().state {
            State::Pending { on_fulfilled, .. } => on_fulfilled.len(),
            _ => 0,
        }
    }

    /// Runs the resolution procedure: fulfil with a plain value, or adopt the
    /// outcome of a deferred value.
    pub(crate) fn resolve(&self, value: impl Into<Resolution<T, E>>) {
        if !self.is_pending() {
            return;
        }
        match value.into() {
            Resolution::Value(value) => self.fulfill(value),
            Resolution::Deferred(inner) => self.adopt(&inner),
        }
    }

    fn adopt(&self, inner: &Self) {
        if self.ptr_eq(inner) {
            warn!(
                deferred = %self.id,
                "resolved with itself; the value can never settle"
            );
            return;
        }
        trace!(deferred = %self.id, inner = %inner.id, "adopting");
        let on_value = self.clone();
        let on_reason = self.clone();
        inner.react(
            move |value| on_value.fulfill(value),
            move |reason| on_reason.reject(reason),
        );
    }

    pub(crate) fn fulfill(&self, value: T) {
        let mut shared = self.shared.lock();
        if !matches!(shared.state, State::Pending { .. }) {
            return;
        }
        let previous = std::mem::replace(&mut shared.state, State::Fulfilled(value.clone()));
        let State::Pending {
            on_fulfilled,
            on_rejected,
        } = previous
        else {
            return;
        };
        let jobs = on_fulfilled.bind(value);
        debug!(deferred = %self.id, reactions = jobs.len(), "fulfilled");
        shared.outbox.extend(jobs);
        self.dispatch(shared);
        // Dropped unlocked: captured state may touch this value in `Drop`.
        drop(on_rejected);
    }

    /// Rejects the value. The reason is stored as given; it is never
    /// unwrapped, even if it is itself a deferred value.
    pub(crate) fn reject(&self, reason: E) {
        let mut shared = self.shared.lock();
        if !matches!(shared.state, State::Pending { .. }) {
            return;
        }
        let previous = std::mem::replace(&mut shared.state, State::Rejected(reason.clone()));
        let State::Pending {
            on_fulfilled,
            on_rejected,
        } = previous
        else {
            return;
        };
        let jobs = on_rejected.bind(reason);
        debug!(deferred = %self.id, reactions = jobs.len(), "rejected");
        shared.outbox.extend(jobs);
        self.dispatch(shared);
        drop(on_fulfilled);
    }

    /// Hands the outbox to the scheduler unless another caller already is.
    ///
    /// Consumes the guard; the lock is never held while the scheduler runs.
    fn dispatch<'a>(&'a self, mut shared: MutexGuard<'a, Shared<T, E>>) {
        if shared.dispatching {
            return;
        }
        shared.dispatching = true;
        loop {
            let batch = std::mem::take(&mut shared.outbox);
            if batch.is_empty() {
                shared.dispatching = false;
                return;
            }
            drop(shared);
            for job in batch {
                self.scheduler.schedule(job);
            }
            shared = self.shared.lock();
        }
    }

    /// Subscribes raw callbacks to the eventual outcome.
    ///
    /// Pending: one callback is queued per outcome. Settled: the matching
    /// callback goes to the outbox behind any reactions still being
    /// dispatched. Either way it runs on the scheduler.
    pub(crate) fn react<F, R>(&self, on_fulfilled: F, on_rejected: R)
    where
        F: FnOnce(T) + Send + 'static,
        R: FnOnce(E) + Send + 'static,
    {
        let mut shared = self.shared.lock();
        let job: Job = match &mut shared.state {
            State::Pending {
                on_fulfilled: fulfilled_queue,
                on_rejected: rejected_queue,
            } => {
                fulfilled_queue.push(Box::new(on_fulfilled));
                rejected_queue.push(Box::new(on_rejected));
                return;
            }
            State::Fulfilled(value) => {
                let value = value.clone();
                Box::new(move || on_fulfilled(value))
            }
            State::Rejected(reason) => {
                let reason = reason.clone();
                Box::new(move || on_rejected(reason))
            }
        };
        shared.outbox.push(job);
        self.dispatch(shared);
    }

    fn settle_with(&self, outcome: Result<Resolution<T, E>, E>) {
        match outcome {
            Ok(resolution) => self.resolve(resolution),
            Err(reason) => self.reject(reason),
        }
    }

    /// Attaches handlers for both outcomes, each returning a [`Resolution`].
    ///
    /// This is the general chaining form the other operations are built on.
    /// `Ok(Resolution::Deferred(d))` makes the child adopt `d`.
    pub fn then_with<U, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Deferred<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> Result<Resolution<U, E>, E> + Send + 'static,
        R: FnOnce(E) -> Result<Resolution<U, E>, E> + Send + 'static,
    {
        let child = Deferred::pending(Arc::clone(&self.scheduler));
        let on_value = child.clone();
        let on_reason = child.clone();
        self.react(
            move |value| on_value.settle_with(on_fulfilled(value)),
            move |reason| on_reason.settle_with(on_rejected(reason)),
        );
        child
    }

    /// Attaches handlers for both outcomes.
    pub fn then<U, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Deferred<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
        R: FnOnce(E) -> Result<U, E> + Send + 'static,
    {
        self.then_with(
            move |value| on_fulfilled(value).map(Resolution::Value),
            move |reason| on_rejected(reason).map(Resolution::Value),
        )
    }

    /// Attaches a fulfillment handler; rejections pass through unchanged.
    pub fn then_fulfilled<U, F>(&self, on_fulfilled: F) -> Deferred<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        self.then_with(
            move |value| on_fulfilled(value).map(Resolution::Value),
            Err,
        )
    }

    /// Attaches a fulfillment handler that returns another deferred value,
    /// which the child adopts. Rejections pass through unchanged.
    pub fn and_then<U, F>(&self, f: F) -> Deferred<U, E>
    where
        U: Payload,
        F: FnOnce(T) -> Deferred<U, E> + Send + 'static,
    {
        self.then_with(move |value| Ok(Resolution::Deferred(f(value))), Err)
    }

    /// Attaches a rejection handler; fulfilled values pass through unchanged.
    ///
    /// Returning `Ok` recovers: the child fulfills with that value.
    pub fn catch<R>(&self, on_rejected: R) -> Self
    where
        R: FnOnce(E) -> Result<T, E> + Send + 'static,
    {
        self.then_with(
            |value| Ok(Resolution::Value(value)),
            move |reason| on_rejected(reason).map(Resolution::Value),
        )
    }

    /// Like [`catch`](Self::catch), but the handler returns a [`Resolution`].
    pub fn catch_with<R>(&self, on_rejected: R) -> Self
    where
        R: FnOnce(E) -> Result<Resolution<T, E>, E> + Send + 'static,
    {
        self.then_with(|value| Ok(Resolution::Value(value)), on_rejected)
    }

    /// Runs `on_finally` on either outcome and re-settles the child with the
    /// original outcome.
    ///
    /// If `on_finally` returns `Err`, that reason rejects the child instead.
    pub fn finally<F>(&self, on_finally: F) -> Self
    where
        F: FnOnce() -> Result<(), E> + Send + 'static,
    {
        let on_value = Arc::new(Mutex::new(Some(on_finally)));
        let on_reason = Arc::clone(&on_value);
        self.then_with(
            move |value| {
                run_finally(&on_value)?;
                Ok(Resolution::Value(value))
            },
            move |reason| {
                run_finally(&on_reason)?;
                Err(reason)
            },
        )
    }

    /// Returns a [`std::future::Future`] that completes with the outcome.
    ///
    /// The future becomes ready once the scheduler has run the reaction
    /// registered here.
    #[must_use]
    pub fn settled(&self) -> Settled<T, E> {
        Settled::attach(self)
    }
}

fn run_finally<F, E>(slot: &Mutex<Option<F>>) -> Result<(), E>
where
    F: FnOnce() -> Result<(), E>,
{
    let handler = slot.lock().take();
    handler.map_or(Ok(()), |handler| handler())
}

impl<T: Payload, E: Payload> std::future::IntoFuture for Deferred<T, E> {
    type Output = Result<T, E>;
    type IntoFuture = Settled<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        self.settled()
    }
}
