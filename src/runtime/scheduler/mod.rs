//! Deferred job scheduling.
//!
//! A [`Scheduler`] accepts zero-argument jobs and runs them later, in the
//! order they were scheduled. Deferred values never call back into user code
//! directly; every reaction goes through the scheduler they were created with.
//!
//! Contract every implementation must honor:
//!
//! 1. a job never runs before [`Scheduler::schedule`] has returned,
//! 2. jobs scheduled A-then-B run A-before-B,
//! 3. scheduling from inside a running job is allowed and appends to the
//!    same ordered queue.
//!
//! [`MicrotaskQueue`] is the default implementation. Hosts with their own
//! event loop implement the trait over their own FIFO facility.

pub mod microtask_queue;

pub use microtask_queue::{MicrotaskQueue, QueueStats};

use std::sync::Arc;

/// A deferred action.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to a scheduler, cloned into every deferred value.
pub type SchedulerHandle = Arc<dyn Scheduler>;

/// A strictly-FIFO deferred-execution facility.
pub trait Scheduler: Send + Sync {
    /// Queues `job` to run after the caller's synchronous work unwinds.
    fn schedule(&self, job: Job);
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
    fn schedule(&self, job: Job) {
        (**self).schedule(job);
    }
}
