//! Microtask queue.
//!
//! A mutex-guarded FIFO of jobs that is drained explicitly by its owner. The
//! lock is released before a job runs, so jobs may schedule further jobs;
//! those are appended behind everything already queued and run in the same
//! drain.
//!
//! A job that panics is contained: the panic is logged and counted in
//! [`QueueStats::panicked`], and the drain moves on to the next job. The
//! deferred value that job would have settled stays pending, so handlers
//! should report failure by returning `Err` rather than panicking.

use super::{Job, Scheduler};
use crate::error::RunError;
use crate::tracing_compat::{debug, error, warn};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters describing queue activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Jobs accepted by [`Scheduler::schedule`].
    pub scheduled: u64,
    /// Jobs run, including those that panicked.
    pub executed: u64,
    /// Jobs that panicked instead of returning.
    pub panicked: u64,
    /// Largest queue depth observed.
    pub high_water: usize,
}

/// The default [`Scheduler`]: a manually drained FIFO job queue.
#[derive(Default)]
pub struct MicrotaskQueue {
    inner: Mutex<VecDeque<Job>>,
    budget: Option<usize>,
    scheduled: AtomicU64,
    executed: AtomicU64,
    panicked: AtomicU64,
    high_water: AtomicUsize,
}

impl MicrotaskQueue {
    /// Creates an empty queue with no drain budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue with the given drain budget and initial capacity.
    ///
    /// A budget of `None` lets [`run_until_idle`](Self::run_until_idle) run
    /// until the queue is empty.
    #[must_use]
    pub fn with_limits(budget: Option<usize>, capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            budget,
            ..Self::default()
        }
    }

    /// Returns the drain budget.
    #[must_use]
    pub const fn budget(&self) -> Option<usize> {
        self.budget
    }

    /// Returns the number of queued jobs.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if no jobs are queued.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Runs the oldest queued job, if any.
    ///
    /// Returns `false` when the queue was empty. A panicking job counts as
    /// run.
    pub fn tick(&self) -> bool {
        let Some(job) = self.inner.lock().pop_front() else {
            return false;
        };
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            let panicked = self.panicked.fetch_add(1, Ordering::Relaxed) + 1;
            error!(panicked, "microtask panicked; its deferred value stays pending");
        }
        self.executed.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Runs jobs until the queue is empty, including jobs scheduled while
    /// draining.
    ///
    /// Returns the number of jobs run, or [`RunError::BudgetExhausted`] when
    /// the drain budget ran out with jobs still queued.
    pub fn run_until_idle(&self) -> Result<usize, RunError> {
        let mut ran = 0;
        loop {
            if let Some(budget) = self.budget {
                if ran >= budget {
                    let pending = self.len();
                    if pending == 0 {
                        break;
                    }
                    warn!(budget, pending, "microtask drain budget exhausted");
                    return Err(RunError::BudgetExhausted { budget, pending });
                }
            }
            if !self.tick() {
                break;
            }
            ran += 1;
        }
        debug!(ran, "microtask queue idle");
        Ok(ran)
    }

    /// Returns a snapshot of the queue counters.
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            scheduled: self.scheduled.load(Ordering::Relaxed),
            executed: self.executed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            high_water: self.high_water.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for MicrotaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MicrotaskQueue")
            .field("len", &self.len())
            .field("budget", &self.budget)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Scheduler for MicrotaskQueue {
    fn schedule(&self, job: Job) {
        let depth = {
            let mut inner = self.inner.lock();
            inner.push_back(job);
            inner.len()
        };
        self.scheduled.fetch_add(1, Ordering::Relaxed);
        self.high_water.fetch_max(depth, Ordering::Relaxed);
    }
}
