//! # Deferred Execution Scheduler
//!
//! Runs an operation once after a delay. Used by actors to re-inject control
//! actions later (resume after pause, retry after an empty poll, delayed start).
//!
//! ## Architecture
//!
//! ```text
//! schedule(delay, op) ──→ spawn ──→ sleep(delay) ──→ [Semaphore] ──→ op.catch_unwind()
//! ```
//!
//! - `schedule` never blocks: the wait happens on the runtime the scheduler
//!   was created on, not on the caller.
//! - The semaphore bounds how many operations *execute* at once; waiting on a
//!   delay does not hold a permit, so schedules never block each other.
//! - A panicking operation is caught and logged; the pool keeps running.
//! - There is no cancellation. Operations guard themselves (for example by
//!   upgrading a weak mailbox sender) and become no-ops when their target is gone.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::config::SchedulerConfig;
use crate::error::{ActorError, Result};

/// Operation executed by a [`Scheduler`]
pub type ScheduledOperation = BoxFuture<'static, ()>;

/// Executes deferred operations exactly once after a delay
pub trait Scheduler: Send + Sync + std::fmt::Debug {
    /// Schedule `operation` to run after `delay`; returns immediately
    fn schedule(&self, delay: Duration, operation: ScheduledOperation);

    /// Schedule with the delay expressed in whole seconds
    fn schedule_secs(&self, seconds: u64, operation: ScheduledOperation) {
        self.schedule(Duration::from_secs(seconds), operation);
    }

    /// Schedule an async closure
    fn schedule_fn<F, Fut>(&self, delay: Duration, operation: F)
    where
        Self: Sized,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.schedule(delay, Box::pin(async move { operation().await }));
    }
}

/// Counters describing scheduler activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerStats {
    pub scheduled: u64,
    pub completed: u64,
    pub panicked: u64,
}

#[derive(Debug, Default)]
struct AtomicSchedulerStats {
    scheduled: AtomicU64,
    completed: AtomicU64,
    panicked: AtomicU64,
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Tokio-backed scheduler with a bounded execution pool
#[derive(Debug, Clone)]
pub struct DelayScheduler {
    name: String,
    runtime: Handle,
    permits: Arc<Semaphore>,
    stats: Arc<AtomicSchedulerStats>,
}

impl DelayScheduler {
    /// Create a scheduler on the current tokio runtime
    pub fn new(name: impl Into<String>, config: &SchedulerConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| ActorError::NoRuntime(e.to_string()))?;
        Self::with_handle(name, runtime, config)
    }

    /// Create a scheduler that runs its operations on `runtime`
    pub fn with_handle(
        name: impl Into<String>,
        runtime: Handle,
        config: &SchedulerConfig,
    ) -> Result<Self> {
        if config.max_concurrent == 0 {
            return Err(ActorError::Validation(
                "scheduler.max_concurrent must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            name: name.into(),
            runtime,
            permits: Arc::new(Semaphore::new(config.max_concurrent)),
            stats: Arc::new(AtomicSchedulerStats::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a snapshot of scheduler activity
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            scheduled: self.stats.scheduled.load(Ordering::Relaxed),
            completed: self.stats.completed.load(Ordering::Relaxed),
            panicked: self.stats.panicked.load(Ordering::Relaxed),
        }
    }

    /// Number of operations that may start executing right now
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Scheduler for DelayScheduler {
    fn schedule(&self, delay: Duration, operation: ScheduledOperation) {
        let name = self.name.clone();
        let permits = self.permits.clone();
        let stats = self.stats.clone();
        stats.scheduled.fetch_add(1, Ordering::Relaxed);

        debug!(
            scheduler = %name,
            delay_ms = delay.as_millis() as u64,
            "Operation scheduled"
        );

        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    error!(
                        scheduler = %name,
                        "Semaphore closed - scheduled operation dropped"
                    );
                    return;
                }
            };

            match AssertUnwindSafe(operation).catch_unwind().await {
                Ok(()) => {
                    stats.completed.fetch_add(1, Ordering::Relaxed);
                }
                Err(panic_error) => {
                    let panic_msg = panic_message(panic_error.as_ref());
                    stats.panicked.fetch_add(1, Ordering::Relaxed);
                    error!(
                        scheduler = %name,
                        panic_msg = %panic_msg,
                        "Scheduled operation panicked"
                    );
                }
            }
        });
    }
}
