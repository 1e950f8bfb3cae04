//! # Work Counters
//!
//! Lock-free per-actor counters. The owning actor is the only writer; policies
//! and diagnostics read through a shared `Arc<Counters>`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::outcome::{Failure, Outcome};

/// Atomic counters for work processed by one actor
#[derive(Debug, Default)]
pub struct Counters {
    processed: AtomicU64,
    succeeded: AtomicU64,
    denied: AtomicU64,
    invalid: AtomicU64,
    ignored: AtomicU64,
    errored: AtomicU64,
    unexpected: AtomicU64,
    /// Tasks dropped because the actor was not accepting work
    skipped: AtomicU64,
    /// Outcomes a policy produced in place of the worker's own
    overridden: AtomicU64,
}

/// Point-in-time copy of [`Counters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub processed: u64,
    pub succeeded: u64,
    pub denied: u64,
    pub invalid: u64,
    pub ignored: u64,
    pub errored: u64,
    pub unexpected: u64,
    pub skipped: u64,
    pub overridden: u64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one processed outcome under its success or failure bucket
    pub fn record<T>(&self, outcome: &Outcome<T>) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        let bucket = match outcome {
            Ok(_) => &self.succeeded,
            Err(failure) => self.bucket(failure),
        };
        bucket.fetch_add(1, Ordering::Relaxed);
    }

    fn bucket(&self, failure: &Failure) -> &AtomicU64 {
        match failure {
            Failure::Denied(_) | Failure::Limited { .. } => &self.denied,
            Failure::Invalid(_) => &self.invalid,
            Failure::Ignored(_) => &self.ignored,
            Failure::Errored(_) => &self.errored,
            Failure::Unexpected(_) => &self.unexpected,
        }
    }

    #[inline]
    pub fn inc_processed(&self) -> u64 {
        self.processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn inc_errored(&self) -> u64 {
        self.errored.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn inc_skipped(&self) -> u64 {
        self.skipped.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn inc_overridden(&self) -> u64 {
        self.overridden.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total_processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Get a snapshot of current counts
    ///
    /// Individual reads are atomic; the snapshot as a whole is not.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            invalid: self.invalid.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            errored: self.errored.load(Ordering::Relaxed),
            unexpected: self.unexpected.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            overridden: self.overridden.load(Ordering::Relaxed),
        }
    }
}

impl CounterSnapshot {
    /// Outcomes that were not successes
    pub fn failures(&self) -> u64 {
        self.denied + self.invalid + self.errored + self.unexpected
    }

    /// `failures / processed`, 0.0 before anything was processed
    pub fn failure_ratio(&self) -> f64 {
        if self.processed == 0 {
            0.0
        } else {
            self.failures() as f64 / self.processed as f64
        }
    }
}
