use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::warn;

use super::Policy;
use crate::outcome::{Failure, Outcome};
use crate::stats::{CounterSnapshot, Counters};

type StatsFn<I> = Box<dyn Fn(&I) -> Arc<Counters> + Send + Sync>;
type RatioOp<I, O> = Box<dyn FnMut(&I, Outcome<O>, CounterSnapshot) -> Outcome<O> + Send>;

/// Trigger on the failure ratio of an external counter
///
/// The operation always runs. Afterwards, once at least `min_sample` items
/// have been processed and `failures / processed >= threshold`, the outcome
/// is handed to `op` which decides the final result.
pub struct Ratio<I, O> {
    threshold: f64,
    min_sample: u64,
    stats: StatsFn<I>,
    op: RatioOp<I, O>,
}

impl<I, O> Ratio<I, O> {
    pub fn new<S, F>(threshold: f64, stats: S, op: F) -> Self
    where
        S: Fn(&I) -> Arc<Counters> + Send + Sync + 'static,
        F: FnMut(&I, Outcome<O>, CounterSnapshot) -> Outcome<O> + Send + 'static,
    {
        Self {
            threshold,
            min_sample: 1,
            stats: Box::new(stats),
            op: Box::new(op),
        }
    }

    /// Ratio whose handler replaces the outcome with [`Failure::Denied`]
    pub fn deny<S>(threshold: f64, stats: S) -> Self
    where
        S: Fn(&I) -> Arc<Counters> + Send + Sync + 'static,
    {
        Self::new(threshold, stats, move |_, _, snapshot| {
            Err(Failure::Denied(format!(
                "failure ratio {:.2} reached threshold {threshold:.2}",
                snapshot.failure_ratio()
            )))
        })
    }

    /// Ignore the ratio until this many items have been processed
    pub fn with_min_sample(mut self, min_sample: u64) -> Self {
        self.min_sample = min_sample.max(1);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl<I, O> std::fmt::Debug for Ratio<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ratio")
            .field("threshold", &self.threshold)
            .field("min_sample", &self.min_sample)
            .finish()
    }
}

#[async_trait]
impl<I: Sync, O: Send> Policy<I, O> for Ratio<I, O> {
    async fn run<'a>(
        &'a mut self,
        input: &'a I,
        operation: BoxFuture<'a, Outcome<O>>,
    ) -> Outcome<O> {
        let outcome = operation.await;
        let snapshot = (self.stats)(input).snapshot();
        if snapshot.processed >= self.min_sample && snapshot.failure_ratio() >= self.threshold {
            warn!(
                processed = snapshot.processed,
                failures = snapshot.failures(),
                threshold = self.threshold,
                "Failure ratio threshold reached"
            );
            return (self.op)(input, outcome, snapshot);
        }
        outcome
    }
}
