use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::debug;

use super::Policy;
use crate::outcome::{Failure, Outcome};
use crate::stats::Counters;

type StatsFn<I> = Box<dyn Fn(&I) -> Arc<Counters> + Send + Sync>;
type LimitOp<I, O> = Box<dyn FnMut(&I, u64) -> Outcome<O> + Send>;

/// Gate on an external processed counter
///
/// Before each call `stats(input).total_processed()` is read. Below `limit`
/// the operation runs and its outcome passes through unchanged. At or above
/// `limit` the operation is dropped without being polled and
/// `op(input, processed)` supplies the outcome.
pub struct Limit<I, O> {
    limit: u64,
    stats: StatsFn<I>,
    op: LimitOp<I, O>,
}

impl<I, O> Limit<I, O> {
    pub fn new<S, F>(limit: u64, stats: S, op: F) -> Self
    where
        S: Fn(&I) -> Arc<Counters> + Send + Sync + 'static,
        F: FnMut(&I, u64) -> Outcome<O> + Send + 'static,
    {
        Self {
            limit,
            stats: Box::new(stats),
            op: Box::new(op),
        }
    }

    /// Limit whose handler answers [`Failure::Limited`]
    pub fn deny<S>(limit: u64, stats: S) -> Self
    where
        S: Fn(&I) -> Arc<Counters> + Send + Sync + 'static,
    {
        Self::new(limit, stats, move |_, _| Err(Failure::Limited { limit }))
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl<I, O> std::fmt::Debug for Limit<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Limit").field("limit", &self.limit).finish()
    }
}

#[async_trait]
impl<I: Sync, O: Send> Policy<I, O> for Limit<I, O> {
    async fn run<'a>(
        &'a mut self,
        input: &'a I,
        operation: BoxFuture<'a, Outcome<O>>,
    ) -> Outcome<O> {
        let processed = (self.stats)(input).total_processed();
        if processed >= self.limit {
            debug!(limit = self.limit, processed = processed, "Limit reached");
            drop(operation);
            return (self.op)(input, processed);
        }
        operation.await
    }
}
