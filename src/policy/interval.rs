use async_trait::async_trait;
use futures::future::BoxFuture;

use super::Policy;
use crate::outcome::Outcome;

type IntervalOp<I, O> = Box<dyn FnMut(&I, &Outcome<O>) + Send>;

/// Fires `op(input, outcome)` every `limit` calls
///
/// The counter increments after each run; on reaching `limit` the side
/// operation fires and the counter resets to zero. The outcome is returned
/// untouched.
pub struct Interval<I, O> {
    limit: u64,
    counter: u64,
    op: IntervalOp<I, O>,
}

impl<I, O> Interval<I, O> {
    pub fn new<F>(limit: u64, op: F) -> Self
    where
        F: FnMut(&I, &Outcome<O>) + Send + 'static,
    {
        Self {
            limit: limit.max(1),
            counter: 0,
            op: Box::new(op),
        }
    }

    /// Calls since the side operation last fired
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl<I, O> std::fmt::Debug for Interval<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interval")
            .field("limit", &self.limit)
            .field("counter", &self.counter)
            .finish()
    }
}

#[async_trait]
impl<I: Sync, O: Send> Policy<I, O> for Interval<I, O> {
    async fn run<'a>(
        &'a mut self,
        input: &'a I,
        operation: BoxFuture<'a, Outcome<O>>,
    ) -> Outcome<O> {
        let outcome = operation.await;
        self.counter += 1;
        if self.counter >= self.limit {
            (self.op)(input, &outcome);
            self.counter = 0;
        }
        outcome
    }
}
