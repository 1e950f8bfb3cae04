//! # Policies
//!
//! A policy wraps an operation that produces an [`Outcome`] and decides
//! whether to trigger a secondary action around it.
//!
//! - [`Interval`] fires a side operation every `limit` calls and never alters
//!   the outcome.
//! - [`Limit`] gates on an external processed counter: once the counter has
//!   reached the limit, the wrapped operation is not run and the policy's
//!   handler produces the outcome instead.
//! - [`Ratio`] inspects the failure ratio after the operation and may replace
//!   the outcome.
//!
//! The wrapped operation is passed as a lazy future so a gate can decline to
//! poll it. Policies compose with [`chain`] or the owning [`Policies`] list.

pub mod interval;
pub mod limit;
pub mod ratio;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::outcome::Outcome;

pub use interval::Interval;
pub use limit::Limit;
pub use ratio::Ratio;

/// Decision layer around one operation
#[async_trait]
pub trait Policy<I: Sync, O: Send>: Send {
    /// Run `operation` for `input` under this policy
    async fn run<'a>(
        &'a mut self,
        input: &'a I,
        operation: BoxFuture<'a, Outcome<O>>,
    ) -> Outcome<O>;
}

/// Nest `policies` around `operation`, the first policy outermost
pub fn chain<'a, I, O>(
    policies: &'a mut [Box<dyn Policy<I, O>>],
    input: &'a I,
    operation: BoxFuture<'a, Outcome<O>>,
) -> BoxFuture<'a, Outcome<O>>
where
    I: Sync + 'a,
    O: Send + 'a,
{
    match policies.split_first_mut() {
        None => operation,
        Some((outer, rest)) => {
            let inner = chain(rest, input, operation);
            Box::pin(async move { outer.run(input, inner).await })
        }
    }
}

/// Ordered list of policies applied as one
pub struct Policies<I, O> {
    items: Vec<Box<dyn Policy<I, O>>>,
}

impl<I: Sync, O: Send> Policies<I, O> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a policy; later policies sit closer to the operation
    pub fn with(mut self, policy: impl Policy<I, O> + 'static) -> Self {
        self.items.push(Box::new(policy));
        self
    }

    pub fn push(&mut self, policy: Box<dyn Policy<I, O>>) {
        self.items.push(policy);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<I: Sync, O: Send> Default for Policies<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> std::fmt::Debug for Policies<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Policies")
            .field("len", &self.items.len())
            .finish()
    }
}

#[async_trait]
impl<I: Sync, O: Send> Policy<I, O> for Policies<I, O> {
    async fn run<'a>(
        &'a mut self,
        input: &'a I,
        operation: BoxFuture<'a, Outcome<O>>,
    ) -> Outcome<O> {
        chain(&mut self.items, input, operation).await
    }
}
