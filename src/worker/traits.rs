//! # Worker Trait
//!
//! The user-supplied half of an actor. The runtime owns the state machine and
//! mailbox; a [`Worker`] only does the work and optionally reacts to lifecycle
//! changes.
//!
//! ## Lifecycle
//!
//! Hooks fire after the corresponding transition was applied:
//! - `started()`: InActive → Started
//! - `paused()` / `resumed()`: Running ⇄ Paused
//! - `stopped()` / `killed()`: actor is about to exit its run loop
//! - `completed()`: `work` returned [`WorkResult::Done`]
//! - `failed()`: `work` returned an error or panicked
//!
//! All hooks default to no-ops.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::task::Task;
use crate::outcome::{Failure, Outcome};

/// What the actor should do after a successful `work` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkResult {
    /// More work is available; pull again
    More,
    /// This item is finished; move on to the next one
    Next,
    /// All work is finished; the actor completes
    Done,
    /// Pull again after this many seconds
    Delay(u64),
}

impl WorkResult {
    /// Whether the actor should immediately pull another task
    pub fn continues(&self) -> bool {
        matches!(self, WorkResult::More | WorkResult::Next)
    }
}

/// Work performed by an actor
///
/// ## Example
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use tasker_actors::outcome::Outcome;
/// use tasker_actors::worker::{Task, WorkResult, Worker};
///
/// struct Emails {
///     sent: usize,
/// }
///
/// #[async_trait]
/// impl Worker for Emails {
///     fn name(&self) -> &str {
///         "emails"
///     }
///
///     async fn work(&mut self, _task: &Task) -> Outcome<WorkResult> {
///         self.sent += 1;
///         Ok(WorkResult::Next)
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + 'static {
    /// Actor name for logging and events
    fn name(&self) -> &str;

    /// Process one task
    async fn work(&mut self, task: &Task) -> Outcome<WorkResult>;

    async fn started(&mut self) {}

    async fn paused(&mut self, _reason: &str) {}

    async fn resumed(&mut self, _reason: &str) {}

    async fn stopped(&mut self, _reason: &str) {}

    async fn killed(&mut self, _reason: &str) {}

    async fn completed(&mut self) {}

    async fn failed(&mut self, _failure: &Failure) {}
}
