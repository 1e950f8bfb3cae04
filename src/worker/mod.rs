//! # Workers and Actors
//!
//! A [`Worker`] does the work; an [`Actor`] wraps it with a state machine, a
//! mailbox and optional policies and task source; an [`ActorHandle`] is how
//! everyone else talks to it. A [`Job`] groups handles under one name.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use tasker_actors::outcome::Outcome;
//! use tasker_actors::policy::Limit;
//! use tasker_actors::worker::{Actor, MemoryTaskSource, Task, WorkResult, Worker};
//!
//! struct Emails;
//!
//! #[async_trait]
//! impl Worker for Emails {
//!     fn name(&self) -> &str {
//!         "emails"
//!     }
//!
//!     async fn work(&mut self, _task: &Task) -> Outcome<WorkResult> {
//!         Ok(WorkResult::More)
//!     }
//! }
//!
//! # async fn example() -> tasker_actors::Result<()> {
//! let source = Arc::new(MemoryTaskSource::new());
//! let builder = Actor::builder(Emails).with_source(source.clone());
//! let counters = builder.counters();
//! let handle = builder
//!     .with_policy(Limit::deny(1000, move |_: &Task| counters.clone()))
//!     .spawn()?;
//!
//! source.push(Task::new(serde_json::json!({"to": "ops@example.com"})));
//! handle.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod handle;
pub mod job;
pub mod messages;
pub mod runner;
pub mod source;
pub mod task;
pub mod traits;

pub use handle::{ActorHandle, WeakActorHandle};
pub use job::Job;
pub use messages::Message;
pub use runner::{Actor, ActorBuilder};
pub use source::{MemoryTaskSource, TaskSource};
pub use task::Task;
pub use traits::{WorkResult, Worker};
