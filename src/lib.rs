#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Tasker Actors
//!
//! Actor lifecycle and work-scheduling core for Tasker workers.
//!
//! ## Overview
//!
//! An actor is an independently scheduled unit of work with its own lifecycle
//! status. It consumes tasks and control actions from a single mailbox, runs
//! each task through a set of policies, and reports every status change and
//! work failure on an event channel.
//!
//! ## Architecture
//!
//! ```text
//! Action / Task ──→ mailbox ──→ Actor run loop ──→ State (Status × Action → Status)
//!                                    │
//!                                    ├─→ Policies (Interval, Limit, Ratio) ──→ Worker::work
//!                                    ├─→ Scheduler (resume after pause, delays, backoff)
//!                                    └─→ EventPublisher ──→ subscribers
//! ```
//!
//! ## Module Organization
//!
//! - [`state_machine`] - Status, Action, the transition table and the State controller
//! - [`scheduler`] - Deferred, bounded, panic-isolated execution
//! - [`throttle`] - Time-of-day rate classification
//! - [`policy`] - Decision layers wrapped around an operation
//! - [`worker`] - Worker trait, actor run loop, handles and jobs
//! - [`events`] - Actor events and the broadcast publisher
//! - [`config`] - Runtime configuration
//! - [`error`] / [`outcome`] - Runtime errors and work outcomes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use tasker_actors::outcome::Outcome;
//! use tasker_actors::worker::{Actor, Task, WorkResult, Worker};
//! use tasker_actors::Status;
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl Worker for Greeter {
//!     fn name(&self) -> &str {
//!         "greeter"
//!     }
//!
//!     async fn work(&mut self, task: &Task) -> Outcome<WorkResult> {
//!         tracing::info!(task_id = %task.id, "hello");
//!         Ok(WorkResult::Next)
//!     }
//! }
//!
//! # async fn example() -> tasker_actors::Result<()> {
//! tasker_actors::logging::init_structured_logging();
//!
//! let handle = Actor::builder(Greeter).spawn()?;
//! handle.start().await?;
//! handle.submit(Task::new(serde_json::json!({"name": "world"}))).await?;
//! assert_eq!(handle.check().await, Status::Running);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! cargo bench --features benchmarks
//! ```

pub mod backoff;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod outcome;
pub mod policy;
pub mod scheduler;
pub mod state_machine;
pub mod stats;
pub mod throttle;
pub mod worker;

pub use config::{ActorsConfig, ErrorMode};
pub use error::{ActorError, Result};
pub use events::{ActorEvent, EventPublisher};
pub use outcome::{Failure, Outcome};
pub use policy::{Interval, Limit, Policies, Policy, Ratio};
pub use scheduler::{DelayScheduler, Scheduler};
pub use state_machine::{transition, Action, State, Status};
pub use stats::{CounterSnapshot, Counters};
pub use throttle::{Rate, Span, Throttle, Throttles};
pub use worker::{Actor, ActorHandle, Job, Task, WorkResult, Worker};
