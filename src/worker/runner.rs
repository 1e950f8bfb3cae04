//! # Actor Run Loop
//!
//! One tokio task per actor drains a single mailbox, so the actor's status has
//! exactly one writer and messages are handled strictly in delivery order.
//!
//! ## Architecture
//!
//! ```text
//! ActorHandle ──→ mpsc<Message> ──→ Actor::run ──→ State.handle(action)
//!                       ↑                │
//!                       │                ├─→ Policies ──→ Worker::work(task)
//!                       │                │
//!                       └── Scheduler ←──┴─→ EventPublisher (StatusChanged, TaskFailed, ...)
//!                          (weak mailbox)
//! ```
//!
//! - Control actions go to [`State::handle`]; accepted transitions fire the
//!   matching [`Worker`] hook.
//! - Tasks run only while the actor is Started or Running. Anything else skips
//!   the task and reports [`ActorEvent::TaskSkipped`]. A skipped task is gone;
//!   nothing is buffered for a later Resume.
//! - At most one source pull is pending at a time. Requesting a pull, pausing
//!   or an explicit `Process` supersedes the pending one, and a superseded
//!   pull is dropped when it arrives.
//! - `work` runs inside the configured policies and behind `catch_unwind`.
//!   Failures and panics become [`ActorEvent::TaskFailed`]; only
//!   [`ErrorMode::Strict`] turns them into a transition.
//! - Deferred actions (auto-resume, delays, backoff) hold a weak mailbox
//!   reference and are dropped if the actor is gone.
//! - The loop exits on Stopped or any terminal status, or once every handle
//!   has been dropped.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use super::handle::{ActorHandle, WeakActorHandle};
use super::messages::Message;
use super::source::TaskSource;
use super::task::Task;
use super::traits::{WorkResult, Worker};
use crate::backoff::Backoffs;
use crate::config::{ActorsConfig, ErrorMode, WorkerConfig};
use crate::error::{ActorError, Result};
use crate::events::{ActorEvent, EventPublisher};
use crate::logging::{log_actor_operation, log_error};
use crate::outcome::{Failure, Outcome};
use crate::policy::{Policies, Policy};
use crate::scheduler::{panic_message, DelayScheduler, Scheduler};
use crate::state_machine::{Action, State, Status};
use crate::stats::Counters;

/// A worker bound to its state machine and mailbox
///
/// Tasks pushed through [`ActorHandle::submit`] while the actor is Paused are
/// skipped and lost, including during a pause that will auto-resume. Callers
/// must resubmit them after Resume, or attach a [`TaskSource`] so pending work
/// stays in the source until the actor pulls it.
///
/// Counters record the worker's own outcomes. An outcome a policy produced in
/// place of the worker's (a gated task, a replaced result) only bumps
/// `overridden`.
pub struct Actor<W: Worker> {
    name: String,
    worker: W,
    state: State,
    policies: Policies<Task, WorkResult>,
    source: Option<Arc<dyn TaskSource>>,
    scheduler: Arc<dyn Scheduler>,
    mailbox: WeakActorHandle,
    counters: Arc<Counters>,
    publisher: EventPublisher,
    backoffs: Backoffs,
    settings: WorkerConfig,
    /// Generation of the one live pull, if any
    pending_pull: Option<u64>,
    pull_generation: u64,
}

impl<W: Worker> std::fmt::Debug for Actor<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field("status", &self.state.status())
            .field("policies", &self.policies)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl<W: Worker> Actor<W> {
    pub fn builder(worker: W) -> ActorBuilder<W> {
        ActorBuilder::new(worker)
    }

    async fn run(mut self, mut mailbox: mpsc::Receiver<Message>) {
        info!(actor = %self.name, "Actor run loop started");

        while let Some(message) = mailbox.recv().await {
            if !self.handle_message(message).await {
                break;
            }
        }

        mailbox.close();
        let status = self.state.status();
        log_actor_operation(&self.name, "exit", &status.to_string(), None);
    }

    /// Handle one message; false once the loop should exit
    async fn handle_message(&mut self, message: Message) -> bool {
        match message {
            Message::Control(action) => self.handle_action(action).await,
            Message::Pull { generation } => {
                if self.pending_pull != Some(generation) {
                    debug!(actor = %self.name, generation = generation, "Superseded pull dropped");
                    return true;
                }
                self.handle_action(Action::Process).await
            }
            Message::Delay { seconds, then } => {
                let status = self.state.handle(Action::Delay);
                if !status.is_halted() {
                    self.schedule(then, seconds);
                }
                !status.is_halted()
            }
            Message::Work(task) => {
                self.handle_task(task).await;
                !self.state.status().is_halted()
            }
            Message::Check(reply) => {
                let status = self.state.handle(Action::Check);
                // Caller may have given up waiting
                let _ = reply.send(status);
                !status.is_halted()
            }
        }
    }

    async fn handle_action(&mut self, action: Action) -> bool {
        let before = self.state.status();
        let after = self.state.handle(action);
        let changed = before != after;

        match action {
            Action::Start if changed => {
                self.worker.started().await;
                log_actor_operation(&self.name, "start", &after.to_string(), None);
                if self.source.is_some() {
                    self.request_pull(0);
                }
            }
            Action::Process if after == Status::Running => {
                self.pending_pull = None;
                self.pull_next().await;
            }
            Action::Pause if changed => {
                self.pending_pull = None;
                self.worker.paused("requested").await;
                log_actor_operation(&self.name, "pause", &after.to_string(), None);
                if let Some(seconds) = self.settings.pause_resume_seconds {
                    self.schedule(Action::Resume, seconds);
                }
            }
            Action::Resume if changed => {
                self.worker.resumed("requested").await;
                log_actor_operation(&self.name, "resume", &after.to_string(), None);
                if self.source.is_some() {
                    self.request_pull(0);
                }
            }
            Action::Stop if changed => {
                self.worker.stopped("requested").await;
                log_actor_operation(&self.name, "stop", &after.to_string(), None);
            }
            Action::Kill if changed => {
                self.worker.killed("requested").await;
                log_actor_operation(&self.name, "kill", &after.to_string(), None);
            }
            _ => {}
        }

        !after.is_halted()
    }

    /// Fetch and process the next task from the attached source
    async fn pull_next(&mut self) {
        let Some(source) = self.source.clone() else {
            return;
        };

        match source.next().await {
            Some(task) => {
                self.backoffs.reset();
                self.handle_task(task).await;
            }
            None => {
                let seconds = self.backoffs.next_seconds();
                debug!(
                    actor = %self.name,
                    backoff_seconds = seconds,
                    "Task source empty - backing off"
                );
                self.request_pull(seconds);
            }
        }
    }

    async fn handle_task(&mut self, task: Task) {
        let status = self.state.status();
        if !status.accepts_work() {
            self.counters.inc_skipped();
            warn!(
                actor = %self.name,
                task_id = %task.id,
                status = %status,
                "Actor not accepting work - task skipped"
            );
            self.publisher
                .publish(ActorEvent::task_skipped(self.name.clone(), task.id, status));
            return;
        }

        self.state.begin(true);
        let outcome = self.execute(&task).await;

        match outcome {
            Ok(result) => self.after_work(result).await,
            Err(failure) => self.on_failure(&task, failure).await,
        }
    }

    /// Run `work` under the policies, converting panics into failures
    async fn execute(&mut self, task: &Task) -> Outcome<WorkResult> {
        let observed = Arc::new(Mutex::new(None));
        let operation = recorded(
            self.worker.work(task),
            self.counters.clone(),
            observed.clone(),
        );
        let guarded = self.policies.run(task, operation);

        let outcome = match AssertUnwindSafe(guarded).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic_error) => Err(Failure::Unexpected(format!(
                "policy panicked: {}",
                panic_message(panic_error.as_ref())
            ))),
        };

        if observed.lock().as_ref() != Some(&outcome) {
            self.counters.inc_overridden();
        }
        outcome
    }

    async fn after_work(&mut self, result: WorkResult) {
        match result {
            WorkResult::More | WorkResult::Next => {
                if self.source.is_some() {
                    self.request_pull(0);
                }
            }
            WorkResult::Done => {
                if self.state.complete(true) == Status::Completed {
                    self.worker.completed().await;
                    log_actor_operation(&self.name, "complete", "completed", None);
                }
            }
            WorkResult::Delay(seconds) => self.request_pull(seconds),
        }
    }

    async fn on_failure(&mut self, task: &Task, failure: Failure) {
        error!(
            actor = %self.name,
            task_id = %task.id,
            kind = failure.kind(),
            error = %failure,
            error_mode = %self.settings.error_mode,
            "Work failed"
        );
        self.publisher.publish(ActorEvent::task_failed(
            self.name.clone(),
            task.id.clone(),
            failure.clone(),
        ));
        self.worker.failed(&failure).await;

        if self.settings.error_mode == ErrorMode::Strict {
            if self.state.fail(true) == Status::Failed {
                log_error(&self.name, "work", &failure.to_string(), Some("strict error mode"));
            }
            return;
        }

        if self.source.is_some() {
            match failure {
                Failure::Denied(_) | Failure::Limited { .. } => {
                    let seconds = self.backoffs.next_seconds();
                    self.request_pull(seconds);
                }
                _ => self.request_pull(0),
            }
        }
    }

    /// Re-inject `action` after `seconds` through the scheduler
    fn schedule(&self, action: Action, seconds: u64) {
        self.deliver_later(action, Message::Control(action), seconds);
    }

    /// Queue the next pull after `seconds`, superseding any pull still pending
    fn request_pull(&mut self, seconds: u64) {
        self.pull_generation = self.pull_generation.wrapping_add(1);
        let generation = self.pull_generation;
        self.pending_pull = Some(generation);

        if seconds == 0 {
            match self.mailbox.try_send(Message::Pull { generation }) {
                Ok(()) => return,
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Closed(_)) => {
                    debug!(actor = %self.name, "Mailbox closed - pull dropped");
                    return;
                }
            }
        }
        self.deliver_later(Action::Process, Message::Pull { generation }, seconds);
    }

    fn deliver_later(&self, action: Action, message: Message, seconds: u64) {
        let mailbox = self.mailbox.clone();
        let actor = self.name.clone();

        debug!(
            actor = %self.name,
            action = %action,
            seconds = seconds,
            "Scheduling action"
        );
        self.publisher
            .publish(ActorEvent::scheduled(self.name.clone(), action, seconds));

        self.scheduler.schedule_secs(
            seconds,
            Box::pin(async move {
                if !mailbox.send(message).await {
                    debug!(
                        actor = %actor,
                        action = %action,
                        "Actor gone - scheduled action dropped"
                    );
                }
            }),
        );
    }
}

/// Wrap `work` so its own outcome is counted before any policy sees it
fn recorded<'a>(
    work: BoxFuture<'a, Outcome<WorkResult>>,
    counters: Arc<Counters>,
    observed: Arc<Mutex<Option<Outcome<WorkResult>>>>,
) -> BoxFuture<'a, Outcome<WorkResult>> {
    Box::pin(async move {
        let outcome = match AssertUnwindSafe(work).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic_error) => Err(Failure::Unexpected(format!(
                "work panicked: {}",
                panic_message(panic_error.as_ref())
            ))),
        };
        counters.record(&outcome);
        *observed.lock() = Some(outcome.clone());
        outcome
    })
}

/// Configures and spawns an [`Actor`]
pub struct ActorBuilder<W: Worker> {
    worker: W,
    config: ActorsConfig,
    policies: Policies<Task, WorkResult>,
    source: Option<Arc<dyn TaskSource>>,
    scheduler: Option<Arc<dyn Scheduler>>,
    publisher: Option<EventPublisher>,
    counters: Arc<Counters>,
}

impl<W: Worker> ActorBuilder<W> {
    pub fn new(worker: W) -> Self {
        Self {
            worker,
            config: ActorsConfig::default(),
            policies: Policies::new(),
            source: None,
            scheduler: None,
            publisher: None,
            counters: Arc::new(Counters::new()),
        }
    }

    pub fn with_config(mut self, config: ActorsConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a policy; the first one added is outermost
    pub fn with_policy(mut self, policy: impl Policy<Task, WorkResult> + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    pub fn with_policies(mut self, policies: Policies<Task, WorkResult>) -> Self {
        self.policies = policies;
        self
    }

    /// Pull tasks from `source` on `Process`
    pub fn with_source(mut self, source: Arc<dyn TaskSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Share a scheduler instead of creating one per actor
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Publish events onto an existing channel
    pub fn with_publisher(mut self, publisher: EventPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Counters the actor will record into; hand these to limit and ratio policies
    pub fn counters(&self) -> Arc<Counters> {
        self.counters.clone()
    }

    /// Spawn on the current tokio runtime
    pub fn spawn(self) -> Result<ActorHandle> {
        let runtime = Handle::try_current().map_err(|e| ActorError::NoRuntime(e.to_string()))?;
        self.spawn_on(&runtime)
    }

    pub fn spawn_on(self, runtime: &Handle) -> Result<ActorHandle> {
        self.config.validate()?;

        let ActorBuilder {
            worker,
            config,
            policies,
            source,
            scheduler,
            publisher,
            counters,
        } = self;

        let name = worker.name().to_string();
        let (sender, receiver) = mpsc::channel(config.mailbox.capacity);
        let publisher = publisher.unwrap_or_else(|| EventPublisher::new(config.events.capacity));
        let scheduler: Arc<dyn Scheduler> = match scheduler {
            Some(scheduler) => scheduler,
            None => Arc::new(DelayScheduler::with_handle(
                name.clone(),
                runtime.clone(),
                &config.scheduler,
            )?),
        };

        let state = State::new(name.clone(), publisher.clone());
        let status = state.watch();

        let actor = Actor {
            name: name.clone(),
            worker,
            state,
            policies,
            source,
            scheduler,
            mailbox: WeakActorHandle::from_sender(name.clone(), sender.downgrade()),
            counters: counters.clone(),
            publisher: publisher.clone(),
            backoffs: Backoffs::from(&config.backoff),
            settings: config.worker,
            pending_pull: None,
            pull_generation: 0,
        };

        debug!(actor = %name, mailbox_capacity = config.mailbox.capacity, "Spawning actor");
        runtime.spawn(actor.run(receiver));

        Ok(ActorHandle::new(name, sender, status, counters, publisher))
    }
}
