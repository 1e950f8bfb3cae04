use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::debug;

use super::messages::Message;
use super::task::Task;
use crate::error::{ActorError, Result};
use crate::events::{ActorEvent, EventPublisher};
use crate::state_machine::{Action, Status};
use crate::stats::{CounterSnapshot, Counters};

/// Cloneable handle to a running actor
///
/// Sending goes through the actor's mailbox. Reading status and counters does
/// not; those come from shared snapshots the run loop keeps current. The run
/// loop exits once every handle is dropped.
#[derive(Debug, Clone)]
pub struct ActorHandle {
    name: String,
    sender: mpsc::Sender<Message>,
    status: watch::Receiver<Status>,
    counters: Arc<Counters>,
    publisher: EventPublisher,
}

impl ActorHandle {
    pub(crate) fn new(
        name: String,
        sender: mpsc::Sender<Message>,
        status: watch::Receiver<Status>,
        counters: Arc<Counters>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            name,
            sender,
            status,
            counters,
            publisher,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest status applied by the run loop
    pub fn status(&self) -> Status {
        *self.status.borrow()
    }

    /// Deliver a message, waiting for mailbox capacity
    pub async fn send(&self, message: Message) -> Result<()> {
        debug!(actor = %self.name, kind = message.kind(), "Sending message");
        self.sender
            .send(message)
            .await
            .map_err(|_| ActorError::MailboxClosed {
                actor: self.name.clone(),
            })
    }

    pub async fn control(&self, action: Action) -> Result<()> {
        self.send(Message::Control(action)).await
    }

    pub async fn start(&self) -> Result<()> {
        self.control(Action::Start).await
    }

    /// Apply `Process`; with a task source attached this starts pulling
    pub async fn process(&self) -> Result<()> {
        self.control(Action::Process).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.control(Action::Pause).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.control(Action::Resume).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.control(Action::Stop).await
    }

    pub async fn kill(&self) -> Result<()> {
        self.control(Action::Kill).await
    }

    /// Apply `Delay` now and re-inject `then` after `seconds`
    pub async fn delay(&self, seconds: u64, then: Action) -> Result<()> {
        self.send(Message::Delay { seconds, then }).await
    }

    /// Hand a task to the actor
    pub async fn submit(&self, task: Task) -> Result<()> {
        self.send(Message::Work(task)).await
    }

    /// Probe the actor after everything queued before this call
    ///
    /// Always succeeds: once the run loop has exited the last applied status
    /// is returned.
    pub async fn check(&self) -> Status {
        let (reply, response) = oneshot::channel();
        if self.send(Message::Check(reply)).await.is_err() {
            return self.status();
        }
        response.await.unwrap_or_else(|_| self.status())
    }

    /// Wait until the status satisfies `predicate`
    ///
    /// Returns the last known status if the actor exits first.
    pub async fn wait_for(&self, predicate: impl Fn(Status) -> bool) -> Status {
        let mut status = self.status.clone();
        let reached = status
            .wait_for(|current| predicate(*current))
            .await
            .map(|current| *current);
        reached.unwrap_or_else(|_| *status.borrow())
    }

    /// Shared counters for limit and ratio policies
    pub fn counters(&self) -> Arc<Counters> {
        self.counters.clone()
    }

    pub fn stats(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// Receive this actor's events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ActorEvent> {
        self.publisher.subscribe()
    }

    /// Whether the run loop has exited
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Handle that does not keep the actor alive
    pub fn downgrade(&self) -> WeakActorHandle {
        WeakActorHandle {
            name: self.name.clone(),
            sender: self.sender.downgrade(),
        }
    }
}

/// Non-owning mailbox reference
///
/// Used by deferred operations: if the actor is gone by the time they run,
/// upgrading fails and the operation does nothing.
#[derive(Debug, Clone)]
pub struct WeakActorHandle {
    name: String,
    sender: mpsc::WeakSender<Message>,
}

impl WeakActorHandle {
    pub(crate) fn from_sender(name: String, sender: mpsc::WeakSender<Message>) -> Self {
        Self { name, sender }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deliver `message` if the actor is still alive; false if it was dropped
    pub async fn send(&self, message: Message) -> bool {
        match self.sender.upgrade() {
            Some(sender) => sender.send(message).await.is_ok(),
            None => false,
        }
    }

    /// Deliver without waiting for mailbox capacity
    pub fn try_send(
        &self,
        message: Message,
    ) -> std::result::Result<(), mpsc::error::TrySendError<Message>> {
        match self.sender.upgrade() {
            Some(sender) => sender.try_send(message),
            None => Err(mpsc::error::TrySendError::Closed(message)),
        }
    }
}
