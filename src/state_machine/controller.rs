use tokio::sync::watch;
use tracing::debug;

use super::actions::Action;
use super::states::Status;
use super::transitions::transition;
use crate::events::{ActorEvent, EventPublisher};

/// Owns one actor's status and applies actions to it
///
/// Mutation requires `&mut self`, so the owning run loop is the only writer.
/// Readers hold a [`watch::Receiver`] and always see a complete snapshot.
/// Every accepted action publishes [`ActorEvent::StatusChanged`], including
/// inapplicable ones (old == new). Once killed, only `Check` is accepted.
#[derive(Debug)]
pub struct State {
    actor: String,
    status: watch::Sender<Status>,
    publisher: EventPublisher,
}

impl State {
    /// Create a controller in [`Status::InActive`]
    pub fn new(actor: impl Into<String>, publisher: EventPublisher) -> Self {
        let (status, _) = watch::channel(Status::InActive);
        Self {
            actor: actor.into(),
            status,
            publisher,
        }
    }

    /// Current status snapshot
    pub fn status(&self) -> Status {
        *self.status.borrow()
    }

    /// Read-only view of the status for other tasks
    pub fn watch(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Apply `action` and return the resulting status
    pub fn handle(&mut self, action: Action) -> Status {
        let current = self.status();
        if current == Status::Killed && action != Action::Check {
            debug!(
                actor = %self.actor,
                action = %action,
                "Rejected action for killed actor"
            );
            return current;
        }

        let next = transition(current, action);
        self.apply(action, current, next, true)
    }

    /// Move Started → Running with `Process` semantics
    pub fn begin(&mut self, notify: bool) -> Status {
        self.convenience(Action::Process, Status::Started, Status::Running, notify)
    }

    /// Move Running → Completed
    pub fn complete(&mut self, notify: bool) -> Status {
        self.convenience(Action::Process, Status::Running, Status::Completed, notify)
    }

    /// Move Running → Failed
    pub fn fail(&mut self, notify: bool) -> Status {
        self.convenience(Action::Process, Status::Running, Status::Failed, notify)
    }

    fn convenience(&mut self, action: Action, from: Status, to: Status, notify: bool) -> Status {
        let current = self.status();
        if current != from {
            return current;
        }
        self.apply(action, current, to, notify)
    }

    fn apply(&mut self, action: Action, from: Status, to: Status, notify: bool) -> Status {
        if from != to {
            self.status.send_replace(to);
        }

        debug!(
            actor = %self.actor,
            action = %action,
            from = %from,
            to = %to,
            "Status transition"
        );

        if notify {
            self.publisher
                .publish(ActorEvent::status_changed(self.actor.clone(), action, from, to));
        }
        to
    }
}
