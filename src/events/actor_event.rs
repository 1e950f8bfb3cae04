use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::Failure;
use crate::state_machine::{Action, Status};

/// Lifecycle notification emitted by an actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActorEvent {
    /// An action was accepted by the state controller
    StatusChanged {
        actor: String,
        action: Action,
        from: Status,
        to: Status,
        at: DateTime<Utc>,
    },
    /// `work(task)` failed or panicked
    TaskFailed {
        actor: String,
        task_id: String,
        failure: Failure,
        at: DateTime<Utc>,
    },
    /// A task arrived while the actor could not accept work
    TaskSkipped {
        actor: String,
        task_id: String,
        status: Status,
        at: DateTime<Utc>,
    },
    /// An action was scheduled for re-injection
    Scheduled {
        actor: String,
        action: Action,
        seconds: u64,
        at: DateTime<Utc>,
    },
}

impl ActorEvent {
    pub fn status_changed(
        actor: impl Into<String>,
        action: Action,
        from: Status,
        to: Status,
    ) -> Self {
        Self::StatusChanged {
            actor: actor.into(),
            action,
            from,
            to,
            at: Utc::now(),
        }
    }

    pub fn task_failed(
        actor: impl Into<String>,
        task_id: impl Into<String>,
        failure: Failure,
    ) -> Self {
        Self::TaskFailed {
            actor: actor.into(),
            task_id: task_id.into(),
            failure,
            at: Utc::now(),
        }
    }

    pub fn task_skipped(
        actor: impl Into<String>,
        task_id: impl Into<String>,
        status: Status,
    ) -> Self {
        Self::TaskSkipped {
            actor: actor.into(),
            task_id: task_id.into(),
            status,
            at: Utc::now(),
        }
    }

    pub fn scheduled(actor: impl Into<String>, action: Action, seconds: u64) -> Self {
        Self::Scheduled {
            actor: actor.into(),
            action,
            seconds,
            at: Utc::now(),
        }
    }

    /// Name of the actor that emitted the event
    pub fn actor(&self) -> &str {
        match self {
            Self::StatusChanged { actor, .. }
            | Self::TaskFailed { actor, .. }
            | Self::TaskSkipped { actor, .. }
            | Self::Scheduled { actor, .. } => actor,
        }
    }

    /// `(action, old, new)` for status changes
    pub fn transition(&self) -> Option<(Action, Status, Status)> {
        match self {
            Self::StatusChanged { action, from, to, .. } => Some((*action, *from, *to)),
            _ => None,
        }
    }

    /// Check if the event reports a work failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::TaskFailed { .. })
    }
}
