//! Mailbox message types.
//!
//! Everything an actor reacts to arrives through one ordered channel, so
//! control actions and tasks are handled strictly in delivery order.

use tokio::sync::oneshot;

use super::task::Task;
use crate::state_machine::{Action, Status};

#[derive(Debug)]
pub enum Message {
    /// Apply a control action
    Control(Action),
    /// Pull from the task source; ignored unless `generation` is the
    /// actor's pending pull
    Pull { generation: u64 },
    /// Apply `Delay`, then re-inject `then` after `seconds`
    Delay { seconds: u64, then: Action },
    /// Process a task
    Work(Task),
    /// Apply `Check` and reply with the resulting status
    Check(oneshot::Sender<Status>),
}

impl Message {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Control(_) => "control",
            Message::Pull { .. } => "pull",
            Message::Delay { .. } => "delay",
            Message::Work(_) => "work",
            Message::Check(_) => "check",
        }
    }
}
