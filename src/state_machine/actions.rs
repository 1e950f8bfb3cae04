use serde::{Deserialize, Serialize};
use std::fmt;

/// Control messages that drive actor status transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Start the actor
    Start,
    /// Begin executing a retrieved task
    Process,
    /// Suspend processing
    Pause,
    /// Continue after a pause
    Resume,
    /// Schedule a future re-injection of another action
    Delay,
    /// Stop the actor
    Stop,
    /// Terminate the actor; accepted from every status
    Kill,
    /// Idempotent status query
    Check,
}

impl Action {
    /// Get a string representation of the action for logging
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Process => "process",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Delay => "delay",
            Self::Stop => "stop",
            Self::Kill => "kill",
            Self::Check => "check",
        }
    }

    pub fn all() -> [Action; 8] {
        [
            Self::Start,
            Self::Process,
            Self::Pause,
            Self::Resume,
            Self::Delay,
            Self::Stop,
            Self::Kill,
            Self::Check,
        ]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_type())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::all()
            .into_iter()
            .find(|action| action.action_type() == s)
            .ok_or_else(|| format!("Invalid action: {s}"))
    }
}
