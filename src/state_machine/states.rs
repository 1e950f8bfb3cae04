use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Initial state when the actor is created
    InActive,
    /// Actor has been started but has not processed anything yet
    Started,
    /// Actor is processing work
    Running,
    /// Actor is suspended and ignores work until resumed
    Paused,
    /// Actor has been stopped
    Stopped,
    /// Actor finished all of its work
    Completed,
    /// Actor failed and cannot continue
    Failed,
    /// Actor was terminated
    Killed,
}

impl Status {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Killed)
    }

    /// Check if the actor can accept work in this state
    pub fn accepts_work(&self) -> bool {
        matches!(self, Self::Started | Self::Running)
    }

    /// Check if the run loop should exit once this state is reached
    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Stopped) || self.is_terminal()
    }

    pub fn all() -> [Status; 8] {
        [
            Self::InActive,
            Self::Started,
            Self::Running,
            Self::Paused,
            Self::Stopped,
            Self::Completed,
            Self::Failed,
            Self::Killed,
        ]
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InActive => write!(f, "inactive"),
            Self::Started => write!(f, "started"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Killed => write!(f, "killed"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inactive" => Ok(Self::InActive),
            "started" => Ok(Self::Started),
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            "stopped" => Ok(Self::Stopped),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "killed" => Ok(Self::Killed),
            _ => Err(format!("Invalid actor status: {s}")),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::InActive
    }
}
