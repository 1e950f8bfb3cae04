//! # Actor Runtime Configuration
//!
//! Knobs for the actor runtime: mailbox and event buffer sizes, the scheduler
//! pool bound, worker behaviour on pause and failure, empty-queue backoff, and
//! the throttle table.
//!
//! Every section has working defaults, so an empty configuration is valid.
//! Sources are layered by [`loader`]: an optional file, then `ACTORS__*`
//! environment overrides.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tasker_actors::config::ActorsConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Defaults plus ACTORS__SECTION__KEY overrides
//! let config = ActorsConfig::from_env()?;
//!
//! let pool = config.scheduler.max_concurrent;
//! let resume_after = config.worker.pause_resume_seconds;
//! # Ok(())
//! # }
//! ```

pub mod loader;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ActorError, Result};
use crate::throttle::Throttles;

pub use loader::{detect_environment, ENV_PREFIX};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ActorsConfig {
    pub mailbox: MailboxConfig,
    pub events: EventsConfig,
    pub scheduler: SchedulerConfig,
    pub worker: WorkerConfig,
    pub backoff: BackoffConfig,
    pub throttles: Throttles,
}

/// Per-actor mailbox settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailboxConfig {
    /// Messages buffered before `send` waits
    pub capacity: usize,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// Notification channel settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast buffer; slow subscribers lag past this many events
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

/// Deferred execution pool settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Operations allowed to execute at the same time
    pub max_concurrent: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { max_concurrent: 8 }
    }
}

/// Worker behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Schedule a Resume this many seconds after an accepted Pause
    pub pause_resume_seconds: Option<u64>,
    pub error_mode: ErrorMode,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            pause_resume_seconds: Some(30),
            error_mode: ErrorMode::default(),
        }
    }
}

/// How a worker reacts to a failed `work` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Report the failure and keep running
    #[default]
    Flexible,
    /// Report the failure and move Running → Failed
    Strict,
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMode::Flexible => write!(f, "flexible"),
            ErrorMode::Strict => write!(f, "strict"),
        }
    }
}

/// Exponential backoff applied while a task source is empty
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub base_seconds: u64,
    pub max_seconds: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_seconds: 2,
            max_seconds: 300,
        }
    }
}

impl ActorsConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.mailbox.capacity == 0 {
            return Err(invalid("mailbox.capacity", "capacity must be greater than 0"));
        }

        if self.events.capacity == 0 {
            return Err(invalid("events.capacity", "capacity must be greater than 0"));
        }

        if self.scheduler.max_concurrent == 0 {
            return Err(invalid(
                "scheduler.max_concurrent",
                "pool size must be greater than 0",
            ));
        }

        if self.backoff.base_seconds == 0 {
            return Err(invalid(
                "backoff.base_seconds",
                "base delay must be greater than 0",
            ));
        }

        if self.backoff.max_seconds < self.backoff.base_seconds {
            return Err(invalid(
                "backoff.max_seconds",
                "max delay must not be less than base_seconds",
            ));
        }

        self.throttles.validate()
    }
}

fn invalid(field: &str, reason: &str) -> ActorError {
    ActorError::Validation(format!("{field}: {reason}"))
}
