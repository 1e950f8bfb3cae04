//! # Outcome Vocabulary
//!
//! Result type shared by workers and policies. An [`Outcome`] is a plain
//! `Result` whose error side classifies why an operation did not succeed.

use serde::{Deserialize, Serialize};

/// Result of an operation wrapped by a policy or executed by a worker
pub type Outcome<T> = Result<T, Failure>;

/// Classified failure of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Failure {
    /// Not permitted to run
    #[error("Denied: {0}")]
    Denied(String),

    /// Deliberately skipped
    #[error("Ignored: {0}")]
    Ignored(String),

    /// Input was invalid
    #[error("Invalid: {0}")]
    Invalid(String),

    /// Operation ran and failed
    #[error("Errored: {0}")]
    Errored(String),

    /// A limit has been reached
    #[error("Limit of {limit} reached")]
    Limited { limit: u64 },

    /// Panics and other conditions nobody planned for
    #[error("Unexpected: {0}")]
    Unexpected(String),
}

impl Failure {
    /// Short name of the failure kind for logging and events
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Denied(_) => "denied",
            Self::Ignored(_) => "ignored",
            Self::Invalid(_) => "invalid",
            Self::Errored(_) => "errored",
            Self::Limited { .. } => "limited",
            Self::Unexpected(_) => "unexpected",
        }
    }

    pub fn errored(message: impl Into<String>) -> Self {
        Self::Errored(message.into())
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Self::Errored(format!("{err:#}"))
    }
}
