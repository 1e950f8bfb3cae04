//! # Error Types
//!
//! Errors surfaced by the actor runtime itself. Failures produced by worker
//! code travel through [`crate::outcome::Failure`] and the event channel
//! instead, so they never cross an actor boundary as an `Err`.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    /// The actor's mailbox has been closed (the run loop exited).
    #[error("Mailbox closed for actor {actor}")]
    MailboxClosed { actor: String },

    /// No tokio runtime was available to host a component.
    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for ActorError {
    fn from(err: config::ConfigError) -> Self {
        ActorError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ActorError>;
