//! # Actor Events
//!
//! Status-change and work-failure notifications. Each actor publishes onto an
//! [`EventPublisher`]; subscribers consume asynchronously so a subscriber can
//! react to an event (even by sending a new action) without re-entering the
//! actor that produced it.

pub mod actor_event;
pub mod publisher;

pub use actor_event::ActorEvent;
pub use publisher::EventPublisher;
