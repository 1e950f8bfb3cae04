//! # Event Publisher
//!
//! Broadcast fan-out for [`ActorEvent`]s. Publishing never waits: slow
//! subscribers lag and skip ahead rather than holding up the actor.
//!
//! ## Usage
//!
//! ```rust
//! use tasker_actors::events::{ActorEvent, EventPublisher};
//! use tasker_actors::{Action, Status};
//!
//! # tokio_test::block_on(async {
//! let publisher = EventPublisher::new(16);
//! let mut events = publisher.subscribe();
//!
//! publisher.publish(ActorEvent::status_changed(
//!     "emails",
//!     Action::Start,
//!     Status::InActive,
//!     Status::Started,
//! ));
//!
//! let event = events.recv().await.unwrap();
//! assert_eq!(event.transition(), Some((Action::Start, Status::InActive, Status::Started)));
//! # });
//! ```

use tokio::sync::broadcast;

use super::actor_event::ActorEvent;

/// Fan-out publisher for actor lifecycle events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<ActorEvent>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event without waiting on subscribers
    pub fn publish(&self, event: ActorEvent) {
        // For broadcast channels, send() returns an error if there are no subscribers
        // In our case, this is acceptable - we want to publish events even if no one is listening
        if self.sender.send(event).is_err() {
            tracing::trace!("No event subscribers");
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ActorEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000) // Default capacity of 1000 events
    }
}
