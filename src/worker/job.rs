//! # Job
//!
//! Named group of actors controlled together. A job has no state machine of
//! its own; its status is derived from its members.

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::handle::ActorHandle;
use crate::error::{ActorError, Result};
use crate::state_machine::{Action, Status};

#[derive(Debug)]
pub struct Job {
    name: String,
    actors: DashMap<String, ActorHandle>,
    /// Registration order, used for ordered fan-out and the aggregate status
    order: RwLock<Vec<String>>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actors: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register an actor; names must be unique within the job
    pub fn add(&self, handle: ActorHandle) -> Result<()> {
        let actor = handle.name().to_string();
        let mut order = self.order.write();
        if self.actors.contains_key(&actor) {
            return Err(ActorError::Validation(format!(
                "job '{}' already has an actor named '{actor}'",
                self.name
            )));
        }
        self.actors.insert(actor.clone(), handle);
        order.push(actor);
        Ok(())
    }

    pub fn get(&self, actor: &str) -> Option<ActorHandle> {
        self.actors.get(actor).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Actor names in registration order
    pub fn names(&self) -> Vec<String> {
        self.order.read().clone()
    }

    fn handles(&self) -> Vec<ActorHandle> {
        self.order
            .read()
            .iter()
            .filter_map(|actor| self.get(actor))
            .collect()
    }

    /// Send `action` to every actor in registration order
    ///
    /// Every actor is attempted; the first delivery error is returned.
    pub async fn send_all(&self, action: Action) -> Result<()> {
        debug!(job = %self.name, action = %action, actors = self.len(), "Broadcasting action");

        let mut first_error = None;
        for handle in self.handles() {
            if let Err(err) = handle.control(action).await {
                warn!(
                    job = %self.name,
                    actor = %handle.name(),
                    error = %err,
                    "Action not delivered"
                );
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub async fn start(&self) -> Result<()> {
        self.send_all(Action::Start).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.send_all(Action::Pause).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.send_all(Action::Resume).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.send_all(Action::Stop).await
    }

    pub async fn kill(&self) -> Result<()> {
        self.send_all(Action::Kill).await
    }

    /// `(actor, status)` in registration order
    pub fn statuses(&self) -> Vec<(String, Status)> {
        self.handles()
            .into_iter()
            .map(|handle| (handle.name().to_string(), handle.status()))
            .collect()
    }

    /// Aggregate status
    ///
    /// Completed or Killed when every actor is; Running when any actor runs;
    /// otherwise the first actor's status. An empty job is InActive.
    pub fn status(&self) -> Status {
        aggregate(self.statuses().into_iter().map(|(_, status)| status))
    }
}

fn aggregate(statuses: impl IntoIterator<Item = Status>) -> Status {
    let statuses: Vec<Status> = statuses.into_iter().collect();
    let Some(first) = statuses.first().copied() else {
        return Status::InActive;
    };

    if statuses.iter().all(|s| *s == Status::Completed) {
        Status::Completed
    } else if statuses.iter().all(|s| *s == Status::Killed) {
        Status::Killed
    } else if statuses.contains(&Status::Running) {
        Status::Running
    } else {
        first
    }
}
