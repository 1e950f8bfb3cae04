use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unit of work handed to an actor
///
/// The actor owns the task while `work` runs and drops it afterwards; retrying
/// is up to whoever produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a task with a generated id
    pub fn new(data: serde_json::Value) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), data)
    }

    pub fn with_id(id: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            data,
            created_at: Utc::now(),
        }
    }

    /// Deserialize the payload into a typed value
    pub fn payload<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.data)
    }
}
