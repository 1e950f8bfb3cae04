use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tasker_actors::worker::{Task, WorkResult, Worker};
use tasker_actors::{Failure, Outcome};

/// Worker whose behaviour per task is read from the task payload
///
/// - `{"fail": "message"}` returns `Failure::Errored`
/// - `{"panic": true}` panics
/// - `{"result": "more" | "next" | "done"}` or `{"delay": seconds}`
/// - anything else returns `WorkResult::Next`
#[derive(Clone)]
pub struct ScriptedWorker {
    name: String,
    pub worked: Arc<Mutex<Vec<String>>>,
    pub hooks: Arc<Mutex<Vec<String>>>,
}

impl ScriptedWorker {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            worked: Arc::new(Mutex::new(Vec::new())),
            hooks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn worked(&self) -> Vec<String> {
        self.worked.lock().clone()
    }

    pub fn hooks(&self) -> Vec<String> {
        self.hooks.lock().clone()
    }

    fn hook(&self, name: &str) {
        self.hooks.lock().push(name.to_string());
    }
}

#[async_trait]
impl Worker for ScriptedWorker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn work(&mut self, task: &Task) -> Outcome<WorkResult> {
        self.worked.lock().push(task.id.clone());

        if task.data.get("panic").and_then(Value::as_bool) == Some(true) {
            panic!("scripted panic in {}", task.id);
        }
        if let Some(message) = task.data.get("fail").and_then(Value::as_str) {
            return Err(Failure::errored(message));
        }
        if let Some(seconds) = task.data.get("delay").and_then(Value::as_u64) {
            return Ok(WorkResult::Delay(seconds));
        }

        match task.data.get("result").and_then(Value::as_str) {
            Some("more") => Ok(WorkResult::More),
            Some("done") => Ok(WorkResult::Done),
            _ => Ok(WorkResult::Next),
        }
    }

    async fn started(&mut self) {
        self.hook("started");
    }

    async fn paused(&mut self, _reason: &str) {
        self.hook("paused");
    }

    async fn resumed(&mut self, _reason: &str) {
        self.hook("resumed");
    }

    async fn stopped(&mut self, _reason: &str) {
        self.hook("stopped");
    }

    async fn killed(&mut self, _reason: &str) {
        self.hook("killed");
    }

    async fn completed(&mut self) {
        self.hook("completed");
    }

    async fn failed(&mut self, failure: &Failure) {
        self.hook(&format!("failed:{}", failure.kind()));
    }
}

pub fn task(id: &str) -> Task {
    Task::with_id(id, json!({}))
}

pub fn task_with(id: &str, data: Value) -> Task {
    Task::with_id(id, data)
}
