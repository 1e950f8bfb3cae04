use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::task::Task;

/// Pull interface an actor fetches tasks from
#[async_trait]
pub trait TaskSource: Send + Sync + 'static {
    /// Next task, or `None` when nothing is available right now
    async fn next(&self) -> Option<Task>;
}

/// In-process FIFO task source
#[derive(Debug, Default)]
pub struct MemoryTaskSource {
    queue: Mutex<VecDeque<Task>>,
}

impl MemoryTaskSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            queue: Mutex::new(tasks.into_iter().collect()),
        }
    }

    pub fn push(&self, task: Task) {
        self.queue.lock().push_back(task);
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

#[async_trait]
impl TaskSource for MemoryTaskSource {
    async fn next(&self) -> Option<Task> {
        self.queue.lock().pop_front()
    }
}
