use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tasker_actors::worker::{Actor, MemoryTaskSource, TaskSource};
use tasker_actors::{Action, ActorEvent, ActorHandle, Limit, Status, Task};

use crate::common::workers::{task, task_with, ScriptedWorker};
use crate::common::{eventually, quiet_config, wait_for_event};

/// Start with a source re-injects Process behind any queued messages
async fn running(handle: &ActorHandle) {
    let status = tokio::time::timeout(
        Duration::from_secs(2),
        handle.wait_for(|s| s == Status::Running),
    )
    .await
    .expect("actor never began running");
    assert_eq!(status, Status::Running);
}

/// Always-empty source that counts how often it is polled
#[derive(Debug, Default)]
struct CountingSource {
    polls: AtomicUsize,
}

impl CountingSource {
    fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskSource for CountingSource {
    async fn next(&self) -> Option<Task> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        None
    }
}

async fn spawn_counting(name: &str) -> (ActorHandle, Arc<CountingSource>) {
    let source = Arc::new(CountingSource::default());
    let handle = Actor::builder(ScriptedWorker::new(name))
        .with_config(quiet_config())
        .with_source(source.clone())
        .spawn()
        .unwrap();
    handle.start().await.unwrap();
    running(&handle).await;
    (handle, source)
}

/// Polls of an empty source over 3.5s with a one second backoff
async fn polls_over_window(source: &CountingSource) -> usize {
    let before = source.polls();
    tokio::time::sleep(Duration::from_millis(3500)).await;
    source.polls() - before
}

#[tokio::test]
async fn test_pause_resume_cycles_keep_one_pull_loop() {
    let (handle, source) = spawn_counting("cycled").await;

    for _ in 0..5 {
        handle.pause().await.unwrap();
        assert_eq!(handle.check().await, Status::Paused);
        handle.resume().await.unwrap();
        assert_eq!(handle.check().await, Status::Running);
    }

    let polls = polls_over_window(&source).await;
    assert!(polls <= 5, "{polls} polls in 3.5s; backoff pulls are piling up");
    assert!(polls >= 2, "{polls} polls in 3.5s; the pull loop stopped");
}

#[tokio::test]
async fn test_repeated_process_keeps_one_pull_loop() {
    let (handle, source) = spawn_counting("prodded").await;

    for _ in 0..5 {
        handle.process().await.unwrap();
    }
    assert_eq!(handle.check().await, Status::Running);

    let polls = polls_over_window(&source).await;
    assert!(polls <= 5, "{polls} polls in 3.5s; backoff pulls are piling up");
    assert!(polls >= 2, "{polls} polls in 3.5s; the pull loop stopped");
}

#[tokio::test]
async fn test_start_pulls_until_source_is_empty() {
    let source = Arc::new(MemoryTaskSource::with_tasks(vec![
        task_with("a", json!({"result": "more"})),
        task("b"),
        task_with("c", json!({"result": "more"})),
    ]));
    let worker = ScriptedWorker::new("puller");
    let handle = Actor::builder(worker.clone())
        .with_config(quiet_config())
        .with_source(source.clone())
        .spawn()
        .unwrap();
    let mut events = handle.subscribe();

    handle.start().await.unwrap();

    let backoff = wait_for_event(&mut events, |e| {
        matches!(e, ActorEvent::Scheduled { action: Action::Process, .. })
    })
    .await;
    assert!(matches!(backoff, ActorEvent::Scheduled { seconds: 1, .. }));

    assert_eq!(worker.worked(), vec!["a", "b", "c"]);
    assert!(source.is_empty());
    assert_eq!(handle.status(), Status::Running);
}

#[tokio::test]
async fn test_backoff_picks_up_late_tasks() {
    let source = Arc::new(MemoryTaskSource::new());
    let worker = ScriptedWorker::new("late");
    let handle = Actor::builder(worker.clone())
        .with_config(quiet_config())
        .with_source(source.clone())
        .spawn()
        .unwrap();

    handle.start().await.unwrap();
    running(&handle).await;

    source.push(task("arrived-late"));
    let seen = worker.clone();
    assert!(
        eventually(Duration::from_secs(3), move || !seen.worked().is_empty()).await,
        "backoff never polled the source again"
    );
    assert_eq!(worker.worked(), vec!["arrived-late"]);
}

#[tokio::test]
async fn test_done_leaves_remaining_tasks() {
    let source = Arc::new(MemoryTaskSource::with_tasks(vec![
        task("first"),
        task_with("second", json!({"result": "done"})),
        task("third"),
    ]));
    let worker = ScriptedWorker::new("finisher");
    let handle = Actor::builder(worker.clone())
        .with_config(quiet_config())
        .with_source(source.clone())
        .spawn()
        .unwrap();

    handle.start().await.unwrap();

    let status = tokio::time::timeout(Duration::from_secs(2), handle.wait_for(|s| s.is_terminal()))
        .await
        .unwrap();
    assert_eq!(status, Status::Completed);
    assert_eq!(worker.worked(), vec!["first", "second"]);
    assert_eq!(source.len(), 1);
}

#[tokio::test]
async fn test_limit_policy_gates_work() {
    let source = Arc::new(MemoryTaskSource::with_tasks(
        (0..4).map(|i| task(&format!("t{i}"))),
    ));
    let worker = ScriptedWorker::new("limited");
    let builder = Actor::builder(worker.clone())
        .with_config(quiet_config())
        .with_source(source.clone());
    let counters = builder.counters();
    let handle = builder
        .with_policy(Limit::deny(2, move |_: &Task| counters.clone()))
        .spawn()
        .unwrap();
    let mut events = handle.subscribe();

    handle.start().await.unwrap();

    let denied = wait_for_event(&mut events, ActorEvent::is_failure).await;
    assert!(matches!(denied, ActorEvent::TaskFailed { ref task_id, .. } if task_id == "t2"));

    // Gated tasks are consumed without reaching the worker
    assert_eq!(worker.worked(), vec!["t0", "t1"]);
    let stats = handle.stats();
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.denied, 0);
    assert!(stats.overridden >= 1);
    assert_eq!(handle.status(), Status::Running);

    handle.kill().await.unwrap();
}

#[tokio::test]
async fn test_pause_stops_pulling_and_resume_continues() {
    let source = Arc::new(MemoryTaskSource::new());
    let worker = ScriptedWorker::new("pausable");
    let handle = Actor::builder(worker.clone())
        .with_config(quiet_config())
        .with_source(source.clone())
        .spawn()
        .unwrap();

    handle.start().await.unwrap();
    running(&handle).await;
    handle.pause().await.unwrap();
    assert_eq!(handle.check().await, Status::Paused);

    source.push(task_with("queued", json!({"result": "more"})));
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(worker.worked().is_empty(), "paused actor pulled work");

    handle.resume().await.unwrap();
    let seen = worker.clone();
    assert!(eventually(Duration::from_secs(2), move || !seen.worked().is_empty()).await);
    assert_eq!(worker.worked(), vec!["queued"]);
}
