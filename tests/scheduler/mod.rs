use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tasker_actors::config::SchedulerConfig;
use tasker_actors::worker::{Actor, Message};
use tasker_actors::{Action, DelayScheduler, Scheduler, Status};

use crate::common::quiet_config;
use crate::common::workers::ScriptedWorker;

fn scheduler(max_concurrent: usize) -> DelayScheduler {
    DelayScheduler::new("integration", &SchedulerConfig { max_concurrent }).unwrap()
}

#[tokio::test]
async fn test_operation_runs_no_earlier_than_delay() {
    let scheduler = scheduler(2);
    let (tx, rx) = tokio::sync::oneshot::channel();
    let scheduled_at = Instant::now();

    scheduler.schedule_secs(
        1,
        Box::pin(async move {
            let _ = tx.send(Instant::now());
        }),
    );

    let ran_at = tokio::time::timeout(Duration::from_secs(3), rx)
        .await
        .unwrap()
        .unwrap();
    assert!(ran_at.duration_since(scheduled_at) >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_delays_do_not_block_each_other() {
    let scheduler = scheduler(2);
    let done = Arc::new(AtomicUsize::new(0));
    let started = Instant::now();

    for _ in 0..10 {
        let done = done.clone();
        scheduler.schedule_fn(Duration::from_millis(500), move || async move {
            done.fetch_add(1, Ordering::SeqCst);
        });
    }

    let deadline = Instant::now() + Duration::from_secs(3);
    while done.load(Ordering::SeqCst) < 10 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(done.load(Ordering::SeqCst), 10);
    // Ten sequential waits would take five seconds
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_weak_handle_is_noop_after_actor_is_dropped() {
    let handle = Actor::builder(ScriptedWorker::new("ephemeral"))
        .with_config(quiet_config())
        .spawn()
        .unwrap();
    let weak = handle.downgrade();
    assert!(weak.send(Message::Control(Action::Start)).await);

    drop(handle);
    assert!(!weak.send(Message::Control(Action::Start)).await);
}

#[tokio::test]
async fn test_shared_scheduler_serves_several_actors() {
    let shared = Arc::new(scheduler(4));
    let first = Actor::builder(ScriptedWorker::new("first"))
        .with_config(quiet_config())
        .with_scheduler(shared.clone())
        .spawn()
        .unwrap();
    let second = Actor::builder(ScriptedWorker::new("second"))
        .with_config(quiet_config())
        .with_scheduler(shared.clone())
        .spawn()
        .unwrap();

    first.delay(1, Action::Start).await.unwrap();
    second.delay(1, Action::Start).await.unwrap();

    for handle in [&first, &second] {
        let status = tokio::time::timeout(
            Duration::from_secs(3),
            handle.wait_for(|s| s == Status::Started),
        )
        .await
        .unwrap();
        assert_eq!(status, Status::Started);
    }

    let stats = shared.stats();
    assert_eq!(stats.scheduled, 2);
    assert_eq!(stats.panicked, 0);
}
