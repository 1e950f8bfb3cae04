use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::json;
use tasker_actors::worker::{Actor, Task, WorkResult};
use tasker_actors::{
    ActorEvent, Failure, Interval, Limit, Outcome, Policies, Policy, Ratio, Status,
};

use crate::common::{drain, quiet_config};
use crate::common::workers::{task, task_with, ScriptedWorker};

/// Records entry and exit around the wrapped operation
struct Tracing {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Policy<String, usize> for Tracing {
    async fn run<'a>(
        &'a mut self,
        _input: &'a String,
        operation: BoxFuture<'a, Outcome<usize>>,
    ) -> Outcome<usize> {
        self.log.lock().push(format!("{}:enter", self.label));
        let outcome = operation.await;
        self.log.lock().push(format!("{}:exit", self.label));
        outcome
    }
}

#[tokio::test]
async fn test_chain_wraps_first_policy_outermost() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut policies = Policies::new()
        .with(Tracing {
            label: "outer",
            log: log.clone(),
        })
        .with(Tracing {
            label: "inner",
            log: log.clone(),
        });

    let input = "payload".to_string();
    let op_log = log.clone();
    let operation: BoxFuture<'_, Outcome<usize>> = Box::pin(async {
        op_log.lock().push("operation".to_string());
        Ok(input.len())
    });
    let result = policies.run(&input, operation).await;

    assert_eq!(result, Ok(7));
    assert_eq!(
        *log.lock(),
        vec![
            "outer:enter",
            "inner:enter",
            "operation",
            "inner:exit",
            "outer:exit"
        ]
    );
}

#[tokio::test]
async fn test_interval_on_actor_fires_every_third_task() {
    let fired = Arc::new(AtomicUsize::new(0));
    let hits = fired.clone();
    let handle = Actor::builder(ScriptedWorker::new("interval"))
        .with_config(quiet_config())
        .with_policy(Interval::new(3, move |_: &Task, _: &Outcome<WorkResult>| {
            hits.fetch_add(1, Ordering::SeqCst);
        }))
        .spawn()
        .unwrap();

    handle.start().await.unwrap();
    for i in 0..7 {
        handle.submit(task(&format!("t{i}"))).await.unwrap();
    }
    assert_eq!(handle.check().await, Status::Running);

    assert_eq!(fired.load(Ordering::SeqCst), 2);
    assert_eq!(handle.stats().succeeded, 7);
}

#[tokio::test]
async fn test_ratio_on_actor_denies_then_recovers() {
    let worker = ScriptedWorker::new("ratio");
    let builder = Actor::builder(worker.clone()).with_config(quiet_config());
    let counters = builder.counters();
    let handle = builder
        .with_policy(Ratio::deny(0.5, move |_: &Task| counters.clone()).with_min_sample(2))
        .spawn()
        .unwrap();
    let mut events = handle.subscribe();

    handle.start().await.unwrap();
    handle
        .submit(task_with("f1", json!({"fail": "first"})))
        .await
        .unwrap();
    handle
        .submit(task_with("f2", json!({"fail": "second"})))
        .await
        .unwrap();
    for i in 1..=4 {
        handle.submit(task(&format!("ok{i}"))).await.unwrap();
    }
    assert_eq!(handle.check().await, Status::Running);

    // The operation still runs; only its outcome is replaced
    assert_eq!(worker.worked(), vec!["f1", "f2", "ok1", "ok2", "ok3", "ok4"]);

    let failed: Vec<(String, &'static str)> = drain(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            ActorEvent::TaskFailed {
                task_id, failure, ..
            } => Some((task_id, failure.kind())),
            _ => None,
        })
        .collect();
    // Successes bring the ratio back under the threshold
    assert_eq!(
        failed,
        vec![
            ("f1".to_string(), "errored"),
            ("f2".to_string(), "denied"),
            ("ok1".to_string(), "denied"),
            ("ok2".to_string(), "denied"),
        ]
    );

    let stats = handle.stats();
    assert_eq!(stats.processed, 6);
    assert_eq!(stats.errored, 2);
    assert_eq!(stats.succeeded, 4);
    assert_eq!(stats.denied, 0);
    assert_eq!(stats.overridden, 3);
}

#[tokio::test]
async fn test_limit_outside_interval_hides_gated_calls() {
    let fired = Arc::new(AtomicUsize::new(0));
    let hits = fired.clone();
    let worker = ScriptedWorker::new("gated");
    let builder = Actor::builder(worker.clone()).with_config(quiet_config());
    let counters = builder.counters();
    let policies = Policies::new()
        .with(Limit::new(
            2,
            move |_: &Task| counters.clone(),
            |task: &Task, processed: u64| {
                Err(Failure::Ignored(format!("{} over limit at {processed}", task.id)))
            },
        ))
        .with(Interval::new(1, move |_: &Task, _: &Outcome<WorkResult>| {
            hits.fetch_add(1, Ordering::SeqCst);
        }));
    let handle = builder.with_policies(policies).spawn().unwrap();

    handle.start().await.unwrap();
    for i in 0..5 {
        handle.submit(task(&format!("t{i}"))).await.unwrap();
    }
    assert_eq!(handle.check().await, Status::Running);

    assert_eq!(worker.worked(), vec!["t0", "t1"]);
    assert_eq!(fired.load(Ordering::SeqCst), 2);
    // Gated calls never reach the worker, so only `overridden` sees them
    let stats = handle.stats();
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.ignored, 0);
    assert_eq!(stats.overridden, 3);
    assert_eq!(stats.failures(), 0);
}
