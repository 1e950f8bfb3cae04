use std::time::Duration;

use serde_json::json;
use tasker_actors::worker::Actor;
use tasker_actors::{ActorError, ActorHandle, Job, Status};

use crate::common::quiet_config;
use crate::common::workers::{task_with, ScriptedWorker};

fn spawn(name: &str) -> ActorHandle {
    Actor::builder(ScriptedWorker::new(name))
        .with_config(quiet_config())
        .spawn()
        .unwrap()
}

#[tokio::test]
async fn test_job_fans_out_in_registration_order() {
    let job = Job::new("nightly");
    for name in ["emails", "reports", "cleanup"] {
        job.add(spawn(name)).unwrap();
    }
    assert_eq!(job.names(), vec!["emails", "reports", "cleanup"]);
    assert_eq!(job.status(), Status::InActive);

    job.start().await.unwrap();
    for name in job.names() {
        let handle = job.get(&name).unwrap();
        assert_eq!(handle.check().await, Status::Started);
    }

    let statuses = job.statuses();
    assert_eq!(statuses.len(), 3);
    assert!(statuses.iter().all(|(_, status)| *status == Status::Started));
}

#[tokio::test]
async fn test_job_completes_when_every_actor_completes() {
    let job = Job::new("batch");
    job.add(spawn("first")).unwrap();
    job.add(spawn("second")).unwrap();
    job.start().await.unwrap();

    let first = job.get("first").unwrap();
    first
        .submit(task_with("a", json!({"result": "done"})))
        .await
        .unwrap();
    first.wait_for(|s| s.is_terminal()).await;
    assert_ne!(job.status(), Status::Completed);

    let second = job.get("second").unwrap();
    second
        .submit(task_with("b", json!({"result": "done"})))
        .await
        .unwrap();
    tokio::time::timeout(Duration::from_secs(2), second.wait_for(|s| s.is_terminal()))
        .await
        .unwrap();

    assert_eq!(job.status(), Status::Completed);
}

#[tokio::test]
async fn test_duplicate_actor_name_is_rejected() {
    let job = Job::new("dupes");
    job.add(spawn("worker")).unwrap();

    let err = job.add(spawn("worker")).unwrap_err();
    assert!(matches!(err, ActorError::Validation(_)));
    assert_eq!(job.len(), 1);
}

#[tokio::test]
async fn test_killed_job_rejects_further_actions() {
    let job = Job::new("doomed");
    job.add(spawn("one")).unwrap();
    job.add(spawn("two")).unwrap();

    job.start().await.unwrap();
    job.kill().await.unwrap();
    for name in job.names() {
        job.get(&name).unwrap().wait_for(|s| s == Status::Killed).await;
    }

    assert_eq!(job.status(), Status::Killed);
    assert!(matches!(
        job.resume().await,
        Err(ActorError::MailboxClosed { .. })
    ));
}
