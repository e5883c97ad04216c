use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;

use whisper_relay::application::ports::{JobRegistry, RegistryError};
use whisper_relay::application::services::JobRetention;
use whisper_relay::domain::{JobId, JobStatus};
use whisper_relay::infrastructure::persistence::InMemoryJobRegistry;

#[tokio::test]
async fn given_new_job_when_created_then_get_returns_pending() {
    let registry = InMemoryJobRegistry::new();

    let id = registry.create(None).await;

    let job = registry.get(id).await.unwrap();
    assert_eq!(job.id, id);
    assert_eq!(job.status, JobStatus::Pending);
}

#[tokio::test]
async fn given_unknown_id_when_getting_then_returns_none() {
    let registry = InMemoryJobRegistry::new();

    assert!(registry.get(JobId::new()).await.is_none());
}

#[tokio::test]
async fn given_job_when_walking_lifecycle_then_each_transition_is_visible() {
    let registry = InMemoryJobRegistry::new();
    let id = registry.create(None).await;

    registry.mark_running(id).await.unwrap();
    assert_eq!(registry.get(id).await.unwrap().status, JobStatus::Running);

    registry.complete(id, "hello world").await.unwrap();
    let job = registry.get(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.result.as_deref(), Some("hello world"));
    assert!(job.error.is_none());
}

#[tokio::test]
async fn given_running_job_when_failed_then_error_is_recorded() {
    let registry = InMemoryJobRegistry::new();
    let id = registry.create(None).await;
    registry.mark_running(id).await.unwrap();

    registry.fail(id, "decoder error").await.unwrap();

    let job = registry.get(id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error.as_deref(), Some("decoder error"));
    assert!(job.result.is_none());
}

#[tokio::test]
async fn given_unknown_id_when_transitioning_then_returns_not_found() {
    let registry = InMemoryJobRegistry::new();
    let id = JobId::new();

    assert_eq!(registry.complete(id, "x").await, Err(RegistryError::NotFound(id)));
    assert_eq!(registry.mark_running(id).await, Err(RegistryError::NotFound(id)));
}

#[tokio::test]
async fn given_job_when_discarded_then_is_gone() {
    let registry = InMemoryJobRegistry::new();
    let id = registry.create(None).await;

    assert!(registry.discard(id).await);
    assert!(!registry.discard(id).await);
    assert!(registry.get(id).await.is_none());
}

#[tokio::test]
async fn given_concurrent_creates_when_collected_then_ids_are_unique() {
    let registry = Arc::new(InMemoryJobRegistry::new());

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.create(None).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }

    assert_eq!(ids.len(), 100);
    assert_eq!(registry.len().await, 100);
}

#[tokio::test]
async fn given_mixed_jobs_when_evicting_then_only_old_terminal_jobs_go() {
    let registry = InMemoryJobRegistry::new();
    let pending = registry.create(None).await;
    let running = registry.create(None).await;
    let completed = registry.create(None).await;
    let failed = registry.create(None).await;
    registry.mark_running(running).await.unwrap();
    registry.complete(completed, "ok").await.unwrap();
    registry.fail(failed, "no").await.unwrap();

    assert_eq!(registry.evict_finished(Utc::now() - chrono::Duration::hours(1)).await, 0);

    let evicted = registry
        .evict_finished(Utc::now() + chrono::Duration::seconds(1))
        .await;

    assert_eq!(evicted, 2);
    assert!(registry.get(pending).await.is_some());
    assert!(registry.get(running).await.is_some());
    assert!(registry.get(completed).await.is_none());
    assert!(registry.get(failed).await.is_none());
}

#[tokio::test]
async fn given_zero_retention_when_sweeping_then_finished_jobs_are_evicted() {
    let registry = Arc::new(InMemoryJobRegistry::new());
    let done = registry.create(None).await;
    registry.complete(done, "ok").await.unwrap();
    let waiting = registry.create(None).await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    let retention = JobRetention::new(registry.clone(), Duration::ZERO, Duration::from_secs(60));

    assert_eq!(retention.run_once().await, 1);
    assert!(registry.get(done).await.is_none());
    assert!(registry.get(waiting).await.is_some());
}

#[tokio::test]
async fn given_long_retention_when_sweeping_then_nothing_is_evicted() {
    let registry = Arc::new(InMemoryJobRegistry::new());
    let done = registry.create(None).await;
    registry.complete(done, "ok").await.unwrap();

    let retention = JobRetention::new(
        registry.clone(),
        Duration::from_secs(3600),
        Duration::from_secs(60),
    );

    assert_eq!(retention.run_once().await, 0);
    assert!(registry.get(done).await.is_some());
}

#[tokio::test]
async fn given_running_sweeper_when_shutdown_signalled_then_stops() {
    let registry = Arc::new(InMemoryJobRegistry::new());
    let retention = JobRetention::new(registry, Duration::from_secs(3600), Duration::from_secs(3600));
    let (shutdown, rx) = watch::channel(false);

    let handle = tokio::spawn(retention.run(rx));
    shutdown.send(true).unwrap();

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("sweeper did not stop")
        .unwrap();
}
