use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;

use crate::application::ports::JobRegistry;

/// Periodically evicts finished jobs so the in-memory registry stays bounded.
pub struct JobRetention {
    registry: Arc<dyn JobRegistry>,
    retention: Duration,
    interval: Duration,
}

impl JobRetention {
    pub fn new(registry: Arc<dyn JobRegistry>, retention: Duration, interval: Duration) -> Self {
        Self {
            registry,
            retention,
            interval,
        }
    }

    pub async fn run_once(&self) -> usize {
        let retention = chrono::Duration::from_std(self.retention).unwrap_or(chrono::Duration::MAX);
        let cutoff = Utc::now()
            .checked_sub_signed(retention)
            .unwrap_or(chrono::DateTime::<Utc>::MIN_UTC);
        let evicted = self.registry.evict_finished(cutoff).await;
        if evicted > 0 {
            tracing::info!(evicted, "Evicted finished jobs");
        }
        evicted
    }

    /// Sweeps every `interval` until `shutdown` flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                break;
            }

            self.run_once().await;

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
        tracing::debug!("Job retention stopped");
    }
}
