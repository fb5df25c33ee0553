use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Gate awaited before every external request.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until a request to `host` may be sent.
    async fn acquire(&self, host: &str);
}

/// Fixed-interval gate per host, shared by every worker.
///
/// Requests to the same host are spaced at least `interval` apart, measured
/// from the moment each previous request was released. Hosts do not wait on
/// each other.
pub struct IntervalGate {
    interval: Duration,
    hosts: DashMap<String, Arc<Mutex<Option<Instant>>>>,
}

impl IntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            hosts: DashMap::new(),
        }
    }

    fn slot(&self, host: &str) -> Arc<Mutex<Option<Instant>>> {
        // Clone the Arc out so the shard lock is not held across the await.
        self.hosts
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }
}

#[async_trait]
impl RateLimiter for IntervalGate {
    async fn acquire(&self, host: &str) {
        let slot = self.slot(host);
        let mut last = slot.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.interval;
            if ready_at > Instant::now() {
                tracing::trace!(host, "rate limit: waiting");
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
    }
}
