//! Counter store abstraction for per-tenant run logs.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::RateLimitResult;

/// Trait for counter store backends.
///
/// Production deployments back this with a shared persistent store so that
/// multiple stateless workers count against the same log; the in-memory
/// implementation covers tests and single-process development.
#[async_trait]
pub trait RunCounterStore: Send + Sync {
    /// Appends a run timestamp to the tenant's log.
    async fn record_run(&self, tenant_id: &str) -> RateLimitResult<()>;

    /// Counts runs recorded within the trailing window. Entries older than
    /// the window must not count, whether or not they are still stored.
    async fn count_in_window(&self, tenant_id: &str, window: Duration) -> RateLimitResult<usize>;

    /// Clears all tenants' logs. Administrative and test use only.
    async fn reset(&self) -> RateLimitResult<()>;
}

/// In-memory counter store keyed by tenant.
pub struct InMemoryCounterStore {
    runs: RwLock<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl InMemoryCounterStore {
    /// Creates a new in-memory counter store.
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
        }
    }

    /// Records a run at an explicit timestamp. Useful for backfilling and
    /// for exercising window expiry in tests.
    pub async fn record_run_at(&self, tenant_id: &str, at: DateTime<Utc>) {
        let mut runs = self.runs.write().await;
        runs.entry(tenant_id.to_string()).or_default().push(at);
    }

    /// Drops timestamps older than the cutoff for every tenant. Pruning is
    /// an optimization only; `count_in_window` is correct without it.
    pub async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut runs = self.runs.write().await;
        let mut pruned = 0;
        for log in runs.values_mut() {
            let before = log.len();
            log.retain(|ts| *ts >= cutoff);
            pruned += before - log.len();
        }
        runs.retain(|_, log| !log.is_empty());
        pruned
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunCounterStore for InMemoryCounterStore {
    async fn record_run(&self, tenant_id: &str) -> RateLimitResult<()> {
        let mut runs = self.runs.write().await;
        runs.entry(tenant_id.to_string()).or_default().push(Utc::now());
        Ok(())
    }

    async fn count_in_window(&self, tenant_id: &str, window: Duration) -> RateLimitResult<usize> {
        let runs = self.runs.read().await;
        let cutoff = Utc::now() - window;

        Ok(runs
            .get(tenant_id)
            .map(|log| log.iter().filter(|ts| **ts >= cutoff).count())
            .unwrap_or(0))
    }

    async fn reset(&self) -> RateLimitResult<()> {
        let mut runs = self.runs.write().await;
        runs.clear();
        Ok(())
    }
}
