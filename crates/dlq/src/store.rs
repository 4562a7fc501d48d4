//! DLQ store abstraction with atomic batch claiming.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::entry::{DlqEntry, DlqStatus};
use crate::error::{DlqError, DlqResult};

/// Aggregate entry counts by status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DlqStats {
    pub pending: usize,
    pub retrying: usize,
    pub resolved: usize,
    pub abandoned: usize,
}

impl DlqStats {
    /// Total entries across all statuses.
    pub fn total(&self) -> usize {
        self.pending + self.retrying + self.resolved + self.abandoned
    }
}

/// Trait for DLQ storage backends.
///
/// `claim_due_batch` must be atomic: when two processors race, each entry
/// is handed to exactly one of them. A claim is released by the
/// `update_status` that records the attempt's outcome.
#[async_trait]
pub trait DlqStore: Send + Sync {
    /// Persists a new entry.
    async fn enqueue(&self, entry: &DlqEntry) -> DlqResult<()>;

    /// Atomically claims up to `max_entries` due entries (non-terminal,
    /// `next_attempt_at <= now`), oldest-due first.
    async fn claim_due_batch(
        &self,
        max_entries: usize,
        now: DateTime<Utc>,
    ) -> DlqResult<Vec<DlqEntry>>;

    /// Records an attempt outcome and releases the claim. Terminal entries
    /// reject further updates.
    async fn update_status(
        &self,
        id: &str,
        status: DlqStatus,
        attempt_count: u32,
        next_attempt_at: Option<DateTime<Utc>>,
        last_error: Option<String>,
    ) -> DlqResult<()>;

    /// Gets an entry by ID.
    async fn get_entry(&self, id: &str) -> DlqResult<Option<DlqEntry>>;

    /// Lists a tenant's entries, optionally filtered by status, newest
    /// first.
    async fn list_by_tenant(
        &self,
        tenant_id: &str,
        status: Option<DlqStatus>,
        limit: usize,
    ) -> DlqResult<Vec<DlqEntry>>;

    /// Returns entry counts by status.
    async fn get_stats(&self) -> DlqResult<DlqStats>;
}

struct StoreInner {
    entries: HashMap<String, DlqEntry>,
    claimed: HashSet<String>,
}

/// In-memory DLQ store for testing and single-process development.
pub struct InMemoryDlqStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryDlqStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                entries: HashMap::new(),
                claimed: HashSet::new(),
            }),
        }
    }
}

impl Default for InMemoryDlqStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DlqStore for InMemoryDlqStore {
    async fn enqueue(&self, entry: &DlqEntry) -> DlqResult<()> {
        let mut inner = self.inner.write().await;
        inner.entries.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    async fn claim_due_batch(
        &self,
        max_entries: usize,
        now: DateTime<Utc>,
    ) -> DlqResult<Vec<DlqEntry>> {
        let mut inner = self.inner.write().await;

        let mut due: Vec<DlqEntry> = inner
            .entries
            .values()
            .filter(|e| e.is_due(now) && !inner.claimed.contains(&e.id))
            .cloned()
            .collect();
        due.sort_by_key(|e| e.next_attempt_at);
        due.truncate(max_entries);

        for entry in &due {
            inner.claimed.insert(entry.id.clone());
        }

        Ok(due)
    }

    async fn update_status(
        &self,
        id: &str,
        status: DlqStatus,
        attempt_count: u32,
        next_attempt_at: Option<DateTime<Utc>>,
        last_error: Option<String>,
    ) -> DlqResult<()> {
        let mut inner = self.inner.write().await;
        inner.claimed.remove(id);

        let entry = inner
            .entries
            .get_mut(id)
            .ok_or_else(|| DlqError::EntryNotFound(id.to_string()))?;

        if entry.status.is_terminal() {
            return Err(DlqError::Storage(format!(
                "Entry {} is terminal and cannot transition",
                id
            )));
        }

        entry.status = status;
        entry.attempt_count = attempt_count;
        if let Some(next) = next_attempt_at {
            entry.next_attempt_at = next;
        }
        entry.last_error = last_error;
        entry.updated_at = Utc::now();

        Ok(())
    }

    async fn get_entry(&self, id: &str) -> DlqResult<Option<DlqEntry>> {
        let inner = self.inner.read().await;
        Ok(inner.entries.get(id).cloned())
    }

    async fn list_by_tenant(
        &self,
        tenant_id: &str,
        status: Option<DlqStatus>,
        limit: usize,
    ) -> DlqResult<Vec<DlqEntry>> {
        let inner = self.inner.read().await;

        let mut matching: Vec<DlqEntry> = inner
            .entries
            .values()
            .filter(|e| e.tenant_id == tenant_id)
            .filter(|e| status.map(|s| e.status == s).unwrap_or(true))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);

        Ok(matching)
    }

    async fn get_stats(&self) -> DlqResult<DlqStats> {
        let inner = self.inner.read().await;

        let mut stats = DlqStats::default();
        for entry in inner.entries.values() {
            match entry.status {
                DlqStatus::Pending => stats.pending += 1,
                DlqStatus::Retrying => stats.retrying += 1,
                DlqStatus::Resolved => stats.resolved += 1,
                DlqStatus::Abandoned => stats.abandoned += 1,
            }
        }

        Ok(stats)
    }
}
