//! Read API over the DLQ store and rate limiter.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use guardrail_dlq::{DlqEntry, DlqError, DlqStats, DlqStatus, DlqStore};
use guardrail_ratelimit::{RateLimitError, RateLimiter, TenantUsage};

/// Result type for admin operations.
pub type AdminResult<T> = Result<T, AdminError>;

/// Error type for admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// DLQ read failed.
    #[error(transparent)]
    Dlq(#[from] DlqError),

    /// Rate limiter read failed.
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
}

/// Usage for a single tenant, labeled for dashboard display.
#[derive(Debug, Clone, Serialize)]
pub struct TenantUsageEntry {
    pub tenant_id: String,
    pub usage: TenantUsage,
}

/// Combined safety-layer snapshot for a dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct SafetyOverview {
    /// DLQ entry counts by status.
    pub dlq: DlqStats,
    /// Rate-limit usage per requested tenant.
    pub usage: Vec<TenantUsageEntry>,
}

/// Read-only admin API over the safety layer.
pub struct AdminApi {
    limiter: Arc<RateLimiter>,
    dlq_store: Arc<dyn DlqStore>,
}

impl AdminApi {
    /// Creates a new admin API.
    pub fn new(limiter: Arc<RateLimiter>, dlq_store: Arc<dyn DlqStore>) -> Self {
        Self { limiter, dlq_store }
    }

    /// Lists a tenant's DLQ entries, optionally filtered by status.
    /// Payloads are already-redacted snapshots, safe to display.
    pub async fn list_dlq_entries(
        &self,
        tenant_id: &str,
        status: Option<DlqStatus>,
        limit: usize,
    ) -> AdminResult<Vec<DlqEntry>> {
        Ok(self.dlq_store.list_by_tenant(tenant_id, status, limit).await?)
    }

    /// Returns aggregate DLQ counts by status.
    pub async fn dlq_stats(&self) -> AdminResult<DlqStats> {
        Ok(self.dlq_store.get_stats().await?)
    }

    /// Returns a tenant's current rate-limit usage.
    pub async fn tenant_usage(&self, tenant_id: &str) -> AdminResult<TenantUsage> {
        Ok(self.limiter.get_usage(tenant_id).await?)
    }

    /// Builds a combined snapshot for the given tenants.
    pub async fn overview(&self, tenant_ids: &[String]) -> AdminResult<SafetyOverview> {
        let dlq = self.dlq_store.get_stats().await?;

        let mut usage = Vec::with_capacity(tenant_ids.len());
        for tenant_id in tenant_ids {
            usage.push(TenantUsageEntry {
                tenant_id: tenant_id.clone(),
                usage: self.limiter.get_usage(tenant_id).await?,
            });
        }

        Ok(SafetyOverview { dlq, usage })
    }
}
