//! Sliding-window rate limiter over a counter store.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::RateLimitResult;
use crate::store::RunCounterStore;

/// Rate limit policy, shared by all tenants of a limiter instance.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Maximum admitted runs per window per tenant.
    pub max_runs_per_window: u32,
    /// Sliding window length in seconds.
    pub window_seconds: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_runs_per_window: 10,
            window_seconds: 3600,
        }
    }
}

impl RateLimitPolicy {
    /// Creates a new policy with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-window run ceiling.
    pub fn max_runs_per_window(mut self, max: u32) -> Self {
        self.max_runs_per_window = max;
        self
    }

    /// Sets the window length in seconds.
    pub fn window_seconds(mut self, seconds: i64) -> Self {
        self.window_seconds = seconds;
        self
    }

    /// Window length as a duration.
    pub fn window(&self) -> Duration {
        Duration::seconds(self.window_seconds)
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitDecision {
    /// Whether the trigger is admitted.
    pub allowed: bool,
    /// The configured per-window ceiling.
    pub limit: u32,
    /// Runs counted in the current window.
    pub used: u32,
    /// Runs left before denial.
    pub remaining: u32,
    /// How long a denied caller should wait. Conservatively a full window;
    /// zero when the request is allowed.
    pub retry_after_seconds: i64,
    /// When the budget is guaranteed to be fully replenished.
    pub reset_at: DateTime<Utc>,
}

/// Per-tenant usage snapshot for display surfaces. Carries no verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantUsage {
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
}

/// Per-tenant sliding-window rate limiter.
///
/// `check_limit` is read-only; callers invoke `record_run` separately once
/// the gated action actually proceeds, so an admitted-but-skipped action
/// never counts against the budget. The check/record split is racy under
/// concurrent requests for one tenant, which is acceptable for an abuse
/// guard; it is not a billing-grade quota.
pub struct RateLimiter {
    store: Arc<dyn RunCounterStore>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    /// Creates a limiter with the default policy.
    pub fn new(store: Arc<dyn RunCounterStore>) -> Self {
        Self::with_policy(store, RateLimitPolicy::default())
    }

    /// Creates a limiter with a custom policy.
    pub fn with_policy(store: Arc<dyn RunCounterStore>, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }

    /// Checks whether a tenant may trigger another run. Does not mutate
    /// the counter store.
    pub async fn check_limit(&self, tenant_id: &str) -> RateLimitResult<RateLimitDecision> {
        let used = self
            .store
            .count_in_window(tenant_id, self.policy.window())
            .await? as u32;

        let limit = self.policy.max_runs_per_window;
        let allowed = used < limit;
        let retry_after_seconds = if allowed { 0 } else { self.policy.window_seconds };

        if !allowed {
            tracing::warn!(
                "Tenant {} rate limited: {} of {} runs used in window",
                tenant_id,
                used,
                limit
            );
        }

        Ok(RateLimitDecision {
            allowed,
            limit,
            used,
            remaining: limit.saturating_sub(used),
            retry_after_seconds,
            reset_at: Utc::now() + self.policy.window(),
        })
    }

    /// Records a run against the tenant's budget.
    pub async fn record_run(&self, tenant_id: &str) -> RateLimitResult<()> {
        self.store.record_run(tenant_id).await
    }

    /// Returns the tenant's current usage without an allow/deny verdict.
    pub async fn get_usage(&self, tenant_id: &str) -> RateLimitResult<TenantUsage> {
        let used = self
            .store
            .count_in_window(tenant_id, self.policy.window())
            .await? as u32;
        let limit = self.policy.max_runs_per_window;

        Ok(TenantUsage {
            used,
            limit,
            remaining: limit.saturating_sub(used),
        })
    }

    /// Gets the policy.
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryCounterStore;

    fn limiter_with(max: u32, window_seconds: i64) -> (Arc<InMemoryCounterStore>, RateLimiter) {
        let store = Arc::new(InMemoryCounterStore::new());
        let policy = RateLimitPolicy::new()
            .max_runs_per_window(max)
            .window_seconds(window_seconds);
        let limiter = RateLimiter::with_policy(store.clone(), policy);
        (store, limiter)
    }

    #[tokio::test]
    async fn test_fresh_tenant_is_admitted() {
        let (_, limiter) = limiter_with(3, 3600);

        let decision = limiter.check_limit("ws-1").await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.used, 0);
        assert_eq!(decision.remaining, 3);
        assert_eq!(decision.retry_after_seconds, 0);
    }

    #[tokio::test]
    async fn test_denial_at_ceiling() {
        let (_, limiter) = limiter_with(3, 3600);

        limiter.record_run("ws-1").await.unwrap();
        limiter.record_run("ws-1").await.unwrap();

        let decision = limiter.check_limit("ws-1").await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
        assert_eq!(decision.limit, 3);

        limiter.record_run("ws-1").await.unwrap();

        let decision = limiter.check_limit("ws-1").await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.retry_after_seconds, 3600);
    }

    #[tokio::test]
    async fn test_tenant_isolation() {
        let (_, limiter) = limiter_with(3, 3600);

        for _ in 0..3 {
            limiter.record_run("ws-1").await.unwrap();
        }

        let denied = limiter.check_limit("ws-1").await.unwrap();
        assert!(!denied.allowed);

        let untouched = limiter.check_limit("ws-2").await.unwrap();
        assert!(untouched.allowed);
        assert_eq!(untouched.remaining, 3);
    }

    #[tokio::test]
    async fn test_window_recovery() {
        let (store, limiter) = limiter_with(1, 3600);

        store
            .record_run_at("ws-1", Utc::now() - Duration::seconds(3601))
            .await;

        let decision = limiter.check_limit("ws-1").await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.used, 0);
    }

    #[tokio::test]
    async fn test_check_does_not_consume() {
        let (_, limiter) = limiter_with(2, 3600);

        for _ in 0..5 {
            let decision = limiter.check_limit("ws-1").await.unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.used, 0);
        }
    }

    #[tokio::test]
    async fn test_get_usage() {
        let (_, limiter) = limiter_with(10, 3600);

        limiter.record_run("ws-1").await.unwrap();
        limiter.record_run("ws-1").await.unwrap();

        let usage = limiter.get_usage("ws-1").await.unwrap();
        assert_eq!(usage.used, 2);
        assert_eq!(usage.limit, 10);
        assert_eq!(usage.remaining, 8);
    }
}
