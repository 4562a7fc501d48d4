//! # Guardrail Rate Limit
//!
//! Per-tenant sliding-window rate limiting for Guardrail providing:
//! - A read-only `check_limit` / explicit `record_run` split
//! - Pluggable counter store backends
//! - Actionable denial metadata (`retry_after_seconds`, `reset_at`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use guardrail_ratelimit::{InMemoryCounterStore, RateLimitPolicy, RateLimiter};
//!
//! let store = Arc::new(InMemoryCounterStore::new());
//! let limiter = RateLimiter::with_policy(store, RateLimitPolicy::new().max_runs_per_window(3));
//!
//! let decision = limiter.check_limit("ws-1").await?;
//! if decision.allowed {
//!     limiter.record_run("ws-1").await?;
//! }
//! ```

mod error;
mod limiter;
mod store;

pub use error::{RateLimitError, RateLimitResult};
pub use limiter::{RateLimitDecision, RateLimitPolicy, RateLimiter, TenantUsage};
pub use store::{InMemoryCounterStore, RunCounterStore};
