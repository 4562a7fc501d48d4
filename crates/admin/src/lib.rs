//! # Guardrail Admin
//!
//! Read-only admin surface for Guardrail providing:
//! - DLQ entry listings filtered by tenant and status
//! - Aggregate DLQ statistics
//! - Per-tenant rate-limit usage
//!
//! Authentication and authorization of callers is the embedding
//! platform's responsibility; this crate only exposes read contracts.

mod api;

pub use api::{AdminApi, AdminError, AdminResult, SafetyOverview, TenantUsageEntry};
