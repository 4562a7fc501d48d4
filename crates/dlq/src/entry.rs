//! Dead-letter entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use guardrail_redaction::Sanitizer;

/// Dead-letter entry status. Transitions are forward-only; terminal
/// entries are never resurrected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DlqStatus {
    /// Freshly enqueued, never attempted.
    Pending,
    /// At least one attempt failed; scheduled for a future attempt.
    Retrying,
    /// A delivery attempt succeeded.
    Resolved,
    /// Attempt budget exhausted without success.
    Abandoned,
}

impl DlqStatus {
    /// Returns true for states that admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DlqStatus::Resolved | DlqStatus::Abandoned)
    }
}

/// A failed webhook delivery held for deferred retry.
///
/// Entries are created by the producer that observed the failure, mutated
/// exclusively by the retry processor, and never physically deleted here;
/// retention is an external concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlqEntry {
    /// Unique identifier.
    pub id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Webhook target URL.
    pub target_url: String,
    /// Redacted payload snapshot.
    pub payload: Value,
    /// Event type the webhook carries.
    pub event_type: String,
    /// Current state.
    pub status: DlqStatus,
    /// Delivery attempts made so far. Strictly increases per attempt.
    pub attempt_count: u32,
    /// Entry is not eligible for processing before this time.
    pub next_attempt_at: DateTime<Utc>,
    /// Error from the most recent failed attempt.
    pub last_error: Option<String>,
    /// When the entry was enqueued.
    pub created_at: DateTime<Utc>,
    /// When the entry was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl DlqEntry {
    /// Creates a new pending entry, immediately eligible for processing.
    /// The payload is passed through the sanitizer so that no raw PII is
    /// ever persisted in the queue.
    pub fn new(
        tenant_id: impl Into<String>,
        target_url: impl Into<String>,
        event_type: impl Into<String>,
        payload: &Value,
        sanitizer: &Sanitizer,
    ) -> Self {
        let snapshot = sanitizer.sanitize(Some(payload));
        if snapshot.was_sanitized {
            tracing::debug!(
                "Redacted {} field(s) from DLQ payload snapshot",
                snapshot.fields_redacted
            );
        }

        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            target_url: target_url.into(),
            payload: snapshot.data,
            event_type: event_type.into(),
            status: DlqStatus::Pending,
            attempt_count: 0,
            next_attempt_at: now,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks whether the entry is eligible for processing at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && self.next_attempt_at <= now
    }
}
