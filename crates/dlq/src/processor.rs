//! Batch retry processor for dead-lettered webhooks.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::backoff::ExponentialBackoff;
use crate::entry::{DlqEntry, DlqStatus};
use crate::error::{DlqError, DlqResult};
use crate::store::DlqStore;
use crate::transport::DeliveryTransport;

/// Retry processor configuration.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Backoff schedule and attempt budget.
    pub backoff: ExponentialBackoff,
    /// Per-entry delivery timeout.
    pub delivery_timeout: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            backoff: ExponentialBackoff::default(),
            delivery_timeout: Duration::from_secs(10),
        }
    }
}

impl ProcessorConfig {
    /// Creates a new configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backoff policy.
    pub fn backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sets the per-entry delivery timeout.
    pub fn delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }
}

/// Summary of one batch invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Entries claimed and attempted.
    pub total_processed: usize,
    /// Deliveries that succeeded.
    pub successful: usize,
    /// Deliveries that failed but remain in budget (rescheduled).
    pub failed: usize,
    /// Entries whose attempt budget was exhausted this batch.
    pub abandoned: usize,
}

/// Retry processor for dead-lettered webhooks.
///
/// Invoked periodically by an external scheduler; each invocation claims
/// one bounded batch, attempts redelivery, and returns. Atomic claiming in
/// the store makes accidental scheduler overlap safe: a losing claimant
/// just sees a smaller batch.
pub struct RetryProcessor {
    store: Arc<dyn DlqStore>,
    transport: Arc<dyn DeliveryTransport>,
    config: ProcessorConfig,
}

impl RetryProcessor {
    /// Creates a processor with default configuration.
    pub fn new(store: Arc<dyn DlqStore>, transport: Arc<dyn DeliveryTransport>) -> Self {
        Self::with_config(store, transport, ProcessorConfig::default())
    }

    /// Creates a processor with custom configuration.
    pub fn with_config(
        store: Arc<dyn DlqStore>,
        transport: Arc<dyn DeliveryTransport>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            store,
            transport,
            config,
        }
    }

    /// Claims and processes one batch of due entries.
    ///
    /// Transient delivery failures drive the retry state machine and never
    /// fail the batch call; store failures do.
    pub async fn process_batch(&self, max_entries: usize) -> DlqResult<BatchOutcome> {
        let batch = self.store.claim_due_batch(max_entries, Utc::now()).await?;
        let mut outcome = BatchOutcome::default();

        for entry in batch {
            outcome.total_processed += 1;

            match self.attempt_delivery(&entry).await {
                Ok(()) => {
                    self.store
                        .update_status(
                            &entry.id,
                            DlqStatus::Resolved,
                            entry.attempt_count + 1,
                            None,
                            None,
                        )
                        .await?;
                    outcome.successful += 1;
                    tracing::info!(
                        "Delivered DLQ entry {} for tenant {} on attempt {}",
                        entry.id,
                        entry.tenant_id,
                        entry.attempt_count + 1
                    );
                }
                Err(err) => {
                    self.handle_failure(&entry, err, &mut outcome).await?;
                }
            }
        }

        tracing::debug!(
            "DLQ batch done: {} processed, {} delivered, {} rescheduled, {} abandoned",
            outcome.total_processed,
            outcome.successful,
            outcome.failed,
            outcome.abandoned
        );

        Ok(outcome)
    }

    /// Attempts delivery under the configured timeout. A timeout counts as
    /// a failed attempt like any transport error.
    async fn attempt_delivery(&self, entry: &DlqEntry) -> DlqResult<()> {
        let send = self
            .transport
            .send(&entry.target_url, &entry.payload, self.config.delivery_timeout);

        match tokio::time::timeout(self.config.delivery_timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(DlqError::Timeout),
        }
    }

    async fn handle_failure(
        &self,
        entry: &DlqEntry,
        err: DlqError,
        outcome: &mut BatchOutcome,
    ) -> DlqResult<()> {
        let attempts = entry.attempt_count + 1;

        match self.config.backoff.next_delay(attempts) {
            Some(delay) => {
                // An inexpressible delay is a configuration defect; failing
                // the batch beats silently rescheduling for right now.
                let delay = chrono::Duration::from_std(delay).map_err(|_| {
                    DlqError::Config(format!("Backoff delay {:?} out of range", delay))
                })?;
                let next_attempt_at = Utc::now() + delay;
                self.store
                    .update_status(
                        &entry.id,
                        DlqStatus::Retrying,
                        attempts,
                        Some(next_attempt_at),
                        Some(err.to_string()),
                    )
                    .await?;
                outcome.failed += 1;
                tracing::warn!(
                    "DLQ entry {} failed attempt {} ({}), next attempt at {}",
                    entry.id,
                    attempts,
                    err,
                    next_attempt_at
                );
            }
            None => {
                self.store
                    .update_status(
                        &entry.id,
                        DlqStatus::Abandoned,
                        attempts,
                        None,
                        Some(err.to_string()),
                    )
                    .await?;
                outcome.abandoned += 1;
                tracing::error!(
                    "DLQ entry {} abandoned after {} attempts: {}",
                    entry.id,
                    attempts,
                    err
                );
            }
        }

        Ok(())
    }

    /// Gets the configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }
}
