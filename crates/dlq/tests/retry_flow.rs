//! End-to-end retry flow: enqueue, repeated scheduled batches, and
//! eventual abandonment.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

use guardrail_dlq::{
    DeliveryTransport, DlqEntry, DlqResult, DlqStatus, DlqStore, ExponentialBackoff,
    InMemoryDlqStore, ProcessorConfig, RetryProcessor,
};
use guardrail_redaction::Sanitizer;

struct AlwaysFailing;

#[async_trait]
impl DeliveryTransport for AlwaysFailing {
    async fn send(&self, _url: &str, _payload: &Value, _timeout: Duration) -> DlqResult<()> {
        Err(guardrail_dlq::DlqError::Delivery(
            "HTTP 502: bad gateway".into(),
        ))
    }
}

fn immediate_retry_processor(
    store: Arc<InMemoryDlqStore>,
    max_attempts: u32,
) -> RetryProcessor {
    let config = ProcessorConfig::new()
        .backoff(
            ExponentialBackoff::new()
                .base(Duration::ZERO)
                .max_attempts(max_attempts),
        )
        .delivery_timeout(Duration::from_secs(1));
    RetryProcessor::with_config(store, Arc::new(AlwaysFailing), config)
}

#[tokio::test]
async fn entry_walks_through_retrying_to_abandoned() {
    let store = Arc::new(InMemoryDlqStore::new());
    let processor = immediate_retry_processor(store.clone(), 5);

    let sanitizer = Sanitizer::new();
    let entry = DlqEntry::new(
        "ws-1",
        "https://hooks.example.com/inbound",
        "campaign.completed",
        &json!({"email": "jane@acme.com", "campaign_id": "c-7"}),
        &sanitizer,
    );
    store.enqueue(&entry).await.unwrap();

    // Attempts 1 through 4 fail and reschedule.
    for expected_attempts in 1..=4 {
        let outcome = processor.process_batch(10).await.unwrap();
        assert_eq!(outcome.total_processed, 1);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.abandoned, 0);

        let current = store.get_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(current.status, DlqStatus::Retrying);
        assert_eq!(current.attempt_count, expected_attempts);
        assert!(current.last_error.is_some());
    }

    // The fifth failure exhausts the budget.
    let outcome = processor.process_batch(10).await.unwrap();
    assert_eq!(outcome.abandoned, 1);

    let abandoned = store.get_entry(&entry.id).await.unwrap().unwrap();
    assert_eq!(abandoned.status, DlqStatus::Abandoned);
    assert_eq!(abandoned.attempt_count, 5);

    // Abandonment is terminal: further batches never touch the entry.
    let outcome = processor.process_batch(10).await.unwrap();
    assert_eq!(outcome.total_processed, 0);

    let still_abandoned = store.get_entry(&entry.id).await.unwrap().unwrap();
    assert_eq!(still_abandoned.attempt_count, 5);
}

#[tokio::test]
async fn malformed_target_url_rides_the_same_retry_path() {
    let store = Arc::new(InMemoryDlqStore::new());
    let processor = immediate_retry_processor(store.clone(), 2);

    let sanitizer = Sanitizer::new();
    let entry = DlqEntry::new(
        "ws-1",
        "not a url",
        "campaign.completed",
        &json!({"campaign_id": "c-7"}),
        &sanitizer,
    );
    store.enqueue(&entry).await.unwrap();

    // No special-casing for permanent failures; the budget is the valve.
    processor.process_batch(10).await.unwrap();
    let outcome = processor.process_batch(10).await.unwrap();
    assert_eq!(outcome.abandoned, 1);

    let abandoned = store.get_entry(&entry.id).await.unwrap().unwrap();
    assert_eq!(abandoned.status, DlqStatus::Abandoned);
    assert_eq!(abandoned.attempt_count, 2);
}

#[tokio::test]
async fn redacted_snapshot_is_what_gets_persisted() {
    let store = Arc::new(InMemoryDlqStore::new());

    let sanitizer = Sanitizer::new();
    let entry = DlqEntry::new(
        "ws-1",
        "https://hooks.example.com/inbound",
        "lead.created",
        &json!({"email": "jane@acme.com", "score": 93}),
        &sanitizer,
    );
    store.enqueue(&entry).await.unwrap();

    let stored = store.get_entry(&entry.id).await.unwrap().unwrap();
    let serialized = stored.payload.to_string();
    assert!(!serialized.contains("jane"));
    assert!(serialized.contains("@"));
    assert_eq!(stored.payload["score"], 93);
}
