//! # Guardrail DLQ
//!
//! Dead-letter queue for Guardrail outbound webhooks providing:
//! - Durable capture of failed deliveries with redacted payload snapshots
//! - A forward-only entry state machine (pending, retrying, resolved,
//!   abandoned)
//! - Batch retry processing with exponential backoff and a hard attempt
//!   budget
//! - Atomic batch claiming, safe under accidental scheduler overlap
//!
//! ## Example
//!
//! ```rust,ignore
//! use guardrail_dlq::{DlqEntry, InMemoryDlqStore, ProcessorConfig, RetryProcessor};
//!
//! let store = Arc::new(InMemoryDlqStore::new());
//! let entry = DlqEntry::new("ws-1", "https://hooks.example.com", "lead.created", payload, &sanitizer);
//! store.enqueue(&entry).await?;
//!
//! // Invoked periodically by an external scheduler.
//! let outcome = processor.process_batch(50).await?;
//! ```

mod backoff;
mod entry;
mod error;
mod processor;
mod store;
mod transport;

pub use backoff::ExponentialBackoff;
pub use entry::{DlqEntry, DlqStatus};
pub use error::{DlqError, DlqResult};
pub use processor::{BatchOutcome, ProcessorConfig, RetryProcessor};
pub use store::{DlqStats, DlqStore, InMemoryDlqStore};
pub use transport::DeliveryTransport;
#[cfg(feature = "http-client")]
pub use transport::HttpTransport;
