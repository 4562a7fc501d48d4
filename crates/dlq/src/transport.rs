//! Delivery transport abstraction and HTTP implementation.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::DlqResult;
#[cfg(feature = "http-client")]
use crate::error::DlqError;

/// Trait for webhook delivery transports.
///
/// Delivery is at-least-once: the same entry may be sent more than once
/// across racing processors, and receivers must tolerate duplicates.
#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    /// Sends a payload to the target URL. `Ok(())` means a 2xx response;
    /// anything else is an error with detail.
    async fn send(&self, target_url: &str, payload: &Value, timeout: Duration) -> DlqResult<()>;
}

/// HTTP delivery transport backed by `reqwest`.
#[cfg(feature = "http-client")]
pub struct HttpTransport {
    client: reqwest::Client,
}

#[cfg(feature = "http-client")]
impl HttpTransport {
    /// Creates a new HTTP transport.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "http-client")]
impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http-client")]
#[async_trait]
impl DeliveryTransport for HttpTransport {
    async fn send(&self, target_url: &str, payload: &Value, timeout: Duration) -> DlqResult<()> {
        let response = self
            .client
            .post(target_url)
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            let mut detail = body;
            detail.truncate(256);
            Err(DlqError::Delivery(format!("HTTP {}: {}", status.as_u16(), detail)))
        }
    }
}
