// Snapshot export: JSON serialization and delivery to the configured endpoint.

use crate::config::DeliveryConfig;
use crate::error::{CollectError, Result};
use crate::models::AggregateSnapshot;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::future::Future;
use std::time::Duration;
use tracing::instrument;

/// Sent with every delivery request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub fn serialize(snapshot: &AggregateSnapshot) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(snapshot)?)
}

/// Receives serialized snapshots. One attempt per call; retry policy belongs to the caller.
pub trait SnapshotSink: Send + Sync {
    fn deliver(&self, body: Vec<u8>) -> impl Future<Output = Result<()>> + Send;
}

/// POSTs `application/json` to an HTTP(S) endpoint.
pub struct HttpSink {
    client: Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(config: &DeliveryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CollectError::Delivery {
                endpoint: config.endpoint.clone(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    fn failure(&self, reason: String) -> CollectError {
        CollectError::Delivery {
            endpoint: self.endpoint.clone(),
            reason,
        }
    }
}

impl SnapshotSink for HttpSink {
    #[instrument(skip(self, body), fields(operation = "deliver", endpoint = %self.endpoint, bytes = body.len()))]
    async fn deliver(&self, body: Vec<u8>) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.failure(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(self.failure(format!("status {}: {}", status, text)));
        }
        tracing::debug!(%status, response = %text, "snapshot delivered");
        Ok(())
    }
}

/// Serialize and deliver one snapshot.
pub async fn export<S: SnapshotSink>(sink: &S, snapshot: &AggregateSnapshot) -> Result<()> {
    let body = serialize(snapshot)?;
    sink.deliver(body).await
}
