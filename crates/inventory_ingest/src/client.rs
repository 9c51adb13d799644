//! Upload collaborator interface and its HTTP implementation.

use crate::{IngestionBatch, Result, UploadError};
use async_trait::async_trait;
use inventory_core::UploadConfig;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

/// Successful reply of the inventory endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

/// Trait for the external inventory endpoint.
///
/// One call uploads one whole batch; there is no partial acceptance.
#[async_trait]
pub trait UploadClient: Send + Sync {
    /// Sends the batch.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Rejected` for any non-success status.
    async fn upload(&self, batch: &IngestionBatch) -> Result<UploadResponse>;
}

/// [`UploadClient`] that POSTs `{"diamonds": [...]}` as JSON.
#[derive(Debug, Clone)]
pub struct HttpUploadClient {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpUploadClient {
    /// Creates a client for `endpoint` with reqwest defaults.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client from configuration, applying its timeout and token.
    pub fn from_config(config: &UploadConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            client,
        })
    }

    /// Sends `token` as a bearer credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Target endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl UploadClient for HttpUploadClient {
    async fn upload(&self, batch: &IngestionBatch) -> Result<UploadResponse> {
        let body = serde_json::to_vec(batch)?;
        debug!(
            "POST {} ({} diamonds, {} bytes)",
            self.endpoint,
            batch.len(),
            body.len()
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(UploadResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_from_config() {
        let mut config = UploadConfig::new("https://api.example.com/diamonds");
        config.token = Some("secret".to_string());

        let client = HttpUploadClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/diamonds");
        assert_eq!(client.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_with_token() {
        let client = HttpUploadClient::new("https://api.example.com/diamonds").with_token("t");
        assert_eq!(client.token.as_deref(), Some("t"));
    }
}
