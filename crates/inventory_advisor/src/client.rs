//! Inference collaborator interface and its HTTP implementation.

use crate::{AdvisoryError, Result};
use async_trait::async_trait;
use inventory_core::AdvisoryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Request sent to the inference collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRequest {
    /// Full prompt
    pub message: String,
    /// Always empty; every advisory call is a fresh conversation
    pub conversation_history: Vec<serde_json::Value>,
}

impl InferenceRequest {
    /// Creates a request without history.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_history: Vec::new(),
        }
    }
}

/// Reply of the inference collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InferenceResponse {
    /// Free-form text, expected to embed a JSON object
    pub response: String,
}

/// Trait for the external model used by the advisory pass.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Sends one prompt and returns the raw reply.
    async fn complete(&self, request: &InferenceRequest) -> Result<InferenceResponse>;
}

/// [`InferenceClient`] that POSTs JSON to a chat endpoint.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpInferenceClient {
    /// Creates a client for `endpoint` with reqwest defaults.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client whose transport timeout matches the configuration.
    pub fn from_config(config: &AdvisoryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    /// Target endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn complete(&self, request: &InferenceRequest) -> Result<InferenceResponse> {
        debug!("POST {} ({} prompt bytes)", self.endpoint, request.message.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<InferenceResponse>().await?)
    }
}
