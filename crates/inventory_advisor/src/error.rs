//! Error types for the advisory pass.
//!
//! None of these ever leave [`EnrichmentAdvisor::advise`](crate::EnrichmentAdvisor::advise);
//! they are logged and replaced by the fallback result.

use thiserror::Error;

/// Reasons an advisory call produced no usable suggestion payload.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// The request could not be sent or the reply could not be read
    #[error("Advisory request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The collaborator answered with a non-success status
    #[error("Advisory endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// No reply within the configured time
    #[error("Advisory request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The reply did not contain a JSON object
    #[error("Advisory reply contains no JSON object")]
    MissingPayload,

    /// The embedded JSON did not match the expected shape
    #[error("Advisory payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),

    /// Any other collaborator failure
    #[error("Advisory collaborator failed: {0}")]
    Other(String),
}

/// Result type alias for advisory operations.
pub type Result<T> = std::result::Result<T, AdvisoryError>;
