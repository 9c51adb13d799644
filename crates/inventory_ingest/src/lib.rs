//! Upload stage for validated diamond inventory.
//!
//! This crate applies the upload-readiness filter to the accepted rows of a
//! [`ValidationResult`](inventory_core::ValidationResult) and sends the
//! surviving rows to the inventory endpoint in a single batch.
//!
//! # Example
//!
//! ```no_run
//! use inventory_core::FieldCatalog;
//! use inventory_ingest::{HttpUploadClient, IngestionCoordinator};
//! use inventory_validator::ValidationEngine;
//!
//! # async fn example(text: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let result = ValidationEngine::new(FieldCatalog::diamond()).validate_text(text)?;
//!
//! let client = HttpUploadClient::new("https://api.example.com/diamonds").with_token("secret");
//! let coordinator = IngestionCoordinator::new(client);
//!
//! let plan = coordinator.plan(&result);
//! println!("{} rows ready, {} held back", plan.batch.len(), plan.excluded_rows.len());
//!
//! let receipt = coordinator.upload(&result).await?;
//! println!("Uploaded {} diamonds", receipt.accepted);
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod client;
mod coordinator;

pub use client::*;
pub use coordinator::*;

/// Error types specific to the upload stage.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The validation result does not allow an upload
    #[error(
        "Validation result is not valid ({errors} errors, {missing_columns} missing mandatory columns)"
    )]
    NotReady {
        /// Error-severity issues in the result
        errors: usize,
        /// Mandatory columns absent from the header
        missing_columns: usize,
    },

    /// No accepted row has every upload field filled in
    #[error("No rows are complete enough to upload")]
    EmptyBatch,

    /// The request could not be sent or the reply could not be read
    #[error("Upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint refused the batch
    #[error("Upload rejected with HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// The batch could not be encoded
    #[error("Failed to encode upload batch: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for upload operations.
pub type Result<T> = std::result::Result<T, UploadError>;
