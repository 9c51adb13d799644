//! # Diamond Inventory Advisor
//!
//! A best-effort advisory pass on top of a finished validation run. A bounded
//! sample of issues and rows is sent to an external inference collaborator,
//! and the reply is parsed into an [`AdvisoryResult`](inventory_core::AdvisoryResult)
//! with suggestions, follow-up questions and proposed corrections.
//!
//! The pass is strictly additive: it takes the validation result by shared
//! reference, and any failure degrades to a deterministic fallback.
//!
//! ## Example
//!
//! ```rust,no_run
//! use inventory_advisor::{EnrichmentAdvisor, HttpInferenceClient};
//! use inventory_core::FieldCatalog;
//! use inventory_validator::ValidationEngine;
//!
//! # async fn run(text: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ValidationEngine::new(FieldCatalog::diamond());
//! let parsed = engine.parse(text)?;
//! let result = engine.validate_parsed(&parsed);
//!
//! let client = HttpInferenceClient::new("https://ai.example.com/chat");
//! let advisor = EnrichmentAdvisor::new(client, FieldCatalog::diamond());
//! let advisory = advisor.advise(&result, &parsed.records).await;
//!
//! println!("Quality score: {:.2}", advisory.data_quality_score);
//! # Ok(())
//! # }
//! ```

mod advisor;
mod client;
mod error;
mod extract;

pub use advisor::*;
pub use client::*;
pub use error::*;
pub use extract::*;
