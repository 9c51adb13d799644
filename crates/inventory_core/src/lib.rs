//! # Diamond Inventory Core
//!
//! Core data structures for the diamond inventory ingestion engine.
//!
//! This crate provides the building blocks shared by the parser, the
//! validator, the advisory pass and the upload coordinator:
//!
//! - **FieldCatalog**: the static 52-field schema with its mandatory subset,
//!   enumerated values and numeric ranges
//! - **ColumnMapping**: resolution of dealer header spellings onto catalog names
//! - **RawRecord**: one immutable data row
//! - **ValidationResult**: the aggregate outcome of one validation run
//! - **AdvisoryResult**: non-authoritative suggestions on top of a result
//! - **PipelineConfig**: typed configuration for a full ingestion pipeline
//!
//! ## Example
//!
//! ```rust
//! use inventory_core::{FieldCatalog, FieldKind};
//!
//! let catalog = FieldCatalog::diamond();
//! let shape = catalog.get("Shape").unwrap();
//!
//! assert!(shape.mandatory);
//! assert_eq!(shape.kind, FieldKind::Enum);
//! assert!(shape.allows("rd"));
//! ```

pub mod advisory;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod mapping;
pub mod record;
pub mod validation;

pub use advisory::*;
pub use builder::*;
pub use catalog::*;
pub use config::*;
pub use error::*;
pub use mapping::*;
pub use record::*;
pub use validation::*;
