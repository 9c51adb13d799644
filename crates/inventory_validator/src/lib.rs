//! # Diamond Inventory Validator
//!
//! Validation engine for dealer inventory exports. This crate provides the
//! deterministic core of the ingestion pipeline:
//!
//! - Per-field rules (mandatory values, enumerated codes, numeric and
//!   percentage ranges, URL shape)
//! - Header checks for missing mandatory and optional columns
//! - Row partitioning into accepted and rejected sets
//! - Discrepancy reports listing every issue
//!
//! ## Example
//!
//! ```rust
//! use inventory_core::FieldCatalog;
//! use inventory_validator::{ReportExporter, ValidationEngine};
//!
//! let engine = ValidationEngine::new(FieldCatalog::diamond());
//! let text = "Shape\tWeight\tColor\tClarity\tVendorStockNumber\tLab\tPrice\n\
//!             xx\t1.01\tG\tVS1\tSTK1\tGIA\t5000\n";
//!
//! let result = engine.validate_text(text).unwrap();
//! assert!(!result.is_valid());
//!
//! if let Some(report) = ReportExporter::new().export(&result).unwrap() {
//!     println!("{report}");
//! }
//! ```

mod engine;
mod error;
mod field;
mod report;

pub use engine::*;
pub use error::*;
pub use field::*;
pub use report::*;
