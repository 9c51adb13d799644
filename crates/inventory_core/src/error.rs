//! Error types for the inventory core.
//!
//! Field-level problems found in dealer data are not errors in the Rust sense:
//! they are collected as [`ValidationIssue`](crate::ValidationIssue) values.
//! The types here cover malformed definitions (catalog, configuration) and the
//! file-level schema failure derived from a finished validation run.

use thiserror::Error;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised when a field catalog violates its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Two fields share the same name
    #[error("Duplicate field '{0}' in catalog")]
    DuplicateField(String),

    /// Enum field declared without any allowed value
    #[error("Enum field '{0}' has an empty allow-list")]
    EmptyAllowList(String),

    /// Non-enum field declared with an allow-list
    #[error("Field '{0}' declares allowed values but is not an enum field")]
    UnexpectedAllowList(String),

    /// Lower bound above upper bound
    #[error("Invalid range for field '{field}': min {min} is greater than max {max}")]
    InvalidRange {
        /// Field name
        field: String,
        /// Declared minimum
        min: f64,
        /// Declared maximum
        max: f64,
    },

    /// Field name is empty
    #[error("Field names cannot be empty")]
    EmptyName,
}

/// Errors raised when a pipeline configuration is incomplete or inconsistent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required value is missing
    #[error("Missing configuration value: {0}")]
    Missing(String),

    /// A value is present but unusable
    #[error("Invalid configuration value for '{key}': {message}")]
    Invalid {
        /// Configuration key
        key: String,
        /// Why the value was rejected
        message: String,
    },
}

impl ConfigError {
    /// Creates a new invalid-value error.
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// A mandatory column is entirely absent from the input header.
///
/// Per-row validation still runs when this happens, but the file as a whole
/// can never be accepted for upload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing mandatory columns: {}", missing.join(", "))]
pub struct SchemaError {
    /// Mandatory catalog fields absent from the header, in catalog order
    pub missing: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError {
            missing: vec!["Lab".to_string(), "Price".to_string()],
        };
        assert_eq!(err.to_string(), "Missing mandatory columns: Lab, Price");
    }

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::InvalidRange {
            field: "TablePercent".to_string(),
            min: 100.0,
            max: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid range for field 'TablePercent': min 100 is greater than max 0"
        );
    }
}
