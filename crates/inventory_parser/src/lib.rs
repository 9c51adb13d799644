//! Parser for dealer inventory exports and pipeline configuration files.
//!
//! The record parser turns raw delimited text (tab-separated by default) into
//! an ordered list of [`RawRecord`](inventory_core::RawRecord)s. The config
//! loader reads a [`PipelineConfig`](inventory_core::PipelineConfig) from YAML
//! or TOML.
//!
//! # Example
//!
//! ```rust
//! use inventory_parser::RecordParser;
//!
//! let text = "Shape\tWeight\nRD\t1.01\n";
//! let parsed = RecordParser::tsv().parse(text).expect("Failed to parse export");
//!
//! assert_eq!(parsed.headers, vec!["Shape", "Weight"]);
//! assert_eq!(parsed.records[0].get("Weight"), Some("1.01"));
//! ```

mod config;
mod records;

pub use config::*;
pub use records::*;

use inventory_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while parsing exports or configuration.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The input has no data row below the header
    #[error("Expected a header and at least one data row, found {found} non-empty line(s)")]
    TooFewLines {
        /// Non-empty lines found
        found: usize,
    },

    /// The delimited reader rejected the input
    #[error("Failed to read delimited data: {0}")]
    Csv(#[from] csv::Error),

    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Configuration parsed but is inconsistent
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;
