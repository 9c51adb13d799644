//! Error types for validation operations.
//!
//! Field-level failures are reported as issues inside the result, never as
//! `Err`. The errors here are the fatal cases.

use inventory_parser::ParserError;
use thiserror::Error;

/// Errors that prevent a validation result from being produced.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input could not be split into header and rows
    #[error("Input could not be parsed: {0}")]
    Parse(#[from] ParserError),
}

/// Errors raised while writing a discrepancy report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Delimited writer failure
    #[error("Failed to write report: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O error
    #[error("Report I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Produced bytes were not UTF-8
    #[error("Report contains invalid UTF-8")]
    Encoding,
}
