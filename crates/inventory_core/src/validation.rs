//! Validation outcome types.
//!
//! A validation run produces exactly one [`ValidationResult`] for the whole
//! file. Row-level problems are carried as [`ValidationIssue`] values; only
//! `Error` issues disqualify a row.

use crate::{RawRecord, SchemaError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks the row from upload
    Error,
    /// Informational only
    Warning,
}

impl Severity {
    /// Lowercase label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem found in a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 1-based data row number
    pub row: usize,
    /// Catalog field name
    pub field: String,
    /// Raw cell value as read from the file
    pub raw_value: String,
    /// Human-readable description
    pub message: String,
    /// Error or warning
    pub severity: Severity,
}

impl ValidationIssue {
    /// Creates an error-severity issue.
    pub fn error(
        row: usize,
        field: impl Into<String>,
        raw_value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row,
            field: field.into(),
            raw_value: raw_value.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates a warning-severity issue.
    pub fn warning(
        row: usize,
        field: impl Into<String>,
        raw_value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(row, field, raw_value, message)
        }
    }

    /// Returns true for error-severity issues.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} [{}] {}: {}",
            self.row, self.severity, self.field, self.message
        )
    }
}

/// Where a validation run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Not started
    Idle,
    /// Splitting the input into records
    Parsing,
    /// Applying field rules
    Validating,
    /// A result was produced
    Complete,
    /// Parsing failed, no result exists
    Failed,
}

/// Aggregate outcome of validating one file.
///
/// Invariant: `valid_rows.len() + invalid_row_count == total_rows`, and a row
/// is in `valid_rows` iff it has no error-severity issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Number of non-blank data rows
    pub total_rows: usize,
    /// Rows without any error
    pub valid_rows: Vec<RawRecord>,
    /// Rows with at least one error
    pub invalid_row_count: usize,
    /// Every issue found, in row then column order
    pub issues: Vec<ValidationIssue>,
    /// Mandatory fields absent from the header
    pub missing_mandatory_columns: Vec<String>,
    /// Optional fields absent from the header
    pub missing_optional_columns: Vec<String>,
}

impl ValidationResult {
    /// Returns true if the file can be accepted as a whole.
    pub fn is_valid(&self) -> bool {
        self.missing_mandatory_columns.is_empty() && self.error_count() == 0
    }

    /// Number of error-severity issues.
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    /// Number of warning-severity issues.
    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    /// Returns the schema failure, if a mandatory column is absent.
    pub fn schema_error(&self) -> Option<SchemaError> {
        if self.missing_mandatory_columns.is_empty() {
            None
        } else {
            Some(SchemaError {
                missing: self.missing_mandatory_columns.clone(),
            })
        }
    }

    /// Issues recorded against a given row.
    pub fn issues_for_row(&self, row: usize) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.row == row)
    }

    /// Counts suitable for display.
    pub fn summary(&self) -> ValidationSummary {
        ValidationSummary {
            total: self.total_rows,
            valid: self.valid_rows.len(),
            invalid: self.invalid_row_count,
            errors: self.error_count(),
            warnings: self.warning_count(),
            is_valid: self.is_valid(),
        }
    }
}

/// Row and issue counts of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    /// Total data rows
    pub total: usize,
    /// Rows accepted
    pub valid: usize,
    /// Rows rejected
    pub invalid: usize,
    /// Error count
    pub errors: usize,
    /// Warning count
    pub warnings: usize,
    /// Whether the file as a whole is accepted
    pub is_valid: bool,
}
