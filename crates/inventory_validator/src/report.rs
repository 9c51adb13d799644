//! Discrepancy report export.

use crate::ReportError;
use chrono::NaiveDate;
use csv::WriterBuilder;
use inventory_core::{ValidationIssue, ValidationResult};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Column header of every discrepancy report.
pub const REPORT_HEADER: [&str; 5] = ["Row", "Column", "Value", "Error", "Severity"];

/// Writes validation issues as a delimited discrepancy report.
///
/// One line per issue, in the order they were found. Cells containing the
/// delimiter, a quote or a line break are quoted.
///
/// # Example
///
/// ```rust
/// use inventory_core::ValidationIssue;
/// use inventory_validator::ReportExporter;
///
/// let issues = vec![ValidationIssue::error(2, "Shape", "xx", "Invalid shape 'xx'")];
/// let report = ReportExporter::new().render(&issues).unwrap();
///
/// assert_eq!(
///     report,
///     "Row,Column,Value,Error,Severity\n2,Shape,xx,Invalid shape 'xx',error\n"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReportExporter {
    delimiter: u8,
}

impl ReportExporter {
    /// Comma-separated exporter.
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Uses another delimiter, e.g. `b'\t'`.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Configured delimiter.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Writes the header and one line per issue into `writer`.
    pub fn write_to<W: Write>(
        &self,
        writer: W,
        issues: &[ValidationIssue],
    ) -> Result<(), ReportError> {
        let mut csv = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        csv.write_record(REPORT_HEADER)?;
        for issue in issues {
            csv.write_record([
                issue.row.to_string().as_str(),
                issue.field.as_str(),
                issue.raw_value.as_str(),
                issue.message.as_str(),
                issue.severity.as_str(),
            ])?;
        }
        csv.flush()?;

        Ok(())
    }

    /// Renders the report into a string.
    pub fn render(&self, issues: &[ValidationIssue]) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, issues)?;
        String::from_utf8(buffer).map_err(|_| ReportError::Encoding)
    }

    /// Renders the report of a result, or `None` when there is nothing to report.
    pub fn export(&self, result: &ValidationResult) -> Result<Option<String>, ReportError> {
        if result.issues.is_empty() {
            return Ok(None);
        }
        self.render(&result.issues).map(Some)
    }

    /// Writes the report to `path`, replacing any existing file.
    pub fn write_file(&self, path: &Path, issues: &[ValidationIssue]) -> Result<(), ReportError> {
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file), issues)?;
        info!(
            "Wrote discrepancy report with {} issues to {}",
            issues.len(),
            path.display()
        );
        Ok(())
    }

    /// Suggested file name for a report produced on `date`.
    pub fn default_file_name(&self, date: NaiveDate) -> String {
        let extension = if self.delimiter == b'\t' { "tsv" } else { "csv" };
        format!("validation-errors-{}.{}", date.format("%Y-%m-%d"), extension)
    }
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::new()
    }
}
