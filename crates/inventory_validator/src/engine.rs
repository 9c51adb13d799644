//! Main validation engine.
//!
//! This module provides the [`ValidationEngine`] that turns one export into
//! exactly one [`ValidationResult`]: the header is checked for missing
//! columns, then every cell of every row goes through the [`FieldValidator`].

use crate::{EngineError, FieldValidator};
use inventory_core::{FieldCatalog, FieldSchema, RunState, ValidationIssue, ValidationResult};
use inventory_parser::{ParsedFile, RecordParser};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Validation engine for dealer inventory exports.
///
/// The engine holds no per-run state, so one instance can validate any number
/// of files, concurrently if needed.
///
/// # Example
///
/// ```rust
/// use inventory_core::FieldCatalog;
/// use inventory_validator::ValidationEngine;
///
/// let engine = ValidationEngine::new(FieldCatalog::diamond());
/// let text = "Shape\tWeight\tColor\tClarity\tVendorStockNumber\tLab\tPrice\n\
///             RD\t1.01\tG\tVS1\tSTK1\tGIA\t5000\n";
///
/// let result = engine.validate_text(text).unwrap();
/// assert!(result.is_valid());
/// assert_eq!(result.valid_rows.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    catalog: FieldCatalog,
    parser: RecordParser,
    field_validator: FieldValidator,
}

impl ValidationEngine {
    /// Creates an engine reading tab-separated input with verbatim headers.
    pub fn new(catalog: FieldCatalog) -> Self {
        Self {
            catalog,
            parser: RecordParser::tsv(),
            field_validator: FieldValidator::new(),
        }
    }

    /// Replaces the parser, e.g. to change the delimiter or header mapping.
    pub fn with_parser(mut self, parser: RecordParser) -> Self {
        self.parser = parser;
        self
    }

    /// Catalog this engine validates against.
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Parser used for raw text.
    pub fn parser(&self) -> &RecordParser {
        &self.parser
    }

    /// Splits raw text into header and records.
    pub fn parse(&self, text: &str) -> Result<ParsedFile, EngineError> {
        Ok(self.parser.parse(text)?)
    }

    /// Parses and validates raw text in one step.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Parse` if the text has no header and data row.
    /// Field problems are never errors; they are issues in the result.
    pub fn validate_text(&self, text: &str) -> Result<ValidationResult, EngineError> {
        self.start().execute(text)
    }

    /// Starts a tracked run.
    pub fn start(&self) -> ValidationRun<'_> {
        ValidationRun {
            engine: self,
            state: RunState::Idle,
        }
    }

    /// Validates an already parsed file.
    pub fn validate_parsed(&self, parsed: &ParsedFile) -> ValidationResult {
        let started = Instant::now();

        let missing_mandatory_columns = self.missing_columns(parsed, true);
        let missing_optional_columns = self.missing_columns(parsed, false);

        // Resolved once per file instead of once per cell
        let schemas: HashMap<&str, &FieldSchema> = parsed
            .headers
            .iter()
            .filter_map(|header| {
                self.catalog
                    .get(header)
                    .map(|schema| (header.as_str(), schema))
            })
            .collect();

        let mut valid_rows = Vec::new();
        let mut invalid_row_count = 0;
        let mut issues: Vec<ValidationIssue> = Vec::new();

        for record in &parsed.records {
            let before = issues.len();

            for (field, value) in record.iter() {
                if let Some(schema) = schemas.get(field) {
                    issues.extend(self.field_validator.check(schema, record.row(), value));
                }
            }

            if issues[before..].iter().any(|issue| issue.is_error()) {
                invalid_row_count += 1;
            } else {
                valid_rows.push(record.clone());
            }
        }

        let result = ValidationResult {
            total_rows: parsed.records.len(),
            valid_rows,
            invalid_row_count,
            issues,
            missing_mandatory_columns,
            missing_optional_columns,
        };

        debug!(
            "Validated {} rows in {}ms",
            result.total_rows,
            started.elapsed().as_millis()
        );

        result
    }

    /// Catalog fields of the given kind that the header lacks, in catalog order.
    fn missing_columns(&self, parsed: &ParsedFile, mandatory: bool) -> Vec<String> {
        self.catalog
            .fields()
            .iter()
            .filter(|field| field.mandatory == mandatory)
            .filter(|field| !parsed.has_column(&field.name))
            .map(|field| field.name.clone())
            .collect()
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(FieldCatalog::diamond())
    }
}

/// A single validation run with an observable state.
///
/// Moves `Idle → Parsing → Validating → Complete`, or to `Failed` when the
/// input cannot be parsed.
#[derive(Debug)]
pub struct ValidationRun<'a> {
    engine: &'a ValidationEngine,
    state: RunState,
}

impl ValidationRun<'_> {
    /// Current state of the run.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Parses and validates `text`.
    pub fn execute(&mut self, text: &str) -> Result<ValidationResult, EngineError> {
        self.transition(RunState::Parsing);
        let parsed = match self.engine.parse(text) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.transition(RunState::Failed);
                return Err(err);
            }
        };

        self.transition(RunState::Validating);
        let result = self.engine.validate_parsed(&parsed);
        self.transition(RunState::Complete);

        info!(
            "Validation complete: {} of {} rows valid, {} errors, {} warnings",
            result.valid_rows.len(),
            result.total_rows,
            result.error_count(),
            result.warning_count()
        );

        Ok(result)
    }

    fn transition(&mut self, next: RunState) {
        debug!("Validation run {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::{CatalogBuilder, ColumnMapping, FieldSchemaBuilder, Severity};
    use pretty_assertions::assert_eq;

    const HEADER: &str = "Shape\tWeight\tColor\tClarity\tVendorStockNumber\tLab\tPrice";

    fn engine() -> ValidationEngine {
        ValidationEngine::default()
    }

    #[test]
    fn test_valid_file() {
        let text = format!("{HEADER}\nRD\t1.01\tG\tVS1\tSTK1\tGIA\t5000\n");
        let result = engine().validate_text(&text).unwrap();

        assert!(result.is_valid());
        assert_eq!(result.total_rows, 1);
        assert_eq!(result.valid_rows.len(), 1);
        assert_eq!(result.invalid_row_count, 0);
        assert!(result.issues.is_empty());
        assert!(result.missing_mandatory_columns.is_empty());
        assert_eq!(result.missing_optional_columns.len(), 45);
    }

    #[test]
    fn test_partial_failure_keeps_good_rows() {
        let text = format!(
            "{HEADER}\n\
             RD\t1.01\tG\tVS1\tSTK1\tGIA\t5000\n\
             xx\t-1\tG\tVS1\tSTK2\tGIA\t5000\n\
             PS\t0.7\tE\tIF\tSTK3\tAGS\t3100\n"
        );
        let result = engine().validate_text(&text).unwrap();

        assert!(!result.is_valid());
        assert_eq!(result.total_rows, 3);
        assert_eq!(result.invalid_row_count, 1);
        let stocks: Vec<&str> = result
            .valid_rows
            .iter()
            .filter_map(|r| r.get("VendorStockNumber"))
            .collect();
        assert_eq!(stocks, vec!["STK1", "STK3"]);

        let fields: Vec<(usize, &str)> = result
            .issues
            .iter()
            .map(|i| (i.row, i.field.as_str()))
            .collect();
        assert_eq!(fields, vec![(2, "Shape"), (2, "Weight")]);
    }

    #[test]
    fn test_warnings_do_not_invalidate_rows() {
        let text = format!("{HEADER}\tImage\nRD\t1.01\tG\tVS1\tSTK1\tGIA\t5000\tnope\n");
        let result = engine().validate_text(&text).unwrap();

        assert!(result.is_valid());
        assert_eq!(result.valid_rows.len(), 1);
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        let text = format!("{HEADER}\tSupplierNotes\nRD\t1.01\tG\tVS1\tSTK1\tGIA\t5000\t???\n");
        let result = engine().validate_text(&text).unwrap();
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_missing_columns_in_catalog_order() {
        let text = "Price\tShape\n5000\tRD\n";
        let result = engine().validate_text(text).unwrap();

        assert_eq!(
            result.missing_mandatory_columns,
            vec!["Weight", "Color", "Clarity", "VendorStockNumber", "Lab"]
        );
        assert!(!result.is_valid());
        assert_eq!(result.valid_rows.len(), 1);
        assert_eq!(
            result.schema_error().unwrap().to_string(),
            "Missing mandatory columns: Weight, Color, Clarity, VendorStockNumber, Lab"
        );
    }

    #[test]
    fn test_run_states() {
        let engine = engine();

        let mut run = engine.start();
        assert_eq!(run.state(), RunState::Idle);
        run.execute(&format!("{HEADER}\nRD\t1.01\tG\tVS1\tSTK1\tGIA\t5000\n"))
            .unwrap();
        assert_eq!(run.state(), RunState::Complete);

        let mut failed = engine.start();
        let err = failed.execute(HEADER).unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
        assert_eq!(failed.state(), RunState::Failed);
    }

    #[test]
    fn test_custom_parser_and_catalog() {
        let catalog = CatalogBuilder::new()
            .field(
                FieldSchemaBuilder::number("Weight")
                    .mandatory(true)
                    .max(10.0)
                    .build(),
            )
            .build()
            .unwrap();
        let parser = RecordParser::csv().with_mapping(ColumnMapping::for_catalog(&catalog));
        let engine = ValidationEngine::new(catalog).with_parser(parser);

        let result = engine.validate_text("Carat\n2.5\n12\n").unwrap();
        assert_eq!(result.valid_rows.len(), 1);
        assert_eq!(result.issues[0].message, "Weight must not exceed 10");
        assert_eq!(result.issues[0].row, 2);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let engine = engine();
        let text = format!("{HEADER}\nRD\tx\tG\tVS1\tSTK1\tGIA\t5000\n");
        assert_eq!(
            engine.validate_text(&text).unwrap(),
            engine.validate_text(&text).unwrap()
        );
    }
}
