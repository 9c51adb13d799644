//! Per-field rule evaluation.
//!
//! Rules are applied in a fixed order, and the first rule that decides a
//! field ends the evaluation for that cell:
//! - Mandatory and empty: error
//! - Optional and empty: no issue
//! - Enum: value must be in the allow-list, ignoring case
//! - Number: positive finite decimal, below the optional maximum
//! - Percent: finite decimal within the inclusive range
//! - URL: a malformed link is only a warning

use inventory_core::{FieldCatalog, FieldKind, FieldSchema, RawRecord, ValidationIssue};
use validator::ValidateUrl;

/// Stateless evaluator of catalog rules on raw cell values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator;

impl FieldValidator {
    /// Creates a new field validator.
    pub fn new() -> Self {
        Self
    }

    /// Validates one cell.
    ///
    /// Returns zero or one issue.
    pub fn validate(
        &self,
        schema: &FieldSchema,
        row: usize,
        raw_value: &str,
    ) -> Vec<ValidationIssue> {
        self.check(schema, row, raw_value).into_iter().collect()
    }

    /// Validates every cell of a record whose column is declared in `catalog`.
    ///
    /// Undeclared columns are ignored.
    pub fn validate_record(
        &self,
        catalog: &FieldCatalog,
        record: &RawRecord,
    ) -> Vec<ValidationIssue> {
        record
            .iter()
            .filter_map(|(field, value)| {
                catalog
                    .get(field)
                    .and_then(|schema| self.check(schema, record.row(), value))
            })
            .collect()
    }

    pub(crate) fn check(
        &self,
        schema: &FieldSchema,
        row: usize,
        raw_value: &str,
    ) -> Option<ValidationIssue> {
        let value = raw_value.trim();

        if value.is_empty() {
            if schema.mandatory {
                return Some(ValidationIssue::error(
                    row,
                    &schema.name,
                    raw_value,
                    format!("{} is required", schema.name),
                ));
            }
            return None;
        }

        match schema.kind {
            FieldKind::Enum => self.check_enum(schema, row, value, raw_value),
            FieldKind::Number => self.check_number(schema, row, value, raw_value),
            FieldKind::Percent => self.check_percent(schema, row, value, raw_value),
            FieldKind::Url => self.check_url(schema, row, value, raw_value),
            FieldKind::Text => None,
        }
    }

    fn check_enum(
        &self,
        schema: &FieldSchema,
        row: usize,
        value: &str,
        raw_value: &str,
    ) -> Option<ValidationIssue> {
        if schema.allows(value) {
            return None;
        }

        let allowed = schema.allowed_values.as_deref().unwrap_or_default().join(", ");
        Some(ValidationIssue::error(
            row,
            &schema.name,
            raw_value,
            format!(
                "Invalid {} '{}' (allowed: {})",
                schema.name.to_lowercase(),
                value,
                allowed
            ),
        ))
    }

    fn check_number(
        &self,
        schema: &FieldSchema,
        row: usize,
        value: &str,
        raw_value: &str,
    ) -> Option<ValidationIssue> {
        let min = schema.lower_bound();

        let message = match parse_decimal(value) {
            Some(number) if number > min => match schema.upper_bound() {
                Some(max) if number > max => format!("{} must not exceed {}", schema.name, max),
                _ => return None,
            },
            _ if min == 0.0 => format!("{} must be a positive number", schema.name),
            _ => format!("{} must be a number greater than {}", schema.name, min),
        };

        Some(ValidationIssue::error(row, &schema.name, raw_value, message))
    }

    fn check_percent(
        &self,
        schema: &FieldSchema,
        row: usize,
        value: &str,
        raw_value: &str,
    ) -> Option<ValidationIssue> {
        let min = schema.lower_bound();
        let max = schema.upper_bound().unwrap_or(100.0);

        match parse_decimal(value) {
            Some(number) if (min..=max).contains(&number) => None,
            _ => Some(ValidationIssue::error(
                row,
                &schema.name,
                raw_value,
                format!(
                    "{} must be a percentage between {} and {}",
                    schema.name, min, max
                ),
            )),
        }
    }

    fn check_url(
        &self,
        schema: &FieldSchema,
        row: usize,
        value: &str,
        raw_value: &str,
    ) -> Option<ValidationIssue> {
        if is_web_url(value) {
            return None;
        }

        Some(ValidationIssue::warning(
            row,
            &schema.name,
            raw_value,
            format!("{} is not a valid URL", schema.name),
        ))
    }
}

/// Parses a finite decimal number.
fn parse_decimal(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Returns true for well-formed http(s) links.
fn is_web_url(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase();
    if !(lowered.starts_with("http://") || lowered.starts_with("https://")) {
        return false;
    }
    value.to_string().validate_url()
}
