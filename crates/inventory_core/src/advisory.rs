//! Advisory output types.
//!
//! An [`AdvisoryResult`] is a non-authoritative suggestion layer on top of a
//! [`ValidationResult`]. Nothing in it changes which rows were accepted.

use crate::ValidationResult;
use serde::{Deserialize, Serialize};

/// Where an advisory result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorySource {
    /// Parsed from the inference collaborator's reply
    Model,
    /// Static fallback after an advisor failure
    Fallback,
}

/// A proposed cell correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCorrection {
    /// 1-based data row number
    pub row: usize,
    /// Catalog field name
    pub field: String,
    /// Value found in the file
    pub from: String,
    /// Proposed replacement
    pub to: String,
    /// Confidence in `0..=1`
    pub confidence: f64,
}

/// Suggestions produced by the advisory pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryResult {
    /// Overall quality estimate in `0..=1`
    pub data_quality_score: f64,
    /// Free-form improvement hints
    pub suggestions: Vec<String>,
    /// Questions worth asking the dealer
    pub follow_up_questions: Vec<String>,
    /// Proposed cell corrections
    pub auto_corrections: Vec<AutoCorrection>,
    /// Recurring problem patterns
    pub common_issues: Vec<String>,
    /// Model reply or fallback
    pub source: AdvisorySource,
}

impl AdvisoryResult {
    /// Deterministic result used whenever the advisor fails.
    ///
    /// The score is the share of accepted rows (1.0 for an empty file).
    pub fn fallback(result: &ValidationResult) -> Self {
        let score = if result.total_rows == 0 {
            1.0
        } else {
            result.valid_rows.len() as f64 / result.total_rows as f64
        };

        let mut suggestions = vec![
            "Review the rows listed in the discrepancy report and correct them in your source system.".to_string(),
            "Use the standard codes for Shape, Color, Clarity, Cut and Lab.".to_string(),
        ];
        if !result.missing_mandatory_columns.is_empty() {
            suggestions.push(format!(
                "Add the missing mandatory columns: {}.",
                result.missing_mandatory_columns.join(", ")
            ));
        }

        Self {
            data_quality_score: score,
            suggestions,
            follow_up_questions: vec![
                "Is this file exported with the standard column headers?".to_string(),
            ],
            auto_corrections: Vec::new(),
            common_issues: Vec::new(),
            source: AdvisorySource::Fallback,
        }
    }

    /// Returns true if this result is the static fallback.
    pub fn is_fallback(&self) -> bool {
        self.source == AdvisorySource::Fallback
    }

    /// Corrections proposed for a given row.
    pub fn corrections_for_row(&self, row: usize) -> impl Iterator<Item = &AutoCorrection> {
        self.auto_corrections.iter().filter(move |c| c.row == row)
    }
}
