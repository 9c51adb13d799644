use anyhow::{Context, Result};
use inventory_validator::ReportExporter;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{is_json, InputArgs, Pipeline};
use crate::output;

pub fn execute(input: &InputArgs, report: Option<&Path>, format: &str) -> Result<()> {
    info!("Validating inventory file: {}", input.file.display());

    let pipeline = Pipeline::run(input)?;
    let result = &pipeline.result;

    output::print_validation_report(result, format)?;

    if let Some(target) = report {
        if result.issues.is_empty() {
            if !is_json(format) {
                output::print_info("No issues found, no report written");
            }
        } else {
            let path = report_path(target);
            ReportExporter::new()
                .write_file(&path, &result.issues)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            if !is_json(format) {
                output::print_success(&format!("Report written to {}", path.display()));
            }
        }
    }

    if !result.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}

/// Uses the default report name when `target` is a directory.
fn report_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        let today = chrono::Local::now().date_naive();
        target.join(ReportExporter::new().default_file_name(today))
    } else {
        target.to_path_buf()
    }
}
