use anyhow::Result;
use colored::*;
use inventory_core::{AdvisoryResult, FieldCatalog, ValidationResult};
use inventory_ingest::{IngestionPlan, UploadReceipt};
use serde_json::json;

use crate::commands::is_json;

pub fn print_validation_report(result: &ValidationResult, format: &str) -> Result<()> {
    if is_json(format) {
        print_json(&json!({
            "summary": result.summary(),
            "missing_mandatory_columns": result.missing_mandatory_columns,
            "missing_optional_columns": result.missing_optional_columns,
            "issues": result.issues,
        }))
    } else {
        print_text_report(result);
        Ok(())
    }
}

fn print_text_report(result: &ValidationResult) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if result.is_valid() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if let Some(schema_error) = result.schema_error() {
        println!("\n{}", schema_error.to_string().red().bold());
    }

    let errors: Vec<_> = result.issues.iter().filter(|i| i.is_error()).collect();
    if !errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for (i, issue) in errors.iter().enumerate() {
            println!("  {}. {}", i + 1, issue.to_string().red());
        }
    }

    let warnings: Vec<_> = result.issues.iter().filter(|i| !i.is_error()).collect();
    if !warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for (i, issue) in warnings.iter().enumerate() {
            println!("  {}. {}", i + 1, issue.to_string().yellow());
        }
    }

    let summary = result.summary();
    println!("\n{}", "Summary:".bold());
    println!("  Total rows:     {}", summary.total);
    println!("  Valid rows:     {}", summary.valid);
    println!("  Invalid rows:   {}", summary.invalid);
    println!("  Total errors:   {}", summary.errors);
    println!("  Total warnings: {}", summary.warnings);
    if !result.missing_optional_columns.is_empty() {
        println!(
            "  Optional columns not present: {}",
            result.missing_optional_columns.len()
        );
    }
    println!("{}", "═".repeat(60));
}

pub fn print_advisory(advisory: &AdvisoryResult, format: &str) -> Result<()> {
    if is_json(format) {
        return print_json(&json!({ "advisory": advisory }));
    }

    println!("\n{}", "  ADVISORY".bold());
    println!("{}", "─".repeat(60));
    if advisory.is_fallback() {
        print_warning("Advisory service unavailable, showing generic guidance");
    }
    println!(
        "  Data quality score: {}",
        format!("{:.0}%", advisory.data_quality_score * 100.0).bold()
    );

    print_list("Suggestions:", &advisory.suggestions);
    print_list("Common issues:", &advisory.common_issues);
    print_list("Questions:", &advisory.follow_up_questions);

    if !advisory.auto_corrections.is_empty() {
        println!("\n{}", "Proposed corrections:".bold());
        for correction in &advisory.auto_corrections {
            println!(
                "  row {} {}: '{}' → '{}' ({:.0}%)",
                correction.row,
                correction.field,
                correction.from,
                correction.to.green(),
                correction.confidence * 100.0
            );
        }
    }
    println!("{}", "─".repeat(60));

    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}", title.bold());
    for item in items {
        println!("  • {}", item);
    }
}

pub fn print_plan(plan: &IngestionPlan, format: &str) -> Result<()> {
    if is_json(format) {
        return print_json(&json!({
            "ready": plan.batch.len(),
            "excluded_rows": plan.excluded_rows,
            "warnings": plan.warnings,
        }));
    }

    print_info(&format!("{} rows ready for upload", plan.batch.len()));
    if !plan.is_complete() {
        print_warning(&format!(
            "{} rows held back as incomplete for upload",
            plan.excluded_rows.len()
        ));
        for issue in &plan.warnings {
            println!("  {}", issue.to_string().yellow());
        }
    }

    Ok(())
}

pub fn print_receipt(receipt: &UploadReceipt, format: &str) -> Result<()> {
    if is_json(format) {
        return print_json(&json!({ "receipt": receipt }));
    }

    print_success(&format!(
        "Uploaded {} diamonds (HTTP {}) at {}",
        receipt.accepted,
        receipt.status,
        receipt.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    Ok(())
}

pub fn print_fields(catalog: &FieldCatalog, format: &str) -> Result<()> {
    if is_json(format) {
        return print_json(&json!(catalog.fields()));
    }

    println!(
        "{} {} {} {}",
        format!("{:<24}", "Field").bold(),
        format!("{:<8}", "Kind").bold(),
        format!("{:<10}", "Required").bold(),
        "Allowed values".bold()
    );
    for field in catalog.fields() {
        let required = if field.mandatory { "yes" } else { "" };
        let allowed = field
            .allowed_values
            .as_deref()
            .map(|values| values.join(", "))
            .unwrap_or_default();
        println!(
            "{:<24} {:<8} {:<10} {}",
            field.name,
            field.kind.as_str(),
            required,
            allowed
        );
    }
    println!("\n{} fields", catalog.len());

    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message.yellow());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
