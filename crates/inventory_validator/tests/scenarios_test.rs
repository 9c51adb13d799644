//! End-to-end validation scenarios on realistic dealer exports.

use inventory_core::{ColumnMapping, FieldCatalog, Severity, ValidationResult};
use inventory_parser::RecordParser;
use inventory_validator::{ReportExporter, ValidationEngine};
use pretty_assertions::assert_eq;

const HEADER: &str = "Shape\tWeight\tColor\tClarity\tVendorStockNumber\tLab\tPrice";

fn validate(text: &str) -> ValidationResult {
    ValidationEngine::new(FieldCatalog::diamond())
        .validate_text(text)
        .unwrap()
}

#[test]
fn test_clean_row_is_accepted() {
    let result = validate(&format!("{HEADER}\nRD\t1.01\tG\tVS1\tSTK1\tGIA\t5000\n"));

    assert!(result.is_valid());
    assert_eq!(result.valid_rows.len(), 1);
    assert!(result.issues.is_empty());
}

#[test]
fn test_unknown_shape_rejects_row() {
    let result = validate(&format!("{HEADER}\nxx\t1.01\tG\tVS1\tSTK1\tGIA\t5000\n"));

    assert!(!result.is_valid());
    assert!(result.valid_rows.is_empty());
    assert_eq!(result.issues.len(), 1);

    let issue = &result.issues[0];
    assert_eq!(issue.field, "Shape");
    assert_eq!(issue.severity, Severity::Error);
    assert!(issue.message.to_lowercase().contains("invalid shape"));
}

#[test]
fn test_negative_weight_rejects_row() {
    let result = validate(&format!("{HEADER}\nRD\t-1\tG\tVS1\tSTK1\tGIA\t5000\n"));

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].severity, Severity::Error);
    assert_eq!(result.issues[0].message, "Weight must be a positive number");
    assert_eq!(result.invalid_row_count, 1);
}

#[test]
fn test_bad_image_url_is_only_a_warning() {
    let result = validate(&format!(
        "{HEADER}\tImage\nRD\t1.01\tG\tVS1\tSTK1\tGIA\t5000\tnot-a-url\n"
    ));

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].severity, Severity::Warning);
    assert_eq!(result.valid_rows.len(), 1);
    assert!(result.is_valid());
}

#[test]
fn test_missing_lab_column_invalidates_file() {
    let result = validate(
        "Shape\tWeight\tColor\tClarity\tVendorStockNumber\tPrice\n\
         RD\t1.01\tG\tVS1\tSTK1\t5000\n",
    );

    assert_eq!(result.missing_mandatory_columns, vec!["Lab"]);
    assert!(result.issues.is_empty());
    assert_eq!(result.valid_rows.len(), 1);
    assert!(!result.is_valid());
}

#[test]
fn test_mixed_export_with_aliases_and_report() {
    let catalog = FieldCatalog::diamond();
    let parser = RecordParser::csv().with_mapping(ColumnMapping::for_catalog(&catalog));
    let engine = ValidationEngine::new(catalog).with_parser(parser);

    let text = "\
Stock #,Shape,Carat,Color,Clarity,Cut,Lab,Cert #,Price,Table %,Image URL,Comments
A-100,RD,1.01,g,vs1,EX,GIA,2141438171,5000,57,https://img.example.com/a100.jpg,\"eye clean, no BGM\"
A-101,OV,0.90,E,SI1,VG,IGI,2141438172,4200,58,,
A-102,PS,0.75,F,VVS2,,GIA,,3100,101,ftp//broken,

A-103,,1.20,H,VS2,EX,AGS,104512,7000,56.5,,
";
    let result = engine.validate_text(text).unwrap();

    assert_eq!(result.total_rows, 4);
    let accepted: Vec<&str> = result
        .valid_rows
        .iter()
        .filter_map(|r| r.get("VendorStockNumber"))
        .collect();
    assert_eq!(accepted, vec!["A-100"]);
    assert_eq!(result.invalid_row_count, 3);

    let summary: Vec<(usize, &str, Severity)> = result
        .issues
        .iter()
        .map(|i| (i.row, i.field.as_str(), i.severity))
        .collect();
    assert_eq!(
        summary,
        vec![
            (2, "Lab", Severity::Error),
            (3, "TablePercent", Severity::Error),
            (3, "Image", Severity::Warning),
            (4, "Shape", Severity::Error),
        ]
    );

    let report = ReportExporter::new().export(&result).unwrap().unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Row,Column,Value,Error,Severity");
    assert_eq!(lines[4], "4,Shape,,Shape is required,error");
}
