//! Pipeline configuration loading (YAML/TOML formats).

use crate::{ParserError, Result};
use inventory_core::{FieldCatalog, PipelineConfig};
use std::path::Path;
use tracing::info;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a pipeline configuration from a YAML string.
///
/// # Example
///
/// ```rust
/// use inventory_parser::parse_config_yaml;
///
/// let yaml = r#"
/// delimiter: ","
/// upload:
///   endpoint: https://api.example.com/diamonds
/// "#;
///
/// let config = parse_config_yaml(yaml).unwrap();
/// assert_eq!(config.delimiter, ',');
/// ```
pub fn parse_config_yaml(content: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig = serde_yaml_ng::from_str(content)?;
    Ok(config)
}

/// Parse a pipeline configuration from a TOML string.
///
/// # Example
///
/// ```rust
/// use inventory_parser::parse_config_toml;
///
/// let toml = r#"
/// exact_headers = true
///
/// [advisory]
/// endpoint = "https://ai.example.com/chat"
/// "#;
///
/// let config = parse_config_toml(toml).unwrap();
/// assert!(config.exact_headers);
/// ```
pub fn parse_config_toml(content: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(config)
}

/// Detect the configuration format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `ConfigFormat::Yaml`
/// * `.toml` → `ConfigFormat::Toml`
pub fn detect_config_format(path: &Path) -> Result<ConfigFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ConfigFormat::Yaml),
        "toml" => Ok(ConfigFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a configuration file with automatic format detection.
pub fn parse_config_file(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)?;
    let format = detect_config_format(path)?;

    match format {
        ConfigFormat::Yaml => parse_config_yaml(&content),
        ConfigFormat::Toml => parse_config_toml(&content),
    }
}

/// Parse a configuration file and check it against `catalog`.
pub fn load_config(path: &Path, catalog: &FieldCatalog) -> Result<PipelineConfig> {
    let config = parse_config_file(path)?;
    config.validate(catalog)?;
    info!("Loaded pipeline configuration from {}", path.display());
    Ok(config)
}
