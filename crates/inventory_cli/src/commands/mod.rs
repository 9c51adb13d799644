pub mod advise;
pub mod fields;
pub mod upload;
pub mod validate;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use inventory_core::{ColumnMapping, FieldCatalog, PipelineConfig, ValidationResult};
use inventory_parser::{load_config, read_input, InputFormat, ParsedFile, RecordParser};
use inventory_validator::ValidationEngine;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Column delimiter of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    fn as_byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }
}

/// Options shared by every command that reads an export.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Path to the inventory export (TSV or CSV)
    pub file: PathBuf,

    /// Column delimiter (defaults to the config file, then the file extension)
    #[arg(short, long, value_enum)]
    pub delimiter: Option<Delimiter>,

    /// Match headers exactly instead of resolving common aliases
    #[arg(long)]
    pub exact_headers: bool,

    /// Pipeline configuration file (YAML or TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// A parsed and validated export.
pub struct Pipeline {
    pub config: PipelineConfig,
    pub catalog: FieldCatalog,
    pub parsed: ParsedFile,
    pub result: ValidationResult,
}

impl Pipeline {
    /// Loads the configuration, reads the export and validates it.
    pub fn run(input: &InputArgs) -> Result<Self> {
        let catalog = FieldCatalog::diamond();

        let config = match &input.config {
            Some(path) => load_config(path, &catalog)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        let delimiter = resolve_delimiter(input, &config)?;
        let mapping = if input.exact_headers || config.exact_headers {
            ColumnMapping::identity()
        } else {
            ColumnMapping::for_catalog(&catalog)
        };
        debug!(
            "Reading {} with delimiter {:?}",
            input.file.display(),
            delimiter as char
        );

        let text = read_input(&input.file)
            .with_context(|| format!("Failed to read input file: {}", input.file.display()))?;

        let engine = ValidationEngine::new(catalog.clone())
            .with_parser(RecordParser::new(delimiter).with_mapping(mapping));
        let parsed = engine
            .parse(&text)
            .with_context(|| format!("Failed to parse input file: {}", input.file.display()))?;
        let result = engine.validate_parsed(&parsed);

        info!(
            "Validated {}: {} of {} rows valid",
            input.file.display(),
            result.valid_rows.len(),
            result.total_rows
        );

        Ok(Self {
            config,
            catalog,
            parsed,
            result,
        })
    }
}

/// Flag first, then the config file, then the file extension, then tab.
fn resolve_delimiter(input: &InputArgs, config: &PipelineConfig) -> Result<u8> {
    if let Some(delimiter) = input.delimiter {
        return Ok(delimiter.as_byte());
    }
    if input.config.is_some() {
        return Ok(config.delimiter_byte()?);
    }
    Ok(detect_delimiter(&input.file))
}

fn detect_delimiter(path: &Path) -> u8 {
    InputFormat::detect(path)
        .map(|format| format.delimiter())
        .unwrap_or(b'\t')
}

/// Returns true if the requested output is JSON.
pub fn is_json(format: &str) -> bool {
    format.eq_ignore_ascii_case("json")
}
