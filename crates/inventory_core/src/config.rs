//! Pipeline configuration.
//!
//! Configuration files are loaded by `inventory_parser`; this module only
//! defines the shape and the consistency rules.

use crate::catalog::UPLOAD_FIELDS;
use crate::error::ConfigError;
use crate::FieldCatalog;
use serde::{Deserialize, Serialize};

/// Default cap on the number of issues sent to the advisor.
pub const DEFAULT_ADVISORY_MAX_ISSUES: usize = 10;

/// Default cap on the number of rows sent to the advisor.
pub const DEFAULT_ADVISORY_MAX_ROWS: usize = 3;

/// Default timeout for outbound calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_delimiter() -> char {
    '\t'
}

fn default_upload_fields() -> Vec<String> {
    UPLOAD_FIELDS.iter().map(|f| f.to_string()).collect()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_issues() -> usize {
    DEFAULT_ADVISORY_MAX_ISSUES
}

fn default_max_rows() -> usize {
    DEFAULT_ADVISORY_MAX_ROWS
}

/// Settings for the inference collaborator used by the advisory pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Chat endpoint URL
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of issues included in the prompt
    #[serde(default = "default_max_issues")]
    pub max_issues: usize,

    /// Maximum number of rows included in the prompt
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl AdvisoryConfig {
    /// Creates a config with default limits.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_issues: DEFAULT_ADVISORY_MAX_ISSUES,
            max_rows: DEFAULT_ADVISORY_MAX_ROWS,
        }
    }
}

/// Settings for the inventory upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Endpoint receiving `POST { "diamonds": [...] }`
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Optional bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl UploadConfig {
    /// Creates a config without authentication.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
        }
    }
}

/// Complete configuration of an ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input column delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Use headers verbatim instead of resolving aliases
    #[serde(default)]
    pub exact_headers: bool,

    /// Fields every uploaded row must fill
    #[serde(default = "default_upload_fields")]
    pub upload_fields: Vec<String>,

    /// Advisory collaborator, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<AdvisoryConfig>,

    /// Upload endpoint, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            exact_headers: false,
            upload_fields: default_upload_fields(),
            advisory: None,
            upload: None,
        }
    }
}

impl PipelineConfig {
    /// Creates a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Delimiter as a single byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter is not an ASCII character.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ConfigError::invalid(
                "delimiter",
                format!("'{}' is not an ASCII character", self.delimiter),
            ))
        }
    }

    /// Checks the configuration against a catalog.
    pub fn validate(&self, catalog: &FieldCatalog) -> Result<(), ConfigError> {
        self.delimiter_byte()?;

        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(ConfigError::invalid(
                "delimiter",
                "quotes and line breaks cannot delimit columns",
            ));
        }

        if self.upload_fields.is_empty() {
            return Err(ConfigError::invalid(
                "upload_fields",
                "at least one field is required",
            ));
        }

        if let Some(unknown) = self.upload_fields.iter().find(|f| !catalog.contains(f)) {
            return Err(ConfigError::invalid(
                "upload_fields",
                format!("'{}' is not a catalog field", unknown),
            ));
        }

        if let Some(advisory) = &self.advisory {
            check_endpoint("advisory.endpoint", &advisory.endpoint)?;
            if advisory.timeout_secs == 0 {
                return Err(ConfigError::invalid(
                    "advisory.timeout_secs",
                    "must be greater than zero",
                ));
            }
        }

        if let Some(upload) = &self.upload {
            check_endpoint("upload.endpoint", &upload.endpoint)?;
            if upload.timeout_secs == 0 {
                return Err(ConfigError::invalid(
                    "upload.timeout_secs",
                    "must be greater than zero",
                ));
            }
        }

        Ok(())
    }
}

fn check_endpoint(key: &str, endpoint: &str) -> Result<(), ConfigError> {
    if endpoint.trim().is_empty() {
        return Err(ConfigError::Missing(key.to_string()));
    }
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(ConfigError::invalid(key, "must be an http(s) URL"));
    }
    Ok(())
}

/// Builder for `PipelineConfig`.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    delimiter: Option<char>,
    exact_headers: bool,
    upload_fields: Option<Vec<String>>,
    advisory: Option<AdvisoryConfig>,
    upload: Option<UploadConfig>,
}

impl PipelineConfigBuilder {
    /// Sets the input delimiter.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Uses headers verbatim.
    pub fn exact_headers(mut self, exact: bool) -> Self {
        self.exact_headers = exact;
        self
    }

    /// Sets the upload-complete field set.
    pub fn upload_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.upload_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the advisory collaborator.
    pub fn advisory(mut self, advisory: AdvisoryConfig) -> Self {
        self.advisory = Some(advisory);
        self
    }

    /// Sets the upload endpoint.
    pub fn upload(mut self, upload: UploadConfig) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Builds and validates the configuration against `catalog`.
    pub fn build(self, catalog: &FieldCatalog) -> Result<PipelineConfig, ConfigError> {
        let config = PipelineConfig {
            delimiter: self.delimiter.unwrap_or_else(default_delimiter),
            exact_headers: self.exact_headers,
            upload_fields: self.upload_fields.unwrap_or_else(default_upload_fields),
            advisory: self.advisory,
            upload: self.upload,
        };

        config.validate(catalog)?;
        Ok(config)
    }
}
