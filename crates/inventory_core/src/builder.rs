//! Builder pattern for field definitions and catalogs.
//!
//! This module provides a fluent API for assembling custom catalogs, mostly
//! useful for dealers with a reduced export and for tests.

use crate::error::Result;
use crate::{FieldCatalog, FieldKind, FieldSchema};

/// Builder for creating a [`FieldCatalog`].
///
/// # Example
///
/// ```rust
/// use inventory_core::{CatalogBuilder, FieldSchemaBuilder};
///
/// let catalog = CatalogBuilder::new()
///     .field(FieldSchemaBuilder::text("VendorStockNumber").mandatory(true).build())
///     .field(FieldSchemaBuilder::enumeration("Shape", ["RD", "PS"]).mandatory(true).build())
///     .field(FieldSchemaBuilder::number("Weight").mandatory(true).build())
///     .build()
///     .expect("valid catalog");
///
/// assert_eq!(catalog.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    fields: Vec<FieldSchema>,
}

impl CatalogBuilder {
    /// Creates an empty catalog builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the fields of an existing catalog.
    pub fn from_catalog(catalog: &FieldCatalog) -> Self {
        Self {
            fields: catalog.fields().to_vec(),
        }
    }

    /// Adds a field.
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds multiple fields.
    pub fn fields(mut self, fields: Vec<FieldSchema>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Removes a field by name, if present.
    pub fn without(mut self, name: &str) -> Self {
        self.fields.retain(|f| f.name != name);
        self
    }

    /// Builds the catalog, checking its invariants.
    pub fn build(self) -> Result<FieldCatalog> {
        FieldCatalog::new(self.fields)
    }
}

/// Builder for creating a [`FieldSchema`].
#[derive(Debug)]
pub struct FieldSchemaBuilder {
    name: String,
    kind: FieldKind,
    mandatory: bool,
    allowed_values: Option<Vec<String>>,
    min: Option<f64>,
    max: Option<f64>,
}

impl FieldSchemaBuilder {
    /// Creates a new optional field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            mandatory: false,
            allowed_values: None,
            min: None,
            max: None,
        }
    }

    /// Shorthand for a free-text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Shorthand for a positive number field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// Shorthand for a percentage field.
    pub fn percent(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Percent)
    }

    /// Shorthand for a URL field.
    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Url)
    }

    /// Shorthand for an enum field with its allow-list.
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = Self::new(name, FieldKind::Enum);
        builder.allowed_values = Some(values.into_iter().map(Into::into).collect());
        builder
    }

    /// Sets whether the field is mandatory.
    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Sets the lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Builds the field definition.
    pub fn build(self) -> FieldSchema {
        FieldSchema {
            name: self.name,
            mandatory: self.mandatory,
            kind: self.kind,
            allowed_values: self.allowed_values,
            min: self.min,
            max: self.max,
        }
    }
}
