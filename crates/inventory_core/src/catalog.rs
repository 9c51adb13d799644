//! Field catalog for dealer inventory exports.
//!
//! The catalog is the static schema every uploaded file is checked against:
//! field names, which of them are mandatory, the enumerated value sets and
//! the numeric ranges. [`FieldCatalog::diamond`] returns the standard 52-field
//! diamond catalog; custom catalogs can be assembled with
//! [`CatalogBuilder`](crate::CatalogBuilder).

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fields that must carry a value in every accepted row.
pub const MANDATORY_FIELDS: [&str; 7] = [
    "Shape",
    "Weight",
    "Color",
    "Clarity",
    "VendorStockNumber",
    "Lab",
    "Price",
];

/// Shape codes.
pub const SHAPES: [&str; 10] = ["BR", "PS", "RAD", "CU", "EM", "OV", "MQ", "AS", "HT", "RD"];

/// Grading laboratories.
pub const LABS: [&str; 5] = ["GIA", "AGS", "GCAL", "EGL", "None"];

/// Clarity grades.
pub const CLARITIES: [&str; 12] = [
    "FL", "IF", "VVS1", "VVS2", "VS1", "VS2", "SI1", "SI2", "SI3", "I1", "I2", "I3",
];

/// Cut grades, shared by polish and symmetry.
pub const CUTS: [&str; 5] = ["EX", "VG", "G", "F", "P"];

/// Colour grades D through Z.
pub const COLORS: [&str; 23] = [
    "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z",
];

/// Fluorescence intensities.
pub const FLUORESCENCE: [&str; 5] = ["None", "Faint", "Medium", "Strong", "Very Strong"];

/// Fields a row must fill before it can be sent to the inventory endpoint.
///
/// Deliberately not the same set as [`MANDATORY_FIELDS`].
pub const UPLOAD_FIELDS: [&str; 9] = [
    "VendorStockNumber",
    "Shape",
    "Weight",
    "Color",
    "Clarity",
    "Cut",
    "Lab",
    "CertificateNumber",
    "Price",
];

/// How a field's raw value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// One of a fixed allow-list, compared case-insensitively
    Enum,
    /// Strictly positive decimal number
    Number,
    /// Decimal number within an inclusive percentage range
    Percent,
    /// Media or certificate link
    Url,
    /// Free text, never rejected
    Text,
}

impl FieldKind {
    /// Returns the lowercase name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Enum => "enum",
            FieldKind::Number => "number",
            FieldKind::Percent => "percent",
            FieldKind::Url => "url",
            FieldKind::Text => "text",
        }
    }
}

/// Definition of a single catalog field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name as it appears in the catalog
    pub name: String,

    /// Whether every accepted row must carry a value
    pub mandatory: bool,

    /// Value interpretation
    pub kind: FieldKind,

    /// Allowed values for enum fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,

    /// Lower bound. Exclusive for numbers, inclusive for percentages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Inclusive upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FieldSchema {
    /// Returns true if `value` is in this field's allow-list, ignoring case.
    ///
    /// Always false for fields without an allow-list.
    pub fn allows(&self, value: &str) -> bool {
        let needle = value.trim().to_uppercase();
        self.allowed_values
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|allowed| allowed.to_uppercase() == needle)
    }

    /// Returns the lower bound, falling back to the kind's default.
    pub fn lower_bound(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }

    /// Returns the upper bound, falling back to the kind's default.
    pub fn upper_bound(&self) -> Option<f64> {
        match self.kind {
            FieldKind::Percent => Some(self.max.unwrap_or(100.0)),
            _ => self.max,
        }
    }
}

/// Ordered, validated set of field definitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCatalog {
    fields: Vec<FieldSchema>,
}

impl FieldCatalog {
    /// Creates a catalog after checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a name is empty or duplicated, an enum
    /// field has no allowed values, a non-enum field carries an allow-list,
    /// or a range is inverted.
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self> {
        let mut seen = HashSet::new();

        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(CatalogError::DuplicateField(field.name.clone()));
            }

            match (field.kind, &field.allowed_values) {
                (FieldKind::Enum, None) => {
                    return Err(CatalogError::EmptyAllowList(field.name.clone()));
                }
                (FieldKind::Enum, Some(values)) if values.is_empty() => {
                    return Err(CatalogError::EmptyAllowList(field.name.clone()));
                }
                (FieldKind::Enum, Some(_)) | (_, None) => {}
                (_, Some(_)) => {
                    return Err(CatalogError::UnexpectedAllowList(field.name.clone()));
                }
            }

            if let (Some(min), Some(max)) = (field.min, field.max) {
                if min > max {
                    return Err(CatalogError::InvalidRange {
                        field: field.name.clone(),
                        min,
                        max,
                    });
                }
            }
        }

        Ok(Self { fields })
    }

    /// The standard diamond inventory catalog.
    pub fn diamond() -> Self {
        use FieldKind::*;

        let enum_field = |name: &str, values: &[&str]| FieldSchema {
            name: name.to_string(),
            mandatory: MANDATORY_FIELDS.contains(&name),
            kind: Enum,
            allowed_values: Some(values.iter().map(|v| v.to_string()).collect()),
            min: None,
            max: None,
        };
        let field = |name: &str, kind: FieldKind| FieldSchema {
            name: name.to_string(),
            mandatory: MANDATORY_FIELDS.contains(&name),
            kind,
            allowed_values: None,
            min: None,
            max: None,
        };

        let fields = vec![
            field("VendorStockNumber", Text),
            enum_field("Shape", &SHAPES),
            field("Weight", Number),
            enum_field("Color", &COLORS),
            enum_field("Clarity", &CLARITIES),
            enum_field("Cut", &CUTS),
            enum_field("Polish", &CUTS),
            enum_field("Symmetry", &CUTS),
            enum_field("FluorescenceIntensity", &FLUORESCENCE),
            field("FluorescenceColor", Text),
            enum_field("Lab", &LABS),
            field("CertificateNumber", Text),
            field("CertificateUrl", Url),
            field("Price", Number),
            field("TotalPrice", Number),
            field("DiscountPercent", Percent),
            field("Measurements", Text),
            field("Length", Number),
            field("Width", Number),
            field("Depth", Number),
            field("DepthPercent", Percent),
            field("TablePercent", Percent),
            field("CrownAngle", Number),
            field("CrownHeight", Number),
            field("PavilionAngle", Number),
            field("PavilionDepth", Number),
            field("GirdleThin", Text),
            field("GirdleThick", Text),
            field("GirdleCondition", Text),
            field("GirdlePercent", Percent),
            field("CuletSize", Text),
            field("CuletCondition", Text),
            field("Treatment", Text),
            field("FancyColor", Text),
            field("FancyColorIntensity", Text),
            field("FancyColorOvertone", Text),
            field("Shade", Text),
            field("Milky", Text),
            field("EyeClean", Text),
            field("KeyToSymbols", Text),
            field("LaserInscription", Text),
            field("Availability", Text),
            field("Country", Text),
            field("State", Text),
            field("City", Text),
            field("Image", Url),
            field("Video", Url),
            field("3DFile", Url),
            field("MemberComments", Text),
            field("PairStockNumber", Text),
            field("Brand", Text),
            field("StarLength", Percent),
        ];

        Self { fields }
    }

    /// Looks up a field by exact name.
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if the catalog declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Mandatory fields in declaration order.
    pub fn mandatory_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.mandatory)
    }

    /// Optional fields in declaration order.
    pub fn optional_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| !f.mandatory)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the catalog declares no field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::diamond()
    }
}
