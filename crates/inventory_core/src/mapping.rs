//! Header-to-field resolution.
//!
//! Dealer systems spell their column headers in many ways ("Stock #",
//! "Carat", "Table %"). A [`ColumnMapping`] turns those headers into catalog
//! field names before records are built, so that the validator only ever
//! sees catalog names. Headers it cannot resolve are kept verbatim and are
//! therefore ignored by validation.

use crate::FieldCatalog;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, warn};

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static pattern"));

/// Common header spellings found in dealer exports.
const ALIASES: &[(&str, &str)] = &[
    ("Carat", "Weight"),
    ("Carats", "Weight"),
    ("Size", "Weight"),
    ("Stock", "VendorStockNumber"),
    ("Stock #", "VendorStockNumber"),
    ("Stock No", "VendorStockNumber"),
    ("Stock Num", "VendorStockNumber"),
    ("Stock ID", "VendorStockNumber"),
    ("SKU", "VendorStockNumber"),
    ("Cert #", "CertificateNumber"),
    ("Cert No", "CertificateNumber"),
    ("Certificate", "CertificateNumber"),
    ("Report #", "CertificateNumber"),
    ("Report No", "CertificateNumber"),
    ("Cert URL", "CertificateUrl"),
    ("Certificate Link", "CertificateUrl"),
    ("Report URL", "CertificateUrl"),
    ("Image URL", "Image"),
    ("Image Link", "Image"),
    ("Photo", "Image"),
    ("Video URL", "Video"),
    ("Video Link", "Video"),
    ("3D URL", "3DFile"),
    ("3D Link", "3DFile"),
    ("Lab Name", "Lab"),
    ("Grading Lab", "Lab"),
    ("Rap Discount", "DiscountPercent"),
    ("Rap Discount %", "DiscountPercent"),
    ("Discount", "DiscountPercent"),
    ("Table", "TablePercent"),
    ("Price Per Carat", "Price"),
    ("Fluorescence", "FluorescenceIntensity"),
    ("Fluor", "FluorescenceIntensity"),
    ("Pol", "Polish"),
    ("Sym", "Symmetry"),
    ("Comments", "MemberComments"),
];

/// Resolves input headers to catalog field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    lookup: HashMap<String, String>,
}

impl ColumnMapping {
    /// A mapping that keeps every header verbatim.
    pub fn identity() -> Self {
        Self::default()
    }

    /// A mapping that recognises every catalog field name and the built-in
    /// aliases, compared in normalized form.
    pub fn for_catalog(catalog: &FieldCatalog) -> Self {
        let mut mapping = Self::identity();

        for field in catalog.fields() {
            mapping
                .lookup
                .insert(Self::normalize(&field.name), field.name.clone());
        }

        for (alias, target) in ALIASES {
            if catalog.contains(target) {
                mapping
                    .lookup
                    .entry(Self::normalize(alias))
                    .or_insert_with(|| target.to_string());
            }
        }

        mapping
    }

    /// Adds or overrides an alias.
    pub fn with_alias(mut self, header: &str, field: impl Into<String>) -> Self {
        self.lookup.insert(Self::normalize(header), field.into());
        self
    }

    /// Returns the catalog field a header maps to, if any.
    pub fn resolve(&self, header: &str) -> Option<&str> {
        self.lookup
            .get(&Self::normalize(header))
            .map(String::as_str)
    }

    /// Maps a full header row.
    ///
    /// When two headers resolve to the same field, the first one wins and
    /// later ones keep their original spelling. Output keys are always
    /// unique: a key already taken gets a ` (2)`, ` (3)`, ... suffix, which
    /// no catalog field carries, so the extra column is never validated or
    /// uploaded under a catalog name.
    pub fn apply(&self, headers: &[String]) -> Vec<String> {
        let mut taken = HashSet::new();
        let mut mapped = Vec::with_capacity(headers.len());

        for header in headers {
            let key = match self.resolve(header) {
                Some(field) if !taken.contains(field) => {
                    if field != header {
                        debug!("Mapped column '{}' to '{}'", header, field);
                    }
                    field.to_string()
                }
                Some(field) => {
                    warn!(
                        "Column '{}' also maps to '{}', keeping the first occurrence",
                        header, field
                    );
                    header.clone()
                }
                None => header.clone(),
            };

            let key = unique_key(key, &taken);
            taken.insert(key.clone());
            mapped.push(key);
        }

        mapped
    }

    /// Lowercases, spells out `%` and `#`, and drops everything that is not
    /// a letter or digit.
    pub fn normalize(header: &str) -> String {
        let lowered = header
            .trim()
            .to_lowercase()
            .replace('%', " percent ")
            .replace('#', " number ");
        NON_ALNUM.replace_all(&lowered, "").into_owned()
    }
}

fn unique_key(key: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&key) {
        return key;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{} ({})", key, n);
        if !taken.contains(&candidate) {
            warn!("Duplicate column '{}' renamed to '{}'", key, candidate);
            return candidate;
        }
        n += 1;
    }
}
