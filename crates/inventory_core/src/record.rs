//! Row records produced by parsing a dealer export.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One data row of an input file.
///
/// Keeps the column order of the header and the 1-based row number of the
/// data line it came from (header excluded). Records are created once per
/// parse pass and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    row: usize,
    values: Vec<(String, String)>,
}

impl RawRecord {
    /// Creates a record from ordered `(field, value)` pairs.
    pub fn new(row: usize, values: Vec<(String, String)>) -> Self {
        Self { row, values }
    }

    /// 1-based data row number.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns the raw value for `field`, if the column exists.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if the column exists in this record.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Returns true if `field` exists and holds a non-blank value.
    pub fn has_value(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.trim().is_empty())
    }

    /// Iterates over `(field, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Column names in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record has no column.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if every value is blank.
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|(_, v)| v.trim().is_empty())
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
