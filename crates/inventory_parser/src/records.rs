//! Delimited record parsing.

use crate::{ParserError, Result};
use csv::ReaderBuilder;
use inventory_core::{ColumnMapping, RawRecord};
use std::path::Path;
use tracing::debug;

/// Supported export layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Tab-separated (.tsv, .tab, .txt)
    Tsv,
    /// Comma-separated with RFC 4180 quoting (.csv)
    Csv,
}

impl InputFormat {
    /// Detect the export layout from a file path based on its extension.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::InvalidExtension` if the file has no extension.
    /// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
    pub fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or(ParserError::InvalidExtension)?;

        match extension.to_lowercase().as_str() {
            "tsv" | "tab" | "txt" => Ok(InputFormat::Tsv),
            "csv" => Ok(InputFormat::Csv),
            other => Err(ParserError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Column delimiter of this layout.
    pub fn delimiter(&self) -> u8 {
        match self {
            InputFormat::Tsv => b'\t',
            InputFormat::Csv => b',',
        }
    }
}

/// Header and data rows of one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    /// Column keys after mapping, in file order
    pub headers: Vec<String>,
    /// Non-blank data rows
    pub records: Vec<RawRecord>,
}

impl ParsedFile {
    /// Returns true if the header contains `field`.
    pub fn has_column(&self, field: &str) -> bool {
        self.headers.iter().any(|h| h == field)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there is no data row.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Splits delimited text into [`RawRecord`]s.
///
/// Tab input is split on every tab. Any other delimiter honours double-quote
/// quoting, so quoted cells may contain the delimiter.
#[derive(Debug, Clone)]
pub struct RecordParser {
    delimiter: u8,
    mapping: ColumnMapping,
}

impl RecordParser {
    /// Creates a parser for the given delimiter, keeping headers verbatim.
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            mapping: ColumnMapping::identity(),
        }
    }

    /// Tab-separated parser, matching the dealer export format.
    pub fn tsv() -> Self {
        Self::new(b'\t')
    }

    /// Comma-separated parser.
    pub fn csv() -> Self {
        Self::new(b',')
    }

    /// Parser for a detected layout.
    pub fn for_format(format: InputFormat) -> Self {
        Self::new(format.delimiter())
    }

    /// Resolves headers through `mapping`.
    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Configured delimiter.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Parses raw text.
    ///
    /// Lines holding only whitespace are skipped without taking a row
    /// number. Quoted cells may span lines, blank lines included.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::TooFewLines` when fewer than two non-empty lines
    /// (header plus one data row) are present.
    pub fn parse(&self, content: &str) -> Result<ParsedFile> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .quoting(self.delimiter != b'\t')
            .from_reader(content.as_bytes());

        let whitespace_delimiter = self.delimiter.is_ascii_whitespace();
        let mut rows = reader.records().filter(|row| match row {
            Ok(record) => {
                let blank_line = (whitespace_delimiter || record.len() == 1)
                    && record.iter().all(|cell| cell.trim().is_empty());
                !blank_line
            }
            Err(_) => true,
        });
        let header_record = match rows.next() {
            Some(record) => record?,
            None => return Err(ParserError::TooFewLines { found: 0 }),
        };
        let raw_headers: Vec<String> = header_record.iter().map(clean_value).collect();
        let headers = self.mapping.apply(&raw_headers);

        let mut records = Vec::new();
        let mut data_lines = 0;
        for row in rows {
            let row = row?;
            data_lines += 1;

            let values: Vec<(String, String)> = headers
                .iter()
                .enumerate()
                .map(|(idx, header)| (header.clone(), clean_value(row.get(idx).unwrap_or(""))))
                .collect();

            let record = RawRecord::new(data_lines, values);
            if record.is_blank() {
                debug!("Skipping blank row {}", data_lines);
                continue;
            }
            records.push(record);
        }

        if data_lines == 0 {
            return Err(ParserError::TooFewLines { found: 1 });
        }

        debug!(
            "Parsed {} columns and {} data rows ({} blank)",
            headers.len(),
            records.len(),
            data_lines - records.len()
        );

        Ok(ParsedFile { headers, records })
    }

    /// Reads and parses a file.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected, since
    /// dealer exports are frequently produced by legacy spreadsheet tools.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedFile> {
        let content = read_input(path)?;
        self.parse(&content)
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::tsv()
    }
}

/// Reads an export as text, replacing invalid UTF-8.
pub fn read_input(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// Trims a cell and removes one pair of surrounding double quotes.
fn clean_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}
