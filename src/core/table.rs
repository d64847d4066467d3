//! Tabular address input and ranked output
//!
//! Tables are read and written as CSV with a header row. Cell contents are
//! kept as raw strings so every input column round-trips unchanged.

use std::path::{Path, PathBuf};

use log::debug;

use crate::core::error::{Error, Result};

/// Name of the column holding candidate addresses
pub const ADDRESS_COLUMN: &str = "address";

/// Suffix inserted before the extension of the output file
pub const SORTED_SUFFIX: &str = "_sorted";

/// A CSV table with a header row
#[derive(Debug, Clone, PartialEq)]
pub struct AddressTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl AddressTable {
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { headers, records }
    }

    /// Read a CSV file. Every record must have as many fields as the header.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            Error::Configuration(format!("cannot read input file {}: {e}", path.display()))
        })?;

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let records = reader
            .records()
            .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
            .collect::<std::result::Result<Vec<Vec<String>>, csv::Error>>()?;

        debug!("read {} rows from {}", records.len(), path.display());
        Ok(Self::new(headers, records))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of a column by exact header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the address column, or a configuration error naming it
    pub fn address_column(&self) -> Result<usize> {
        self.column_index(ADDRESS_COLUMN)
            .ok_or_else(|| Error::missing_column(ADDRESS_COLUMN, &self.headers))
    }

    /// Addresses in row order
    pub fn addresses(&self) -> Result<Vec<String>> {
        let col = self.address_column()?;
        Ok(self
            .records
            .iter()
            .map(|r| r.get(col).cloned().unwrap_or_default())
            .collect())
    }
}

/// Output path for an input path: `stops.csv` becomes `stops_sorted.csv`
pub fn sorted_output_path(input: impl AsRef<Path>) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match input.extension() {
        Some(ext) => format!("{stem}{SORTED_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{SORTED_SUFFIX}"),
    };
    input.with_file_name(file_name)
}
