//! Detour ranking
//!
//! Attaches start/end distances to the address table, adds their sum as the
//! combined detour, and sorts ascending by it. Rows whose combined distance
//! is missing keep their relative order and sort after every measured row.

use std::cmp::Ordering;
use std::path::Path;

use log::debug;

use crate::core::engine::{END_COLUMN, START_COLUMN};
use crate::core::error::{Error, Result};
use crate::core::matrix::{Distance, DistanceMatrix};
use crate::core::table::AddressTable;

/// Output column names appended after the input columns
pub const DISTANCE_FROM_START: &str = "distance_from_start";
pub const DISTANCE_FROM_END: &str = "distance_from_end";
pub const COMBINED_DISTANCE: &str = "combined_distance";

/// One input row with its distances attached
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub record: Vec<String>,
    pub distance_from_start: Distance,
    pub distance_from_end: Distance,
    pub combined_distance: Distance,
}

/// The address table sorted by combined distance
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTable {
    headers: Vec<String>,
    rows: Vec<RankedRow>,
}

/// Sum of both legs; missing if either leg is
pub fn combined(from_start: Distance, from_end: Distance) -> Distance {
    Some(from_start? + from_end?)
}

/// Order for combined distances: ascending, missing last
fn compare_distance(a: Distance, b: Distance) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Rank `table` rows by the detour recorded in the matching N×2 `matrix`.
///
/// Row `i` of the matrix must describe row `i` of the table.
pub fn rank(table: &AddressTable, matrix: &DistanceMatrix) -> Result<RankedTable> {
    table.address_column()?;

    if matrix.shape() != (table.len(), 2) {
        let (rows, cols) = matrix.shape();
        return Err(Error::Configuration(format!(
            "distance matrix is {rows}x{cols} but the table has {} rows",
            table.len()
        )));
    }

    let mut rows: Vec<RankedRow> = table
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let from_start = matrix.get(i, START_COLUMN);
            let from_end = matrix.get(i, END_COLUMN);
            RankedRow {
                record: record.clone(),
                distance_from_start: from_start,
                distance_from_end: from_end,
                combined_distance: combined(from_start, from_end),
            }
        })
        .collect();

    rows.sort_by(|a, b| compare_distance(a.combined_distance, b.combined_distance));

    let unranked = rows.iter().filter(|r| r.combined_distance.is_none()).count();
    debug!("ranked {} rows, {unranked} without a combined distance", rows.len());

    let mut headers = table.headers().to_vec();
    headers.extend([DISTANCE_FROM_START, DISTANCE_FROM_END, COMBINED_DISTANCE].map(String::from));

    Ok(RankedTable { headers, rows })
}

/// CSV text for a distance; missing becomes an empty field
fn format_distance(distance: Distance) -> String {
    distance.map(|d| d.to_string()).unwrap_or_default()
}

impl RankedTable {
    /// Input headers followed by the three distance columns
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RankedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that ended up without a combined distance
    pub fn unranked_count(&self) -> usize {
        self.rows.iter().filter(|r| r.combined_distance.is_none()).count()
    }

    /// Write the table as CSV with a header row
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path.as_ref())?;
        writer.write_record(&self.headers)?;

        for row in &self.rows {
            let mut fields = row.record.clone();
            fields.push(format_distance(row.distance_from_start));
            fields.push(format_distance(row.distance_from_end));
            fields.push(format_distance(row.combined_distance));
            writer.write_record(&fields)?;
        }

        writer.flush()?;
        Ok(())
    }
}
