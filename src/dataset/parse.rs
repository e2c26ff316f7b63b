//! Header-driven parsing of the plain comma-separated insurance export.
//!
//! Fields are split on `,` with quoting disabled. Columns are located by
//! name, so the export may carry extra columns in any order.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use super::{Dataset, Record};
use crate::error::{ReportError, Result, SchemaError};

pub const COUNTY_COLUMN: &str = "county";
pub const TIV_2011_COLUMN: &str = "tiv_2011";
pub const TIV_2012_COLUMN: &str = "tiv_2012";

/// 0-based positions of the columns a [`Record`] is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub county: usize,
    pub tiv_2011: usize,
    pub tiv_2012: usize,
}

impl ColumnIndex {
    /// Resolve the required columns from the header record. Names match
    /// exactly; the first occurrence of a repeated name wins.
    pub fn from_header(header: &StringRecord) -> std::result::Result<Self, SchemaError> {
        let find = |name: &str| {
            header
                .iter()
                .enumerate()
                .position(|(i, column)| {
                    let column = if i == 0 {
                        column.strip_prefix('\u{feff}').unwrap_or(column)
                    } else {
                        column
                    };
                    column == name
                })
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            county: find(COUNTY_COLUMN)?,
            tiv_2011: find(TIV_2011_COLUMN)?,
            tiv_2012: find(TIV_2012_COLUMN)?,
        })
    }

    /// Minimum number of fields a data row needs.
    pub fn min_fields(&self) -> usize {
        self.county.max(self.tiv_2011).max(self.tiv_2012) + 1
    }

    /// Build a record from one data row. `line_no` is only used for errors.
    pub fn parse_record(&self, row: &StringRecord, line_no: usize) -> Result<Record> {
        let fields = field_count(row);
        if fields < self.min_fields() {
            return Err(ReportError::parse(
                line_no,
                format!(
                    "expected at least {} fields, found {}",
                    self.min_fields(),
                    fields
                ),
            ));
        }

        Ok(Record {
            county: row[self.county].to_string(),
            tiv_2011: parse_value(&row[self.tiv_2011], TIV_2011_COLUMN, line_no)?,
            tiv_2012: parse_value(&row[self.tiv_2012], TIV_2012_COLUMN, line_no)?,
        })
    }
}

/// Number of fields once trailing empty ones are dropped.
fn field_count(row: &StringRecord) -> usize {
    row.as_byte_record().iter().rposition(|f| !f.is_empty()).map_or(0, |i| i + 1)
}

fn parse_value(field: &str, column: &str, line_no: usize) -> Result<f64> {
    let value: f64 = field.trim().parse().map_err(|_| {
        ReportError::parse(line_no, format!("{column} is not a number: '{field}'"))
    })?;
    if !value.is_finite() {
        return Err(ReportError::parse(
            line_no,
            format!("{column} is not finite: '{field}'"),
        ));
    }
    Ok(value)
}

fn csv_error(err: csv::Error, fallback_line: usize) -> ReportError {
    let line = err
        .position()
        .map_or(fallback_line, |pos| pos.line() as usize);
    ReportError::parse(line, format!("unreadable line: {err}"))
}

/// Parse a whole CSV stream into a [`Dataset`].
///
/// The first bad row aborts the load; no partial dataset is returned.
/// Blank lines are tolerated only at the end of the stream.
pub fn parse_records<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let header = reader.headers().map_err(|e| csv_error(e, 1))?.clone();
    if header.is_empty() {
        return Err(SchemaError::MissingHeader.into());
    }
    let columns = ColumnIndex::from_header(&header)?;

    let mut records = Vec::new();
    let mut last_line = header.position().map_or(1, |pos| pos.line() as usize);

    for row in reader.records() {
        let row = row.map_err(|e| csv_error(e, last_line + 1))?;
        let line_no = row
            .position()
            .map_or(last_line + 1, |pos| pos.line() as usize);

        // The reader skips empty lines; a gap in line numbers means one was
        // followed by more data
        if line_no > last_line + 1 {
            return Err(ReportError::parse(last_line + 1, "empty row"));
        }
        last_line = line_no;

        records.push(columns.parse_record(&row, line_no)?);
    }

    Ok(Dataset::from(records))
}
