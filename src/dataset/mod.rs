//! In-memory insurance records and the loader that builds them from an archive.

mod parse;

pub use parse::{COUNTY_COLUMN, ColumnIndex, TIV_2011_COLUMN, TIV_2012_COLUMN, parse_records};

use std::path::Path;

use crate::error::{ReportError, Result};
use crate::zip::CsvArchive;

/// One insured property row
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub county: String,
    pub tiv_2011: f64,
    pub tiv_2012: f64,
}

impl Record {
    pub fn new(county: impl Into<String>, tiv_2011: f64, tiv_2012: f64) -> Self {
        Self {
            county: county.into(),
            tiv_2011,
            tiv_2012,
        }
    }

    /// Change in insured value from 2011 to 2012
    pub fn delta(&self) -> f64 {
        self.tiv_2012 - self.tiv_2011
    }
}

/// Records in input order. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Open the archive at `path`, take its first CSV member and parse it.
///
/// The archive handle is dropped before parsing starts, so it is released
/// whether parsing succeeds or not.
pub async fn load_dataset(path: &Path) -> Result<Dataset> {
    let (entry, stream) = {
        let archive = CsvArchive::open(path).map_err(|e| ReportError::archive(path, e))?;
        archive
            .open_csv()
            .await
            .map_err(|e| ReportError::archive(path, e))?
    };

    tracing::debug!(
        member = %entry.file_name,
        bytes = entry.uncompressed_size,
        "Reading CSV member"
    );

    let dataset = parse_records(stream)?;
    tracing::info!(records = dataset.len(), "Loaded insurance data");
    Ok(dataset)
}
