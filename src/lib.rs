//! # tivreport
//!
//! Summary reports over a zipped CSV export of Florida insurance records.
//!
//! The pipeline reads the first `.csv` member of a zip archive, parses it
//! into an in-memory [`Dataset`], and writes three reports:
//!
//! - `count.txt`: number of distinct counties
//! - `tiv2012.txt`: total insured value for 2012
//! - `most_valuable.txt`: the ten counties whose insured value grew most
//!   between 2011 and 2012
//!
//! ## Example
//!
//! ```no_run
//! use tivreport::{ReportConfig, run};
//!
//! #[tokio::main]
//! async fn main() {
//!     let summary = run(&ReportConfig::default()).await;
//!     if !summary.is_success() {
//!         eprintln!("failed stages: {:?}", summary.failed_stages());
//!     }
//! }
//! ```

pub mod cli;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod io;
pub mod report;
pub mod stats;
pub mod zip;

pub use cli::Cli;
pub use dataset::{Dataset, Record, load_dataset};
pub use driver::{ReportConfig, RunSummary, Stage, run};
pub use error::{ReportError, SchemaError};
pub use io::{LocalFileReader, MemoryReader, ReadAt};
pub use zip::{ArchiveEntry, CsvArchive};
