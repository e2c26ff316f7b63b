//! Runs the load, aggregate and report stages in order.
//!
//! A failed load stops the run. The three report stages are independent:
//! each failure is announced on stdout and the next stage still runs.

use std::fmt;
use std::path::PathBuf;

use crate::dataset::{Dataset, load_dataset};
use crate::error::{ReportError, Result};
use crate::report::{format_count, format_top_counties, format_total, write_report};
use crate::stats::{TOP_COUNTIES_LIMIT, county_count, top_valuable_counties, total_tiv_2012};

pub const DEFAULT_INPUT: &str = "FL_insurance.csv.zip";
pub const DEFAULT_COUNT_PATH: &str = "count.txt";
pub const DEFAULT_TOTAL_PATH: &str = "tiv2012.txt";
pub const DEFAULT_TOP_PATH: &str = "most_valuable.txt";

/// Input archive and report destinations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub count_path: PathBuf,
    pub total_path: PathBuf,
    pub top_path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            count_path: PathBuf::from(DEFAULT_COUNT_PATH),
            total_path: PathBuf::from(DEFAULT_TOTAL_PATH),
            top_path: PathBuf::from(DEFAULT_TOP_PATH),
        }
    }
}

impl ReportConfig {
    /// Resolve every relative path against `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let defaults = Self::default();
        Self {
            input: dir.join(defaults.input),
            count_path: dir.join(defaults.count_path),
            total_path: dir.join(defaults.total_path),
            top_path: dir.join(defaults.top_path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    CountyCount,
    TotalTiv2012,
    MostValuable,
}

impl Stage {
    /// Line printed to stdout when the stage fails
    pub fn failure_message(self) -> &'static str {
        match self {
            Stage::Load => "ERROR: loading insurance data",
            Stage::CountyCount => "ERROR: counting counties",
            Stage::TotalTiv2012 => "ERROR: counting total insurance value in 2012",
            Stage::MostValuable => "ERROR: generating most_valuable.txt",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::CountyCount => "county-count",
            Stage::TotalTiv2012 => "tiv2012-total",
            Stage::MostValuable => "most-valuable",
        };
        f.write_str(name)
    }
}

/// What happened during one run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of records loaded, `None` when loading failed
    pub records: Option<usize>,
    pub completed: Vec<Stage>,
    pub failures: Vec<(Stage, ReportError)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_stages(&self) -> Vec<Stage> {
        self.failures.iter().map(|(stage, _)| *stage).collect()
    }

    fn finish(&mut self, stage: Stage, result: Result<()>) {
        match result {
            Ok(()) => {
                tracing::info!(%stage, "Stage completed");
                self.completed.push(stage);
            }
            Err(err) => {
                tracing::error!(%stage, error = %err, "Stage failed");
                println!("{}", stage.failure_message());
                self.failures.push((stage, err));
            }
        }
    }
}

/// Load the archive, then write the three reports.
pub async fn run(config: &ReportConfig) -> RunSummary {
    let mut summary = RunSummary::default();

    let dataset = match load_dataset(&config.input).await {
        Ok(dataset) => dataset,
        Err(err) => {
            summary.finish(Stage::Load, Err(err));
            return summary;
        }
    };
    summary.records = Some(dataset.len());
    summary.finish(Stage::Load, Ok(()));

    let result = write_county_count(&dataset, config).await;
    summary.finish(Stage::CountyCount, result);

    let result = write_total_tiv_2012(&dataset, config).await;
    summary.finish(Stage::TotalTiv2012, result);

    let result = write_most_valuable(&dataset, config).await;
    summary.finish(Stage::MostValuable, result);

    summary
}

async fn write_county_count(dataset: &Dataset, config: &ReportConfig) -> Result<()> {
    let count = county_count(dataset);
    tracing::debug!(count, "Counted distinct counties");
    write_report(&config.count_path, &format_count(count)).await
}

async fn write_total_tiv_2012(dataset: &Dataset, config: &ReportConfig) -> Result<()> {
    let total = total_tiv_2012(dataset);
    tracing::debug!(total, "Summed 2012 insured value");
    write_report(&config.total_path, &format_total(total)).await
}

async fn write_most_valuable(dataset: &Dataset, config: &ReportConfig) -> Result<()> {
    let top = top_valuable_counties(dataset, TOP_COUNTIES_LIMIT);
    tracing::debug!(rows = top.len(), "Ranked counties by TIV growth");
    write_report(&config.top_path, &format_top_counties(&top)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        let config = ReportConfig::default();
        assert_eq!(config.input, PathBuf::from("FL_insurance.csv.zip"));
        assert_eq!(config.count_path, PathBuf::from("count.txt"));
        assert_eq!(config.total_path, PathBuf::from("tiv2012.txt"));
        assert_eq!(config.top_path, PathBuf::from("most_valuable.txt"));
    }

    #[test]
    fn test_in_dir_joins_defaults() {
        let config = ReportConfig::in_dir("/data");
        assert_eq!(config.input, PathBuf::from("/data/FL_insurance.csv.zip"));
        assert_eq!(config.top_path, PathBuf::from("/data/most_valuable.txt"));
    }

    #[tokio::test]
    async fn test_missing_archive_stops_before_reports() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = ReportConfig::in_dir(temp_dir.path());

        let summary = run(&config).await;

        assert_eq!(summary.records, None);
        assert_eq!(summary.failed_stages(), vec![Stage::Load]);
        assert!(summary.completed.is_empty());
        assert!(matches!(summary.failures[0].1, ReportError::Archive { .. }));
        assert!(!config.count_path.exists());
        assert!(!config.total_path.exists());
        assert!(!config.top_path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_archive_is_archive_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = ReportConfig::in_dir(temp_dir.path());
        fs::write(&config.input, b"definitely not a zip file").unwrap();

        let summary = run(&config).await;

        assert_eq!(summary.failed_stages(), vec![Stage::Load]);
        assert!(matches!(summary.failures[0].1, ReportError::Archive { .. }));
    }

    #[test]
    fn test_stage_messages() {
        assert_eq!(
            Stage::MostValuable.failure_message(),
            "ERROR: generating most_valuable.txt"
        );
        assert_eq!(Stage::TotalTiv2012.to_string(), "tiv2012-total");
    }
}
