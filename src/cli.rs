use clap::Parser;
use std::path::PathBuf;

use crate::driver::{
    DEFAULT_COUNT_PATH, DEFAULT_INPUT, DEFAULT_TOP_PATH, DEFAULT_TOTAL_PATH, ReportConfig,
};

#[derive(Parser, Debug)]
#[command(name = "tivreport")]
#[command(version)]
#[command(about = "Summary reports over a zipped CSV of Florida insurance records", long_about = None)]
#[command(after_help = "Examples:\n  \
  tivreport                         read FL_insurance.csv.zip, write count.txt, tiv2012.txt, most_valuable.txt\n  \
  tivreport -i data.zip --strict    fail with exit status 1 if any stage fails")]
pub struct Cli {
    /// ZIP archive containing the CSV export
    #[arg(short = 'i', long = "input", value_name = "FILE", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Where to write the distinct county count
    #[arg(long = "count-out", value_name = "FILE", default_value = DEFAULT_COUNT_PATH)]
    pub count_out: PathBuf,

    /// Where to write the total 2012 insured value
    #[arg(long = "total-out", value_name = "FILE", default_value = DEFAULT_TOTAL_PATH)]
    pub total_out: PathBuf,

    /// Where to write the counties ranked by value growth
    #[arg(long = "top-out", value_name = "FILE", default_value = DEFAULT_TOP_PATH)]
    pub top_out: PathBuf,

    /// Exit with status 1 when any stage fails
    #[arg(long)]
    pub strict: bool,

    /// More log output on stderr (-vv for debug)
    #[arg(short = 'v', action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// No log output on stderr
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    pub fn config(&self) -> ReportConfig {
        ReportConfig {
            input: self.input.clone(),
            count_path: self.count_out.clone(),
            total_path: self.total_out.clone(),
            top_path: self.top_out.clone(),
        }
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "off",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, _) => "debug",
        }
    }
}
