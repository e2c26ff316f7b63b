//! Error types shared by every stage of the report pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Header problems detected before any data row is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("CSV member has no header line")]
    MissingHeader,

    #[error("Column not found: {0}")]
    MissingColumn(String),
}

/// Pipeline error. One variant per failure kind the driver distinguishes.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The archive is missing, corrupt, or holds no readable CSV member.
    #[error("Archive error in '{}': {reason}", path.display())]
    Archive { path: PathBuf, reason: String },

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A data row could not be turned into a record. `line` is 1-based and
    /// counts the header.
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Wrap a low-level archive failure, keeping its whole cause chain.
    pub fn archive(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        ReportError::Archive {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }

    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        ReportError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
