use std::{io, path::PathBuf};

use thiserror::Error;

/// Fatal conditions raised while converting a partner export into SQL batches.
///
/// Per-value date coercion failures are deliberately absent: those values
/// become `NULL` and the run continues.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Unable to read {} as tabular data: {reason}", .path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("Batch size must be a positive integer (got {0})")]
    InvalidBatchSize(usize),

    #[error("Invalid export profile: {0}")]
    InvalidProfile(String),

    #[error("Column '{0}' appears more than once after mapping")]
    DuplicateColumn(String),

    #[error("Writing {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ConvertError::SourceUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Output {
            path: path.into(),
            source,
        }
    }
}
