//! CSV error types

use std::path::Path;

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV reading
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CsvError {
    /// Convert into the core error for a read of `path`
    pub fn into_core(self, path: &Path) -> rowpeek_core::Error {
        match self {
            CsvError::Io(e) => rowpeek_core::Error::from_io(path, e),
            other => rowpeek_core::Error::unreadable(format!("{}: {}", path.display(), other)),
        }
    }
}
