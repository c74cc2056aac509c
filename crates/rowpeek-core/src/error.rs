//! Error types for rowpeek-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, selecting or rendering rows
#[derive(Debug, Error)]
pub enum Error {
    /// The source file does not exist
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source exists but could not be parsed (corrupt workbook, malformed CSV, ...)
    #[error("Source unreadable: {0}")]
    SourceUnreadable(String),

    /// Selection arguments outside their domain (e.g. a negative row bound)
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The preview document could not be written
    #[error("Markup error: {0}")]
    Markup(String),

    /// IO error while writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new "source unreadable" error with a message
    pub fn unreadable<S: Into<String>>(msg: S) -> Self {
        Error::SourceUnreadable(msg.into())
    }

    /// Create a new "invalid selection" error with a message
    pub fn invalid_selection<S: Into<String>>(msg: S) -> Self {
        Error::InvalidSelection(msg.into())
    }

    /// Map an IO error raised while opening `path`.
    ///
    /// `NotFound` becomes [`Error::SourceNotFound`], everything else is unreadable.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::SourceNotFound(path)
        } else {
            Error::SourceUnreadable(format!("{}: {}", path.display(), err))
        }
    }
}
