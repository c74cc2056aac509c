//! XLSX error types

use std::path::Path;

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl XlsxError {
    /// Convert into the core error for a read of `path`
    pub fn into_core(self, path: &Path) -> rowpeek_core::Error {
        match self {
            XlsxError::Io(e) => rowpeek_core::Error::from_io(path, e),
            other => rowpeek_core::Error::unreadable(format!("{}: {}", path.display(), other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_core_keeps_not_found() {
        let err = XlsxError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(
            err.into_core(Path::new("book.xlsx")),
            rowpeek_core::Error::SourceNotFound(_)
        ));
    }

    #[test]
    fn test_into_core_format_errors_are_unreadable() {
        let err = XlsxError::MissingPart("xl/workbook.xml".into());
        let core = err.into_core(Path::new("book.xlsx"));
        assert_eq!(
            core.to_string(),
            "Source unreadable: book.xlsx: Missing required part: xl/workbook.xml"
        );
    }
}
