//! # rowpeek
//!
//! Preview CSV and XLSX files as an indexed XML document.
//!
//! rowpeek reads a whole file, picks rows with a [`Selection`] and renders
//! them together with their original positions.
//!
//! ## Features
//!
//! - Head, tail and seeded middle-sample selections
//! - CSV with permissive UTF-8 decoding
//! - XLSX first-worksheet reading with cached formula values and dates
//! - A JSON metadata probe (size, row and column estimates, sheet stats)
//!
//! ## Example
//!
//! ```rust
//! use rowpeek::prelude::*;
//!
//! let rows: Vec<Row> = (0..100).map(|i| Row::from(vec![i.to_string()])).collect();
//!
//! let doc = Selection::middle(0, 100, 5).preview(&rows).unwrap();
//! assert_eq!(doc.len(), 5);
//!
//! // Reading a file goes through the format's source
//! // let doc = preview(SourceFormat::Csv, "data.csv", &Selection::head(10))?;
//! ```

pub mod metadata;
pub mod prelude;

use std::path::Path;

// Re-export core types
pub use rowpeek_core::{
    CellAddress, CellError, CellValue, Error, IndexedRow, PreviewDocument, Result, Row,
    RowSource, Selection, DEFAULT_ROW_COUNT, SAMPLE_SEED,
};

// Re-export format sources
pub use rowpeek_csv::{CsvError, CsvReadOptions, CsvSource};
pub use rowpeek_xlsx::{SheetScope, XlsxError, XlsxReader, XlsxSource};

pub use metadata::{human_size, probe, FileMetadata, SheetStats};

/// Input file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Delimited text
    Csv,
    /// Office Open XML workbook
    Xlsx,
}

impl SourceFormat {
    /// Guess the format from a file extension.
    ///
    /// `.xlsx`, `.xlsm` and `.xls` are workbooks; anything else is read as CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xls") => SourceFormat::Xlsx,
            _ => SourceFormat::Csv,
        }
    }

    /// Row source of this format for `path`
    pub fn open<P: AsRef<Path>>(self, path: P) -> Box<dyn RowSource> {
        let path = path.as_ref();
        match self {
            SourceFormat::Csv => Box::new(CsvSource::new(path)),
            SourceFormat::Xlsx => Box::new(XlsxSource::new(path)),
        }
    }
}

/// Row source for `path`, with the format taken from its extension
pub fn open_source<P: AsRef<Path>>(path: P) -> Box<dyn RowSource> {
    SourceFormat::from_path(&path).open(path)
}

/// Read `path` as `format` and apply `selection`
pub fn preview<P: AsRef<Path>>(
    format: SourceFormat,
    path: P,
    selection: &Selection,
) -> Result<PreviewDocument> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), ?format, ?selection, "previewing");
    let source = format.open(path);
    selection.preview(source.as_ref())
}
