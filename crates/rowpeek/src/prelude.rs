//! Prelude module - common imports for rowpeek users
//!
//! ```rust
//! use rowpeek::prelude::*;
//! ```

pub use crate::{
    // Entry points
    open_source,
    preview,
    probe,
    // Cell and row types
    CellValue,
    CsvSource,
    // Error types
    Error,
    FileMetadata,
    IndexedRow,
    PreviewDocument,
    Result,
    Row,
    RowSource,
    // Selection
    Selection,
    SourceFormat,
    XlsxSource,
};
