//! # rowpeek-core
//!
//! Core data structures for the rowpeek previewer.
//!
//! This crate provides the pieces every input format shares:
//! - [`Row`] and [`IndexedRow`] - Rendered rows and their original positions
//! - [`CellValue`] and [`CellAddress`] - Typed cell values and A1 addressing
//! - [`RowSource`] - The capability a format reader implements
//! - [`Selection`] - Head, tail and seeded middle-sample strategies
//! - [`PreviewDocument`] - The XML preview, rendered and parsed
//!
//! ## Example
//!
//! ```rust
//! use rowpeek_core::{Row, Selection};
//!
//! let rows: Vec<Row> = vec![
//!     Row::from(vec!["a", "b"]),
//!     Row::from(vec!["1", "2"]),
//!     Row::from(vec!["3", "4"]),
//! ];
//!
//! let doc = Selection::tail(1).preview(&rows).unwrap();
//! assert_eq!(doc.rows()[0].index, 2);
//! assert!(doc.render().unwrap().contains(r#"<row index="2">"#));
//! ```

pub mod cell;
pub mod document;
pub mod error;
pub mod row;
pub mod sample;
pub mod selection;
pub mod source;

// Re-exports for convenience
pub use cell::{format_number, CellAddress, CellError, CellValue};
pub use document::PreviewDocument;
pub use error::{Error, Result};
pub use row::{IndexedRow, Row};
pub use sample::{sample_positions, SAMPLE_SEED};
pub use selection::{Selection, DEFAULT_ROW_COUNT};
pub use source::RowSource;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
