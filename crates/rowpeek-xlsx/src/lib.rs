//! # rowpeek-xlsx
//!
//! XLSX (Office Open XML) reader and row source for rowpeek.
//!
//! Only cell values are read: shared and inline strings, numbers, booleans,
//! errors, cached formula results, and numbers whose style carries a
//! date/time format. Styling beyond that is ignored.

pub mod error;
pub mod reader;
pub mod sheet;

mod date;
mod source;
mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::{SheetScope, XlsxReader};
pub use sheet::{Sheet, Workbook};
pub use source::XlsxSource;
