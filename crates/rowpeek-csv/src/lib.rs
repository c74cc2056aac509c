//! # rowpeek-csv
//!
//! CSV row source for rowpeek.
//!
//! Text is decoded permissively: byte sequences that are not valid UTF-8 are
//! dropped instead of failing the read.

mod decode;
mod error;
mod options;
mod reader;

pub use decode::decode_lossy;
pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::CsvSource;
