//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - A typed value read from a source cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")

mod address;
mod value;

pub use address::CellAddress;
pub use value::{format_number, CellError, CellValue};
