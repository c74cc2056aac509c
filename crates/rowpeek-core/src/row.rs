//! Row types

use crate::cell::CellValue;

/// An ordered sequence of rendered cell values.
///
/// Missing cells are stored as empty strings; a row never carries type
/// information.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    /// Create a row from rendered cell texts
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Create a row by rendering typed cell values
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a CellValue>,
    {
        Self {
            cells: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Cell texts in column order
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Cell text at `col`, or the empty string past the end of the row
    pub fn cell(&self, col: usize) -> &str {
        self.cells.get(col).map(String::as_str).unwrap_or("")
    }

    /// Number of cells in row
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if row has any cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Consume the row, returning its cells
    pub fn into_cells(self) -> Vec<String> {
        self.cells
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Self::new(cells)
    }
}

impl From<Vec<&str>> for Row {
    fn from(cells: Vec<&str>) -> Self {
        Self::new(cells.into_iter().map(String::from).collect())
    }
}

impl FromIterator<String> for Row {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A row paired with its position in the full, unselected source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRow {
    /// Original 0-based row index
    pub index: usize,
    /// Row contents
    pub row: Row,
}

impl IndexedRow {
    /// Create a new indexed row
    pub fn new(index: usize, row: impl Into<Row>) -> Self {
        Self {
            index,
            row: row.into(),
        }
    }
}
