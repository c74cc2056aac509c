//! Worksheet cell grids

use std::collections::BTreeMap;

use rowpeek_core::{CellAddress, CellValue, Row};

/// A workbook as read for previewing: worksheets in workbook order
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create an empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a worksheet
    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    /// Worksheets in workbook order
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// The first worksheet, if any
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    /// Consume the workbook, returning the first worksheet
    pub fn into_first_sheet(self) -> Option<Sheet> {
        self.sheets.into_iter().next()
    }

    /// Number of worksheets read
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }
}

/// Populated cells of one worksheet, keyed by row then column
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<u32, BTreeMap<u16, CellValue>>,
}

impl Sheet {
    /// Create an empty worksheet
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Worksheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the value at `addr`; empty values clear the cell
    pub fn set(&mut self, addr: CellAddress, value: CellValue) {
        if value.is_empty() {
            if let Some(row) = self.cells.get_mut(&addr.row) {
                row.remove(&addr.col);
                if row.is_empty() {
                    self.cells.remove(&addr.row);
                }
            }
            return;
        }
        self.cells.entry(addr.row).or_default().insert(addr.col, value);
    }

    /// Value at (`row`, `col`), 0-based
    pub fn get(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells.get(&row).and_then(|cells| cells.get(&col))
    }

    /// Row extent: last populated row index plus one, 0 when empty
    pub fn row_count(&self) -> usize {
        self.cells
            .keys()
            .next_back()
            .map_or(0, |&row| row as usize + 1)
    }

    /// Column extent: last populated column index plus one, 0 when empty
    pub fn column_count(&self) -> usize {
        self.cells
            .values()
            .filter_map(|cells| cells.keys().next_back())
            .max()
            .map_or(0, |&col| col as usize + 1)
    }

    /// Values of `row` from column 0 to its last populated column
    pub fn row_values(&self, row: u32) -> Vec<CellValue> {
        let Some(cells) = self.cells.get(&row) else {
            return Vec::new();
        };
        let width = cells.keys().next_back().map_or(0, |&col| col as usize + 1);
        let mut values = vec![CellValue::Empty; width];
        for (&col, value) in cells {
            values[col as usize] = value.clone();
        }
        values
    }

    /// Every row from row 0 to the last populated row, rendered.
    ///
    /// Rows missing between populated rows come back empty so that positions
    /// match sheet row numbers.
    pub fn to_rows(&self) -> Vec<Row> {
        (0..self.row_count() as u32)
            .map(|row| Row::from_values(&self.row_values(row)))
            .collect()
    }
}
