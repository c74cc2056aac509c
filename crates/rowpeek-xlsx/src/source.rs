//! Row source over the first worksheet of a workbook

use std::path::{Path, PathBuf};

use rowpeek_core::{Result, Row, RowSource};
use tracing::debug;

use crate::error::XlsxError;
use crate::reader::{SheetScope, XlsxReader};

/// Rows of the first worksheet of an XLSX file.
///
/// Cells show their cached (computed) values; formulas without a cached
/// value come back empty. Gaps between populated rows are kept as empty rows.
#[derive(Debug, Clone)]
pub struct XlsxSource {
    path: PathBuf,
}

impl XlsxSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for XlsxSource {
    fn read_rows(&self) -> Result<Vec<Row>> {
        let workbook = XlsxReader::read_file(&self.path, SheetScope::First)
            .map_err(|e| e.into_core(&self.path))?;

        let sheet = workbook.into_first_sheet().ok_or_else(|| {
            XlsxError::InvalidFormat("workbook has no worksheets".into()).into_core(&self.path)
        })?;

        let rows = sheet.to_rows();
        debug!(
            path = %self.path.display(),
            sheet = sheet.name(),
            rows = rows.len(),
            "read xlsx rows"
        );
        Ok(rows)
    }
}
