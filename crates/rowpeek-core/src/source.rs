//! The row source capability shared by every input format

use crate::error::Result;
use crate::row::Row;

/// Something that can produce the ordered rows of a tabular source.
///
/// Implementations return every row, fully materialized, with row 0 being the
/// first row of the source. No header row is special-cased.
pub trait RowSource {
    /// Read all rows of the source
    fn read_rows(&self) -> Result<Vec<Row>>;

    /// Read the first `n` rows of the source.
    ///
    /// The default materializes everything then truncates; formats that can
    /// stop early should override it.
    fn read_head(&self, n: usize) -> Result<Vec<Row>> {
        let mut rows = self.read_rows()?;
        rows.truncate(n);
        Ok(rows)
    }
}

/// In-memory rows act as their own source
impl RowSource for Vec<Row> {
    fn read_rows(&self) -> Result<Vec<Row>> {
        Ok(self.clone())
    }

    fn read_head(&self, n: usize) -> Result<Vec<Row>> {
        Ok(self.iter().take(n).cloned().collect())
    }
}

impl<S: RowSource + ?Sized> RowSource for &S {
    fn read_rows(&self) -> Result<Vec<Row>> {
        (**self).read_rows()
    }

    fn read_head(&self, n: usize) -> Result<Vec<Row>> {
        (**self).read_head(n)
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn read_rows(&self) -> Result<Vec<Row>> {
        (**self).read_rows()
    }

    fn read_head(&self, n: usize) -> Result<Vec<Row>> {
        (**self).read_head(n)
    }
}
