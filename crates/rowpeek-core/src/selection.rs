//! Row selection strategies
//!
//! Every strategy maps a row sequence of length `L` to ascending original
//! indices:
//!
//! - [`Selection::Head`] takes `[0, min(n, L))`
//! - [`Selection::Tail`] takes `[L - min(n, L), L)`
//! - [`Selection::Middle`] takes the section `[start, min(end, L))` whole when
//!   it holds at most `n` rows, otherwise a seeded sample of exactly `n` rows
//!   (see [`crate::sample`])
//!
//! Out-of-range bounds are clamped, never rejected.

use tracing::debug;

use crate::document::PreviewDocument;
use crate::error::{Error, Result};
use crate::row::{IndexedRow, Row};
use crate::sample::{sample_positions, SAMPLE_SEED};
use crate::source::RowSource;

/// Row count used when a request does not give one
pub const DEFAULT_ROW_COUNT: usize = 10;

/// A row-selection strategy with its bound parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The first `n` rows
    Head { n: usize },
    /// The last `n` rows
    Tail { n: usize },
    /// Up to `n` rows sampled from the section `[start, end)`
    Middle { start: usize, end: usize, n: usize },
}

impl Selection {
    /// The first `n` rows
    pub fn head(n: usize) -> Self {
        Selection::Head { n }
    }

    /// The last `n` rows
    pub fn tail(n: usize) -> Self {
        Selection::Tail { n }
    }

    /// Up to `n` rows from `[start, end)`
    pub fn middle(start: usize, end: usize, n: usize) -> Self {
        Selection::Middle { start, end, n }
    }

    /// Head selection from a signed count; counts `<= 0` select nothing
    pub fn head_from_arg(n: i64) -> Self {
        Self::head(clamp_count(n))
    }

    /// Tail selection from a signed count; counts `<= 0` select nothing
    pub fn tail_from_arg(n: i64) -> Self {
        Self::tail(clamp_count(n))
    }

    /// Middle selection from signed arguments.
    ///
    /// Negative row bounds are rejected; a non-positive sample size selects
    /// nothing.
    pub fn middle_from_args(start: i64, end: i64, n: i64) -> Result<Self> {
        let start = usize::try_from(start)
            .map_err(|_| Error::invalid_selection(format!("start row {} is negative", start)))?;
        let end = usize::try_from(end)
            .map_err(|_| Error::invalid_selection(format!("end row {} is negative", end)))?;
        Ok(Self::middle(start, end, clamp_count(n)))
    }

    /// Original indices picked from a sequence of `len` rows, ascending
    pub fn indices(&self, len: usize) -> Vec<usize> {
        match *self {
            Selection::Head { n } => (0..n.min(len)).collect(),
            Selection::Tail { n } => (len - n.min(len)..len).collect(),
            Selection::Middle { start, end, n } => {
                let end = end.min(len);
                if start >= end {
                    return Vec::new();
                }
                sample_positions(end - start, n, SAMPLE_SEED)
                    .into_iter()
                    .map(|i| start + i)
                    .collect()
            }
        }
    }

    /// Pick the selected rows out of a fully materialized sequence
    pub fn apply(&self, rows: Vec<Row>) -> Vec<IndexedRow> {
        let mut wanted = self.indices(rows.len()).into_iter().peekable();
        let mut selected = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            match wanted.peek() {
                Some(&next) if next == index => {
                    wanted.next();
                    selected.push(IndexedRow::new(index, row));
                }
                Some(_) => {}
                None => break,
            }
        }

        selected
    }

    /// Read `source` and build the preview document for this selection
    pub fn preview<S: RowSource + ?Sized>(&self, source: &S) -> Result<PreviewDocument> {
        let rows = match *self {
            Selection::Head { n } => source.read_head(n)?,
            _ => source.read_rows()?,
        };
        let total = rows.len();
        let selected = self.apply(rows);
        debug!(selection = ?self, total, selected = selected.len(), "selected rows");
        PreviewDocument::new(selected)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::head(DEFAULT_ROW_COUNT)
    }
}

fn clamp_count(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}
