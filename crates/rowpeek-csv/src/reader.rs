//! CSV row source

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use rowpeek_core::{Row, RowSource};
use tracing::{debug, warn};

use crate::decode::decode_lossy;
use crate::error::CsvResult;
use crate::options::CsvReadOptions;

/// CSV file row source.
///
/// Every record is a row, the first record being row 0. Records may differ in
/// length. A blank line is a row with no cells, so later rows keep their
/// line positions.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    options: CsvReadOptions,
}

impl CsvSource {
    /// Source reading `path` with default options
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_options(path, CsvReadOptions::default())
    }

    /// Source reading `path` with custom options
    pub fn with_options<P: AsRef<Path>>(path: P, options: CsvReadOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
        }
    }

    /// Path this source reads
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read records from an in-memory reader, stopping after `limit` records
    pub fn read<R: Read>(
        mut reader: R,
        options: &CsvReadOptions,
        limit: Option<usize>,
    ) -> CsvResult<Vec<Row>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::parse_bytes(&bytes, options, limit)
    }

    fn read_file(&self, limit: Option<usize>) -> CsvResult<Vec<Row>> {
        let bytes = fs::read(&self.path)?;
        let rows = Self::parse_bytes(&bytes, &self.options, limit)?;
        debug!(path = %self.path.display(), rows = rows.len(), "read csv rows");
        Ok(rows)
    }

    fn parse_bytes(
        bytes: &[u8],
        options: &CsvReadOptions,
        limit: Option<usize>,
    ) -> CsvResult<Vec<Row>> {
        let (text, dropped) = decode_lossy(bytes);
        if dropped > 0 {
            warn!(dropped, "dropped bytes that are not valid UTF-8");
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        // The csv reader skips blank lines; they are recovered from the bytes
        // consumed ahead of each record.
        let text = text.as_bytes();
        let mut rows: Vec<Row> = Vec::new();
        let mut record = csv::StringRecord::new();
        while limit.map_or(true, |n| rows.len() < n) {
            let start = csv_reader.position().byte() as usize;
            let more = csv_reader.read_record(&mut record)?;
            let end = (csv_reader.position().byte() as usize).min(text.len());

            let blank = blank_lines(text, start.min(end), end);
            rows.extend(std::iter::repeat_with(Row::default).take(blank));

            if !more {
                break;
            }
            rows.push(record.iter().map(String::from).collect());
        }

        if let Some(n) = limit {
            rows.truncate(n);
        }
        Ok(rows)
    }
}

/// Count the blank lines at the front of `text[start..end]`.
///
/// A terminator left over from the record before `start` (the `\n` of a
/// `\r\n`, or a terminator not consumed yet) is not a blank line.
fn blank_lines(text: &[u8], start: usize, end: usize) -> usize {
    let mut pos = start;
    if start > 0 {
        match text[start - 1] {
            b'\n' => {}
            b'\r' => {
                if text[pos..end].first() == Some(&b'\n') {
                    pos += 1;
                }
            }
            _ => pos += terminator_len(&text[pos..end]),
        }
    }

    let mut count = 0;
    loop {
        let len = terminator_len(&text[pos..end]);
        if len == 0 {
            return count;
        }
        pos += len;
        count += 1;
    }
}

fn terminator_len(text: &[u8]) -> usize {
    match text {
        [b'\r', b'\n', ..] => 2,
        [b'\r', ..] | [b'\n', ..] => 1,
        _ => 0,
    }
}

impl RowSource for CsvSource {
    fn read_rows(&self) -> rowpeek_core::Result<Vec<Row>> {
        self.read_file(None).map_err(|e| e.into_core(&self.path))
    }

    fn read_head(&self, n: usize) -> rowpeek_core::Result<Vec<Row>> {
        self.read_file(Some(n)).map_err(|e| e.into_core(&self.path))
    }
}
