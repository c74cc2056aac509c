//! File metadata probe
//!
//! [`probe`] never fails: anything that goes wrong while looking inside the
//! file is recorded in [`FileMetadata::metadata_error`] and the fields gathered
//! so far are kept.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use rowpeek_core::{Result, RowSource};
use rowpeek_csv::CsvSource;
use rowpeek_xlsx::{SheetScope, XlsxReader};

use crate::SourceFormat;

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Summary of a file, serialized as one JSON object.
///
/// Optional fields are left out of the JSON when unknown, except
/// `size_bytes` which is written as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileMetadata {
    pub file_name: String,
    /// Lower-cased, with its leading dot; empty when the name has none
    pub extension: String,
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_stats: Option<Vec<SheetStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count_estimate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count_estimate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_preview: Option<Vec<String>>,
}

/// Extent of one worksheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetStats {
    pub name: String,
    pub rows: u64,
    pub columns: u64,
}

impl FileMetadata {
    /// Single-line JSON form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Probe `path` for its metadata
pub fn probe<P: AsRef<Path>>(path: P) -> FileMetadata {
    let path = path.as_ref();

    let mut meta = FileMetadata {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        extension: path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default(),
        size_bytes: std::fs::metadata(path).ok().map(|m| m.len()),
        ..FileMetadata::default()
    };
    meta.size_human = meta.size_bytes.map(human_size);

    let outcome = match SourceFormat::from_path(path) {
        SourceFormat::Xlsx => probe_workbook(path, &mut meta),
        SourceFormat::Csv => probe_csv(path, &mut meta),
    };

    if let Err(e) = outcome {
        warn!(path = %path.display(), error = %e, "metadata probe failed");
        meta.metadata_error = Some(e.to_string());
    }

    debug!(?meta, "probed file");
    meta
}

/// Scale `bytes` by 1024 through B..PB with two decimals, e.g. `"1.50 KB"`
pub fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, SIZE_UNITS[unit])
}

fn probe_workbook(path: &Path, meta: &mut FileMetadata) -> Result<()> {
    let workbook =
        XlsxReader::read_file(path, SheetScope::All).map_err(|e| e.into_core(path))?;

    meta.sheet_stats = Some(
        workbook
            .sheets()
            .iter()
            .map(|sheet| SheetStats {
                name: sheet.name().to_string(),
                rows: sheet.row_count() as u64,
                columns: sheet.column_count() as u64,
            })
            .collect(),
    );

    let (rows, columns) = workbook
        .first_sheet()
        .map_or((0, 0), |s| (s.row_count() as u64, s.column_count() as u64));
    meta.row_count_estimate = Some(rows);
    meta.column_count_estimate = (columns > 0).then_some(columns);

    // Header shows formulas as written, padded to the sheet's width
    meta.header_preview = workbook.first_sheet().map(|sheet| {
        let mut header: Vec<String> = sheet
            .row_values(0)
            .iter()
            .map(|v| v.to_raw_string())
            .collect();
        header.resize(header.len().max(sheet.column_count()), String::new());
        header
    });

    Ok(())
}

fn probe_csv(path: &Path, meta: &mut FileMetadata) -> Result<()> {
    let lines = count_lines(path)?;
    meta.row_count_estimate = Some(lines.saturating_sub(1));

    let header = CsvSource::new(path)
        .read_head(1)?
        .into_iter()
        .next()
        .map(|row| row.into_cells())
        .unwrap_or_default();
    meta.column_count_estimate = (!header.is_empty()).then_some(header.len() as u64);
    meta.header_preview = Some(header);

    Ok(())
}

/// Physical lines, counting a final line without a terminator
fn count_lines(path: &Path) -> Result<u64> {
    let file = File::open(path).map_err(|e| rowpeek_core::Error::from_io(path, e))?;
    let mut count = 0;
    for line in BufReader::new(file).split(b'\n') {
        line.map_err(|e| rowpeek_core::Error::from_io(path, e))?;
        count += 1;
    }
    Ok(count)
}
