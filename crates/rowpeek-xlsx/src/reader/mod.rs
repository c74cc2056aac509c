//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, warn};

use crate::date::date_cell;
use crate::error::{XlsxError, XlsxResult};
use crate::sheet::{Sheet, Workbook};
use crate::styles::{read_styles_xml, DateStyles};
use rowpeek_core::{CellAddress, CellError, CellValue};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut saw_x = false;
        let mut decoded = None;

        if chars.peek() == Some(&'x') {
            chars.next();
            saw_x = true;

            while hex_chars.len() < 4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                chars.next();
                decoded = u32::from_str_radix(&hex_chars, 16)
                    .ok()
                    .and_then(char::from_u32);
            }
        }

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                // Not a valid escape sequence, output what we consumed
                result.push('_');
                if saw_x {
                    result.push('x');
                }
                result.push_str(&hex_chars);
            }
        }
    }

    result
}

/// Which worksheets to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetScope {
    /// Only the first worksheet in workbook order
    First,
    /// Every worksheet
    All,
}

/// Workbook-level facts needed to interpret cells
struct WorkbookInfo {
    /// (sheet name, relationship id) in workbook order
    sheets: Vec<(String, String)>,
    /// Dates count from 1904-01-01 instead of 1899-12-30
    date1904: bool,
}

/// Lookups shared by every cell of a workbook
struct CellContext<'a> {
    shared_strings: &'a [String],
    styles: &'a DateStyles,
    date1904: bool,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P, scope: SheetScope) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), scope)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R, scope: SheetScope) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let styles = Self::read_styles(&mut archive)?;
        let info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let ctx = CellContext {
            shared_strings: &shared_strings,
            styles: &styles,
            date1904: info.date1904,
        };

        let limit = match scope {
            SheetScope::First => 1,
            SheetScope::All => usize::MAX,
        };

        // Chartsheets and dialog sheets have no worksheet relationship
        let worksheets: Vec<(&String, &String)> = info
            .sheets
            .iter()
            .filter_map(|(name, r_id)| sheet_paths.get(r_id).map(|path| (name, path)))
            .take(limit)
            .collect();

        let mut workbook = Workbook::new();
        for (name, path) in worksheets {
            let sheet = Self::read_worksheet(&mut archive, path, name, &ctx)?;
            debug!(
                sheet = name.as_str(),
                rows = sheet.row_count(),
                columns = sheet.column_count(),
                "read worksheet"
            );
            workbook.push(sheet);
        }

        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"si" {
                        strings.push(String::new());
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<DateStyles> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(DateStyles::default()),
        }
    }

    /// Read workbook.xml to get sheet names, rIds and the date system
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<WorkbookInfo> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut info = WorkbookInfo {
            sheets: Vec::new(),
            date1904: false,
        };

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"sheet" => {
                        let mut name = None;
                        let mut r_id = None;

                        for attr in e.attributes().flatten() {
                            match attr.key.local_name().as_ref() {
                                b"name" => {
                                    name = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                // r:id, whatever the prefix
                                b"id" if attr.key.prefix().is_some() => {
                                    r_id = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                _ => {}
                            }
                        }

                        if let (Some(name), Some(r_id)) = (name, r_id) {
                            info.sheets.push((name, r_id));
                        }
                    }
                    b"workbookPr" => {
                        info.date1904 = attr_string(&e, b"date1904")
                            .map_or(false, |s| s == "1" || s.eq_ignore_ascii_case("true"));
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(info)
    }

    /// Read workbook.xml.rels to get worksheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attr_string(&e, b"Id");
                    let target = attr_string(&e, b"Target");
                    let rel_type = attr_string(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read a worksheet's cell values from the archive
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        name: &str,
        ctx: &CellContext<'_>,
    ) -> XlsxResult<Sheet> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        let mut buf = Vec::new();
        let mut sheet = Sheet::new(name);

        // Position tracking for rows and cells that omit their `r` attribute
        let mut row_idx: Option<u32> = None;
        let mut next_col: u16 = 0;

        // Current cell state
        let mut current_addr = CellAddress::new(0, 0);
        let mut current_cell_type: Option<String> = None;
        let mut current_cell_style: Option<u32> = None;
        let mut current_value: Option<String> = None;
        let mut current_formula: Option<String> = None;
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_formula = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        row_idx = Some(Self::row_index(&e, row_idx)?);
                        next_col = 0;
                    }
                    b"c" => {
                        in_cell = true;
                        current_addr = Self::cell_address(&e, row_idx.unwrap_or(0), next_col)?;
                        current_cell_type = attr_string(&e, b"t");
                        current_cell_style = attr_string(&e, b"s").and_then(|s| s.parse().ok());
                        current_value = None;
                        current_formula = None;
                        next_col = current_addr.col.saturating_add(1);
                    }
                    b"v" if in_cell => in_value = true,
                    b"f" if in_cell => {
                        in_formula = true;
                        current_formula.get_or_insert_with(String::new);
                    }
                    b"is" if in_cell => in_inline_str = true,
                    b"rPh" if in_inline_str => in_phonetic = true,
                    b"t" if in_inline_str && !in_phonetic => {
                        in_inline_text = true;
                        current_value.get_or_insert_with(String::new);
                        current_cell_type = Some("inlineStr".to_string());
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        row_idx = Some(Self::row_index(&e, row_idx)?);
                        next_col = 0;
                    }
                    b"c" => {
                        // Valueless cell, possibly styled; only advances the column
                        let addr = Self::cell_address(&e, row_idx.unwrap_or(0), next_col)?;
                        next_col = addr.col.saturating_add(1);
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"c" => {
                        let value = Self::process_cell(
                            ctx,
                            current_addr,
                            current_cell_type.as_deref(),
                            current_value.take(),
                            current_formula.take(),
                            current_cell_style,
                        )?;
                        sheet.set(current_addr, value);
                        in_cell = false;
                    }
                    b"v" => in_value = false,
                    b"f" => in_formula = false,
                    b"is" => in_inline_str = false,
                    b"rPh" => in_phonetic = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if in_value || in_inline_text {
                        current_value
                            .get_or_insert_with(String::new)
                            .push_str(&e.unescape()?);
                    } else if in_formula {
                        current_formula
                            .get_or_insert_with(String::new)
                            .push_str(&e.unescape()?);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }

    /// 0-based index of a `<row>`, defaulting to the row after the previous one
    fn row_index(e: &BytesStart<'_>, previous: Option<u32>) -> XlsxResult<u32> {
        match attr_string(e, b"r") {
            Some(r) => {
                let r: u32 = r
                    .parse()
                    .map_err(|_| XlsxError::Parse(format!("Invalid row number: {}", r)))?;
                // 1-based to 0-based
                Ok(r.saturating_sub(1))
            }
            None => Ok(previous.map_or(0, |p| p + 1)),
        }
    }

    /// Address of a `<c>`, defaulting to the next column of the current row
    fn cell_address(e: &BytesStart<'_>, row: u32, next_col: u16) -> XlsxResult<CellAddress> {
        match attr_string(e, b"r") {
            Some(cell_ref) => CellAddress::parse(&cell_ref).map_err(|err| {
                XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, err))
            }),
            None => Ok(CellAddress::new(row, next_col)),
        }
    }

    /// Turn the raw parts of a `<c>` element into a value
    fn process_cell(
        ctx: &CellContext<'_>,
        addr: CellAddress,
        cell_type: Option<&str>,
        value: Option<String>,
        formula: Option<String>,
        style_idx: Option<u32>,
    ) -> XlsxResult<CellValue> {
        let date_styled = style_idx.map_or(false, |s| ctx.styles.is_date(s));

        let parsed = match value {
            Some(v) => Self::parse_value(ctx, addr, cell_type, &v, date_styled)?,
            None => CellValue::Empty,
        };

        // Shared-formula children carry an empty <f/>; only the cached value matters
        match formula.filter(|f| !f.is_empty()) {
            Some(f) => {
                let text = if f.starts_with('=') {
                    f
                } else {
                    format!("={}", f)
                };
                Ok(CellValue::Formula {
                    text,
                    cached_value: (!parsed.is_empty()).then(|| Box::new(parsed)),
                })
            }
            None => Ok(parsed),
        }
    }

    fn parse_value(
        ctx: &CellContext<'_>,
        addr: CellAddress,
        cell_type: Option<&str>,
        value: &str,
        date_styled: bool,
    ) -> XlsxResult<CellValue> {
        let cell_value = match cell_type {
            // Shared string
            Some("s") => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index at {}: {}", addr, value))
                })?;
                let s = ctx.shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!(
                        "Shared string index {} out of bounds at {}",
                        idx, addr
                    ))
                })?;
                CellValue::String(s.clone())
            }

            // Boolean
            Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),

            // Error
            Some("e") => CellError::parse(value)
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(value)),

            // Inline or formula string - decode Excel escape sequences
            Some("inlineStr") | Some("str") => CellValue::String(decode_excel_escapes(value)),

            // ISO 8601 date
            Some("d") => match parse_iso_datetime(value) {
                Some(dt) => CellValue::DateTime(dt),
                None => CellValue::string(value),
            },

            // Number (default type or explicit "n")
            None | Some("n") => match value.trim().parse::<f64>() {
                Ok(n) if date_styled => {
                    date_cell(n, ctx.date1904).unwrap_or(CellValue::Number(n))
                }
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(value),
            },

            // Unknown type - treat as string
            Some(other) => {
                warn!(cell = %addr, cell_type = other, "unknown cell type, reading as text");
                CellValue::string(value)
            }
        };

        Ok(cell_value)
    }
}

fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests;
