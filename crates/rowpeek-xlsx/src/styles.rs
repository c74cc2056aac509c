//! Number format lookup for cell styles
//!
//! Only one question is asked of `xl/styles.xml`: does the cell format at a
//! given `cellXfs` index display its number as a date or time?

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};

/// Per-`cellXfs` date flags
#[derive(Debug, Clone, Default)]
pub(crate) struct DateStyles {
    is_date: Vec<bool>,
}

impl DateStyles {
    /// Whether the cell style at `xf_index` uses a date/time number format
    pub(crate) fn is_date(&self, xf_index: u32) -> bool {
        self.is_date
            .get(xf_index as usize)
            .copied()
            .unwrap_or(false)
    }
}

/// Read the date flags from a styles part
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<DateStyles> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut custom_formats: HashMap<u32, String> = HashMap::new();
    let mut xf_format_ids: Vec<u32> = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"cellXfs" => in_cell_xfs = true,
                b"numFmt" => {
                    let id = attr_value(&e, b"numFmtId").and_then(|s| s.parse().ok());
                    let code = attr_value(&e, b"formatCode");
                    if let (Some(id), Some(code)) = (id, code) {
                        custom_formats.insert(id, code);
                    }
                }
                b"xf" if in_cell_xfs => {
                    let id = attr_value(&e, b"numFmtId")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0);
                    xf_format_ids.push(id);
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"cellXfs" {
                    in_cell_xfs = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let is_date = xf_format_ids
        .into_iter()
        .map(|id| match custom_formats.get(&id) {
            Some(code) => is_date_format_code(code),
            None => is_builtin_date_format(id),
        })
        .collect();

    Ok(DateStyles { is_date })
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

/// Built-in format ids 14-22 (dates and times) and 45-47 (mm:ss, [h]:mm:ss, mmss.0)
fn is_builtin_date_format(id: u32) -> bool {
    matches!(id, 14..=22 | 45..=47)
}

/// Whether a custom format code shows a date or time.
///
/// Quoted literals, backslash escapes and bracketed sections (`[Red]`,
/// `[$-409]`) are skipped before looking for date/time placeholders. Elapsed
/// time sections such as `[h]` still count.
pub(crate) fn is_date_format_code(code: &str) -> bool {
    // Only the first section describes positive numbers
    let section = code.split(';').next().unwrap_or("");
    let mut chars = section.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let inner: String = chars.by_ref().take_while(|&b| b != ']').collect();
                let lower = inner.to_ascii_lowercase();
                if !lower.is_empty() && lower.chars().all(|b| matches!(b, 'h' | 'm' | 's')) {
                    return true;
                }
            }
            'd' | 'D' | 'm' | 'M' | 'y' | 'Y' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }

    false
}
