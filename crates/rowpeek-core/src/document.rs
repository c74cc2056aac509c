//! Preview document rendering and parsing
//!
//! The document is XML with a fixed schema shared by every source format:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <rows>
//!   <row index="2">
//!     <cell column="0">3</cell>
//!     <cell column="1"/>
//!   </row>
//! </rows>
//! ```

use std::io::Write;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::row::{IndexedRow, Row};

/// Root element name
pub const ROOT_ELEMENT: &str = "rows";
/// Element name for one emitted row
pub const ROW_ELEMENT: &str = "row";
/// Row attribute carrying the original row index
pub const INDEX_ATTRIBUTE: &str = "index";
/// Element name for one cell within a row
pub const CELL_ELEMENT: &str = "cell";
/// Cell attribute carrying the 0-based column position
pub const COLUMN_ATTRIBUTE: &str = "column";

const INDENT_SIZE: usize = 2;

/// Selected rows in emission order.
///
/// Indices strictly increase, so no row appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewDocument {
    rows: Vec<IndexedRow>,
}

impl PreviewDocument {
    /// Create a document, checking that indices strictly increase
    pub fn new(rows: Vec<IndexedRow>) -> Result<Self> {
        if let Some(pair) = rows.windows(2).find(|w| w[0].index >= w[1].index) {
            return Err(Error::invalid_selection(format!(
                "row index {} emitted after {}",
                pair[1].index, pair[0].index
            )));
        }
        Ok(Self { rows })
    }

    /// Rows in emission order
    pub fn rows(&self) -> &[IndexedRow] {
        &self.rows
    }

    /// Number of emitted rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows were selected
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume the document, returning its rows
    pub fn into_rows(self) -> Vec<IndexedRow> {
        self.rows
    }

    /// Render the document to a string
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Markup(e.to_string()))
    }

    /// Write the document, declaration first, 2-space indented, newline-terminated
    pub fn write_to<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(out, b' ', INDENT_SIZE);

        write_event(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;

        if self.rows.is_empty() {
            write_event(&mut writer, Event::Empty(BytesStart::new(ROOT_ELEMENT)))?;
        } else {
            write_event(&mut writer, Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
            for indexed in &self.rows {
                write_row(&mut writer, indexed)?;
            }
            write_event(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
        }

        let mut out = writer.into_inner();
        out.write_all(b"\n")?;
        Ok(())
    }

    /// Parse a rendered document back into indexed rows
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut seen_root = false;
        let mut rows: Vec<IndexedRow> = Vec::new();
        let mut current_row: Option<(usize, Vec<String>)> = None;
        let mut current_cell: Option<String> = None;

        loop {
            let event = reader.read_event().map_err(malformed)?;
            match event {
                Event::Start(e) => match e.name().as_ref() {
                    n if n == ROOT_ELEMENT.as_bytes() && !seen_root => seen_root = true,
                    n if n == ROW_ELEMENT.as_bytes() && seen_root && current_row.is_none() => {
                        current_row = Some((parse_attribute(&e, INDEX_ATTRIBUTE)?, Vec::new()));
                    }
                    n if n == CELL_ELEMENT.as_bytes() && current_cell.is_none() => {
                        let (_, cells) = current_row
                            .as_ref()
                            .ok_or_else(|| Error::unreadable("cell outside of a row"))?;
                        check_column(&e, cells.len())?;
                        current_cell = Some(String::new());
                    }
                    other => return Err(unexpected_element(other)),
                },
                Event::Empty(e) => match e.name().as_ref() {
                    n if n == ROOT_ELEMENT.as_bytes() && !seen_root => seen_root = true,
                    n if n == ROW_ELEMENT.as_bytes() && seen_root && current_row.is_none() => {
                        let index = parse_attribute(&e, INDEX_ATTRIBUTE)?;
                        rows.push(IndexedRow::new(index, Row::default()));
                    }
                    n if n == CELL_ELEMENT.as_bytes() && current_cell.is_none() => {
                        let (_, cells) = current_row
                            .as_mut()
                            .ok_or_else(|| Error::unreadable("cell outside of a row"))?;
                        check_column(&e, cells.len())?;
                        cells.push(String::new());
                    }
                    other => return Err(unexpected_element(other)),
                },
                Event::Text(e) => {
                    if let Some(text) = current_cell.as_mut() {
                        text.push_str(&e.unescape().map_err(malformed)?);
                    }
                }
                Event::CData(e) => {
                    if let Some(text) = current_cell.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    n if n == CELL_ELEMENT.as_bytes() => {
                        if let (Some(text), Some((_, cells))) =
                            (current_cell.take(), current_row.as_mut())
                        {
                            cells.push(text);
                        }
                    }
                    n if n == ROW_ELEMENT.as_bytes() => {
                        if let Some((index, cells)) = current_row.take() {
                            rows.push(IndexedRow::new(index, Row::new(cells)));
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(Error::unreadable(format!(
                "missing <{}> root element",
                ROOT_ELEMENT
            )));
        }

        Self::new(rows).map_err(|e| Error::unreadable(e.to_string()))
    }
}

fn write_row<W: Write>(writer: &mut Writer<W>, indexed: &IndexedRow) -> Result<()> {
    let index = indexed.index.to_string();
    let mut start = BytesStart::new(ROW_ELEMENT);
    start.push_attribute((INDEX_ATTRIBUTE, index.as_str()));

    if indexed.row.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    for (col, value) in indexed.row.cells().iter().enumerate() {
        let column = col.to_string();
        let mut cell = BytesStart::new(CELL_ELEMENT);
        cell.push_attribute((COLUMN_ATTRIBUTE, column.as_str()));

        if value.is_empty() {
            write_event(writer, Event::Empty(cell))?;
        } else {
            write_event(writer, Event::Start(cell))?;
            write_event(
                writer,
                Event::Text(BytesText::from_escaped(partial_escape(value))),
            )?;
            write_event(writer, Event::End(BytesEnd::new(CELL_ELEMENT)))?;
        }
    }
    write_event(writer, Event::End(BytesEnd::new(ROW_ELEMENT)))
}

fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Markup(e.to_string()))
}

fn parse_attribute(e: &BytesStart<'_>, name: &str) -> Result<usize> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(malformed)?;
            return value.trim().parse().map_err(|_| {
                Error::unreadable(format!("attribute {}=\"{}\" is not an index", name, value))
            });
        }
    }
    Err(Error::unreadable(format!(
        "<{}> is missing its {} attribute",
        String::from_utf8_lossy(e.name().as_ref()),
        name
    )))
}

fn check_column(e: &BytesStart<'_>, expected: usize) -> Result<()> {
    let column = parse_attribute(e, COLUMN_ATTRIBUTE)?;
    if column != expected {
        return Err(Error::unreadable(format!(
            "cell column {} found where column {} was expected",
            column, expected
        )));
    }
    Ok(())
}

fn unexpected_element(name: &[u8]) -> Error {
    Error::unreadable(format!(
        "unexpected <{}> element",
        String::from_utf8_lossy(name)
    ))
}

fn malformed(e: quick_xml::Error) -> Error {
    Error::unreadable(format!("malformed preview document: {}", e))
}
