use std::io::{Cursor, Write};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use zip::write::SimpleFileOptions;

use rowpeek_core::Row;

use super::*;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#;

fn sheet_xml(rows: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        rows
    )
}

/// Build an in-memory workbook with the given sheets and optional parts.
fn build_xlsx(
    sheets: &[(&str, String)],
    shared_strings: Option<&str>,
    styles: Option<&str>,
    workbook_pr: &str,
) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();

    let mut sheet_entries = String::new();
    let mut rel_entries = String::new();
    for (i, (name, _)) in sheets.iter().enumerate() {
        sheet_entries.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            name,
            i + 1,
            i + 1
        ));
        rel_entries.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }

    zip.start_file("xl/workbook.xml", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{}<sheets>{}</sheets></workbook>"#,
        workbook_pr, sheet_entries
    )
    .unwrap();

    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        rel_entries
    )
    .unwrap();

    for (i, (_, xml)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
    }

    if let Some(sst) = shared_strings {
        zip.start_file("xl/sharedStrings.xml", options).unwrap();
        zip.write_all(sst.as_bytes()).unwrap();
    }

    if let Some(styles) = styles {
        zip.start_file("xl/styles.xml", options).unwrap();
        zip.write_all(styles.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

fn read_first(bytes: Vec<u8>) -> Sheet {
    XlsxReader::read(Cursor::new(bytes), SheetScope::First)
        .unwrap()
        .into_first_sheet()
        .unwrap()
}

#[test]
fn test_decode_excel_escapes() {
    // Carriage return
    assert_eq!(decode_excel_escapes("Line1_x000d_Line2"), "Line1\rLine2");

    // Line feed
    assert_eq!(decode_excel_escapes("Line1_x000a_Line2"), "Line1\nLine2");

    // Tab
    assert_eq!(decode_excel_escapes("Col1_x0009_Col2"), "Col1\tCol2");

    // Escaped underscore
    assert_eq!(decode_excel_escapes("a_x005f_b"), "a_b");

    // Multiple escapes
    assert_eq!(decode_excel_escapes("a_x000d__x000a_b"), "a\r\nb");

    // No escapes
    assert_eq!(decode_excel_escapes("Hello World"), "Hello World");

    // Invalid sequences stay literal
    assert_eq!(decode_excel_escapes("snake_case"), "snake_case");
    assert_eq!(decode_excel_escapes("_x00_"), "_x00_");
    assert_eq!(decode_excel_escapes("trailing_"), "trailing_");
    assert_eq!(decode_excel_escapes("_xZZZZ_"), "_xZZZZ_");
}

#[test]
fn test_read_typed_cells() {
    let sst = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="2" uniqueCount="2">
<si><t>name</t></si><si><r><t>Ada </t></r><r><rPr><b/></rPr><t>Lovelace</t></r></si></sst>"#;

    let sheet = sheet_xml(
        r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="b"><v>1</v></c><c r="C1" t="e"><v>#DIV/0!</v></c></row>
<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2"><v>2.5</v></c><c r="C2" t="inlineStr"><is><t>inline</t></is></c></row>"#,
    );

    let sheet = read_first(build_xlsx(&[("Data", sheet)], Some(sst), None, ""));

    assert_eq!(sheet.name(), "Data");
    assert_eq!(sheet.get(0, 0), Some(&CellValue::string("name")));
    assert_eq!(sheet.get(0, 1), Some(&CellValue::Boolean(true)));
    assert_eq!(sheet.get(0, 2), Some(&CellValue::Error(CellError::Div0)));
    assert_eq!(sheet.get(1, 0), Some(&CellValue::string("Ada Lovelace")));
    assert_eq!(sheet.get(1, 1), Some(&CellValue::Number(2.5)));
    assert_eq!(sheet.get(1, 2), Some(&CellValue::string("inline")));
}

#[test]
fn test_phonetic_runs_are_skipped() {
    let sst = r#"<sst><si><t>漢字</t><rPh sb="0" eb="2"><t>かんじ</t></rPh></si></sst>"#;
    let sheet = sheet_xml(r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#);

    let sheet = read_first(build_xlsx(&[("S", sheet)], Some(sst), None, ""));
    assert_eq!(sheet.get(0, 0), Some(&CellValue::string("漢字")));
}

#[test]
fn test_shared_string_whitespace_is_kept() {
    let sst = r#"<sst><si><t xml:space="preserve">  padded  </t></si></sst>"#;
    let sheet = sheet_xml(r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#);

    let sheet = read_first(build_xlsx(&[("S", sheet)], Some(sst), None, ""));
    assert_eq!(sheet.get(0, 0), Some(&CellValue::string("  padded  ")));
}

#[test]
fn test_formula_keeps_cached_value() {
    let sheet = sheet_xml(
        r#"<row r="1"><c r="A1"><v>1</v></c><c r="B1"><f>A1*2</f><v>2</v></c><c r="C1"><f>NOW()</f></c></row>"#,
    );

    let sheet = read_first(build_xlsx(&[("S", sheet)], None, None, ""));

    let b1 = sheet.get(0, 1).unwrap();
    assert_eq!(b1.formula_text(), Some("=A1*2"));
    assert_eq!(b1.to_string(), "2");

    // No cached value
    let c1 = sheet.get(0, 2).unwrap();
    assert!(c1.is_formula());
    assert_eq!(c1.to_string(), "");
}

#[test]
fn test_shared_formula_child_reads_as_value() {
    let sheet = sheet_xml(
        r#"<row r="1"><c r="A1"><f t="shared" ref="A1:A2" si="0">1+1</f><v>2</v></c></row>
<row r="2"><c r="A2"><f t="shared" si="0"/><v>2</v></c></row>"#,
    );

    let sheet = read_first(build_xlsx(&[("S", sheet)], None, None, ""));
    assert!(sheet.get(0, 0).unwrap().is_formula());
    assert_eq!(sheet.get(1, 0), Some(&CellValue::Number(2.0)));
}

#[test]
fn test_date_styled_numbers() {
    let styles = r#"<styleSheet><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14"/></cellXfs></styleSheet>"#;
    let sheet = sheet_xml(
        r#"<row r="1"><c r="A1" s="1"><v>45292</v></c><c r="B1" s="0"><v>45292</v></c></row>"#,
    );

    let sheet = read_first(build_xlsx(&[("S", sheet)], None, Some(styles), ""));

    let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(sheet.get(0, 0), Some(&CellValue::DateTime(expected)));
    assert_eq!(sheet.get(0, 1), Some(&CellValue::Number(45292.0)));
}

#[test]
fn test_date1904_workbook() {
    let styles = r#"<styleSheet><cellXfs count="1"><xf numFmtId="14"/></cellXfs></styleSheet>"#;
    let sheet = sheet_xml(r#"<row r="1"><c r="A1" s="0"><v>1</v></c></row>"#);

    let sheet = read_first(build_xlsx(
        &[("S", sheet)],
        None,
        Some(styles),
        r#"<workbookPr date1904="1"/>"#,
    ));

    let expected = NaiveDate::from_ymd_opt(1904, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(sheet.get(0, 0), Some(&CellValue::DateTime(expected)));
}

#[test]
fn test_time_styled_numbers() {
    let styles = r#"<styleSheet><numFmts count="1"><numFmt numFmtId="164" formatCode="h:mm"/></numFmts>
<cellXfs count="3"><xf numFmtId="0"/><xf numFmtId="21"/><xf numFmtId="164"/></cellXfs></styleSheet>"#;
    let sheet = sheet_xml(
        r#"<row r="1"><c r="A1" s="1"><v>0.75</v></c><c r="B1" s="2"><v>0.5</v></c><c r="C1" s="1"><v>45292.75</v></c></row>"#,
    );

    let sheet = read_first(build_xlsx(&[("S", sheet)], None, Some(styles), ""));

    assert_eq!(
        sheet.to_rows(),
        vec![Row::from(vec!["18:00:00", "12:00:00", "2024-01-01 18:00:00"])]
    );
}

#[test]
fn test_boolean_cells_render_as_words() {
    let sheet = sheet_xml(
        r#"<row r="1"><c r="A1" t="b"><v>1</v></c><c r="B1" t="b"><v>0</v></c></row>"#,
    );

    let sheet = read_first(build_xlsx(&[("S", sheet)], None, None, ""));
    assert_eq!(sheet.to_rows(), vec![Row::from(vec!["True", "False"])]);
}

#[test]
fn test_iso_date_cells() {
    let sheet = sheet_xml(r#"<row r="1"><c r="A1" t="d"><v>2024-03-05T10:30:00</v></c></row>"#);

    let sheet = read_first(build_xlsx(&[("S", sheet)], None, None, ""));
    assert_eq!(sheet.get(0, 0).unwrap().to_string(), "2024-03-05 10:30:00");
}

#[test]
fn test_cells_without_references() {
    let sheet = sheet_xml(
        r#"<row><c><v>1</v></c><c/><c><v>3</v></c></row><row><c><v>4</v></c></row>"#,
    );

    let sheet = read_first(build_xlsx(&[("S", sheet)], None, None, ""));

    assert_eq!(sheet.get(0, 0), Some(&CellValue::Number(1.0)));
    assert_eq!(sheet.get(0, 1), None);
    assert_eq!(sheet.get(0, 2), Some(&CellValue::Number(3.0)));
    assert_eq!(sheet.get(1, 0), Some(&CellValue::Number(4.0)));
}

#[test]
fn test_first_scope_reads_one_sheet() {
    let first = sheet_xml(r#"<row r="1"><c r="A1"><v>1</v></c></row>"#);
    let second = sheet_xml(r#"<row r="1"><c r="A1"><v>2</v></c></row>"#);
    let bytes = build_xlsx(&[("One", first), ("Two", second)], None, None, "");

    let workbook = XlsxReader::read(Cursor::new(bytes.clone()), SheetScope::First).unwrap();
    assert_eq!(workbook.sheet_count(), 1);
    assert_eq!(workbook.sheets()[0].name(), "One");

    let workbook = XlsxReader::read(Cursor::new(bytes), SheetScope::All).unwrap();
    let names: Vec<&str> = workbook.sheets().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["One", "Two"]);
}

#[test]
fn test_shared_string_out_of_bounds() {
    let sheet = sheet_xml(r#"<row r="1"><c r="A1" t="s"><v>7</v></c></row>"#);
    let bytes = build_xlsx(&[("S", sheet)], Some("<sst></sst>"), None, "");

    let err = XlsxReader::read(Cursor::new(bytes), SheetScope::First).unwrap_err();
    assert!(matches!(err, XlsxError::Parse(_)));
}

#[test]
fn test_missing_content_types() {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("hello.txt", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"hi").unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    let err = XlsxReader::read(Cursor::new(bytes), SheetScope::First).unwrap_err();
    assert!(matches!(err, XlsxError::InvalidFormat(_)));
}

#[test]
fn test_not_a_zip() {
    let err = XlsxReader::read(Cursor::new(b"a,b,c\n".to_vec()), SheetScope::First).unwrap_err();
    assert!(matches!(err, XlsxError::Zip(_)));
}
