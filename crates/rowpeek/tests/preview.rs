//! End-to-end previews through the facade

use std::io::Write;

use pretty_assertions::assert_eq;
use rowpeek::prelude::*;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn numbered_csv(rows: usize) -> NamedTempFile {
    let contents: String = (0..rows).map(|i| format!("{},row{}\n", i, i)).collect();
    csv_file(&contents)
}

#[test]
fn test_csv_head_document() {
    let file = csv_file("a,b\n1,2\n3,4\n5,6\n");
    let doc = preview(SourceFormat::Csv, file.path(), &Selection::head(2)).unwrap();

    assert_eq!(
        doc.render().unwrap(),
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rows>
  <row index="0">
    <cell column="0">a</cell>
    <cell column="1">b</cell>
  </row>
  <row index="1">
    <cell column="0">1</cell>
    <cell column="1">2</cell>
  </row>
</rows>
"#
    );
}

#[test]
fn test_csv_tail_keeps_original_indices() {
    let file = csv_file("a,b\n1,2\n3,4\n5,6\n");
    let doc = preview(SourceFormat::Csv, file.path(), &Selection::tail(2)).unwrap();

    assert_eq!(
        doc.rows(),
        &[
            IndexedRow::new(2, vec!["3", "4"]),
            IndexedRow::new(3, vec!["5", "6"]),
        ]
    );
}

#[test]
fn test_tail_larger_than_source() {
    let file = numbered_csv(3);
    let doc = preview(SourceFormat::Csv, file.path(), &Selection::tail(100)).unwrap();
    let indices: Vec<usize> = doc.rows().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_middle_sample_is_reproducible() {
    let file = numbered_csv(100);
    let selection = Selection::middle(0, 100, 5);

    let first = preview(SourceFormat::Csv, file.path(), &selection).unwrap();
    let second = preview(SourceFormat::Csv, file.path(), &selection).unwrap();
    assert_eq!(first, second);

    let indices: Vec<usize> = first.rows().iter().map(|r| r.index).collect();
    assert_eq!(indices.len(), 5);
    assert!(indices.windows(2).all(|w| w[0] < w[1]));
    assert!(indices.iter().all(|&i| i < 100));

    // Each sampled row is the row at its original position
    for row in first.rows() {
        assert_eq!(row.row.cell(0), row.index.to_string());
    }
}

#[test]
fn test_middle_section_smaller_than_sample() {
    let file = numbered_csv(20);
    let doc = preview(SourceFormat::Csv, file.path(), &Selection::middle(5, 8, 10)).unwrap();
    let indices: Vec<usize> = doc.rows().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![5, 6, 7]);
}

#[test]
fn test_render_then_parse() {
    let file = csv_file("x,\"y, z\"\n<tag>,&amp\n,\n");
    let doc = preview(SourceFormat::Csv, file.path(), &Selection::head(10)).unwrap();
    let parsed = PreviewDocument::parse(&doc.render().unwrap()).unwrap();
    assert_eq!(parsed, doc);
}

#[test]
fn test_open_source_by_extension() {
    let file = csv_file("a\nb\n");
    let rows = open_source(file.path()).read_rows().unwrap();
    assert_eq!(rows, vec![Row::from(vec!["a"]), Row::from(vec!["b"])]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.csv");
    let err = preview(SourceFormat::Csv, &path, &Selection::head(1)).unwrap_err();
    assert!(matches!(err, Error::SourceNotFound(_)));
}

#[test]
fn test_csv_read_as_workbook_is_unreadable() {
    let file = csv_file("a,b\n");
    let err = preview(SourceFormat::Xlsx, file.path(), &Selection::head(1)).unwrap_err();
    assert!(matches!(err, Error::SourceUnreadable(_)));
}

#[test]
fn test_blank_lines_keep_original_indices() {
    let file = csv_file("a\n\nb\n");
    let doc = preview(SourceFormat::Csv, file.path(), &Selection::tail(1)).unwrap();
    assert_eq!(doc.rows(), &[IndexedRow::new(2, vec!["b"])]);

    let rows = open_source(file.path()).read_rows().unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_trailing_blank_line_renders_as_empty_row() {
    let file = csv_file("a\n\n");
    let doc = preview(SourceFormat::Csv, file.path(), &Selection::head(10)).unwrap();
    assert_eq!(
        doc.render().unwrap(),
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rows>
  <row index="0">
    <cell column="0">a</cell>
  </row>
  <row index="1"/>
</rows>
"#
    );
}
