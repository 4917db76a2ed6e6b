// src/storage/snapshot.rs

//! CSV snapshot reading and writing.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{FIELD_NAMES, InspectionRecord};

/// Parse every row of a CSV snapshot.
///
/// Columns are matched by header name. The first bad row aborts the read;
/// `source` names the input in the resulting error.
pub fn read_snapshot<R: Read>(reader: R, source: &str) -> Result<Vec<InspectionRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| csv_error(source, e))?
        .clone();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row.map_err(|e| csv_error(source, e))?;
        let record = InspectionRecord::from_fields(headers.iter().zip(row.iter()))
            .map_err(|e| AppError::malformed(row_context(source, &row), e))?;
        records.push(record);
    }

    log::debug!("Read {} records from {}", records.len(), source);
    Ok(records)
}

/// Read a CSV snapshot from disk.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<InspectionRecord>> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| AppError::read_input(&source, e))?;
    read_snapshot(file, &source)
}

/// Write records as CSV: a header row, then one row per record in the
/// order given.
pub fn write_snapshot<W: Write>(writer: W, records: &[InspectionRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(FIELD_NAMES)?;
    for record in records {
        let fields = record.to_fields();
        wtr.write_record(fields.iter().map(|(_, value)| value.as_str()))?;
    }
    wtr.flush()?;
    Ok(())
}

fn row_context(source: &str, row: &csv::StringRecord) -> String {
    line_context(source, row.position())
}

fn csv_error(source: &str, err: csv::Error) -> AppError {
    let context = line_context(source, err.position());
    AppError::invalid_csv(context, err)
}

fn line_context(source: &str, pos: Option<&csv::Position>) -> String {
    match pos {
        Some(pos) => format!("{}: line {}", source, pos.line()),
        None => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordError;
    use chrono::NaiveDate;

    const SNAPSHOT: &str = "\
name,address_street,address_suite,address_zip,inspection_date,inspection_score,inspection_type
Taco Stand,123 Main St,,07501,2015-01-01,55,routine
\"Joe's Grill, Inc\",9 Elm St,B,75201,2015-06-01,85,follow-up
";

    #[test]
    fn test_read_snapshot() {
        let records = read_snapshot(SNAPSHOT.as_bytes(), "test").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), "Taco Stand");
        assert_eq!(records[0].zip_code(), "07501");
        assert_eq!(records[0].suite(), "");
        assert_eq!(records[1].name(), "Joe's Grill, Inc");
        assert_eq!(
            records[1].inspection_date(),
            NaiveDate::from_ymd_opt(2015, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_read_snapshot_any_column_order() {
        let shuffled = "\
inspection_score,name,inspection_type,address_zip,address_suite,inspection_date,address_street
55,Taco Stand,routine,07501,,2015-01-01,123 Main St
";
        let records = read_snapshot(shuffled.as_bytes(), "test").unwrap();
        let expected = read_snapshot(SNAPSHOT.as_bytes(), "test").unwrap();
        assert_eq!(records[0], expected[0]);
    }

    #[test]
    fn test_read_empty_input() {
        assert!(read_snapshot("".as_bytes(), "empty").unwrap().is_empty());
        let header_only = format!("{}\n", FIELD_NAMES.join(","));
        assert!(read_snapshot(header_only.as_bytes(), "empty").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_row_names_source_and_line() {
        let bad = "\
name,address_street,address_suite,address_zip,inspection_date,inspection_score,inspection_type
Taco Stand,123 Main St,,07501,2015-01-01,55,routine
Taco Stand,123 Main St,,07501,2015-13-45,55,routine
";
        let err = read_snapshot(bad.as_bytes(), "scores.csv").unwrap_err();
        match err {
            AppError::MalformedRecord { context, source } => {
                assert_eq!(context, "scores.csv: line 3");
                assert!(matches!(source, RecordError::InvalidDate { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let bad = "name,address_street\nTaco Stand,123 Main St\n";
        let err = read_snapshot(bad.as_bytes(), "stdin").unwrap_err();
        assert!(matches!(
            err,
            AppError::MalformedRecord {
                source: RecordError::MissingField("address_suite"),
                ..
            }
        ));
    }

    #[test]
    fn test_short_row_names_source_and_line() {
        let ragged = "\
name,address_street,address_suite,address_zip,inspection_date,inspection_score,inspection_type
Taco Stand,123 Main St,07501,2015-01-01,55,routine
";
        let err = read_snapshot(ragged.as_bytes(), "ragged.csv").unwrap_err();
        match &err {
            AppError::InvalidCsv { context, .. } => assert_eq!(context, "ragged.csv: line 2"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("ragged.csv"));
    }

    #[test]
    fn test_invalid_utf8_names_source() {
        let mut bytes = format!("{}\n", FIELD_NAMES.join(",")).into_bytes();
        bytes.extend_from_slice(b"Caf\xe9 Deli,1 Elm St,,75201,2015-01-01,90,routine\n");
        let err = read_snapshot(bytes.as_slice(), "latin1.csv").unwrap_err();
        match &err {
            AppError::InvalidCsv { context, .. } => assert!(context.starts_with("latin1.csv")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("latin1.csv"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snapshot-2015-06.csv");
        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, AppError::ReadInput { .. }));
        assert!(err.to_string().contains("snapshot-2015-06.csv"));
    }

    #[test]
    fn test_write_then_read() {
        let records = read_snapshot(SNAPSHOT.as_bytes(), "test").unwrap();
        let mut out = Vec::new();
        write_snapshot(&mut out, &records).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next().unwrap(), FIELD_NAMES.join(","));
        assert!(text.contains("\"Joe's Grill, Inc\""));

        let reread = read_snapshot(text.as_bytes(), "roundtrip").unwrap();
        assert_eq!(reread, records);
    }

    #[test]
    fn test_write_empty_has_header() {
        let mut out = Vec::new();
        write_snapshot(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim_end(), FIELD_NAMES.join(","));
    }
}
