//! Support for CSV text resources.
//!
//! Headerless, two columns per row: key, then text. Standard CSV quoting
//! applies (`"a, b"` keeps the comma, `""` is a literal quote). Columns after
//! the second are ignored and blank lines are skipped. A row with fewer than
//! two columns or a blank key is reported with its 1-based line and skipped.

use std::path::Path;

use crate::{
    error::Error,
    traits::Parser,
    types::{ParsedFile, Row},
};

/// Parser for the CSV syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl Parser for Format {
    fn from_str<P: AsRef<Path>>(path: P, text: &str) -> Result<ParsedFile, Error> {
        let path = path.as_ref();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        let mut errors = Vec::new();
        let mut record = csv::StringRecord::new();
        loop {
            match rdr.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {
                    let line = record.position().map_or(0, |p| p.line() as usize);
                    match row_entry(path, &record, line) {
                        Ok(row) => rows.push(row),
                        Err(err) => {
                            // A rejected row with a usable key still takes part in
                            // duplicate detection.
                            if let Some(key) = record.get(0).filter(|key| !key.trim().is_empty()) {
                                rows.push(Row::rejected(key, Some(line)));
                            }
                            errors.push(err);
                        }
                    }
                }
                Err(err) => {
                    let line = err.position().map_or(0, |p| p.line() as usize);
                    let fatal = matches!(err.kind(), csv::ErrorKind::Io(_));
                    errors.push(Error::Csv {
                        path: path.to_path_buf(),
                        line,
                        message: err.to_string(),
                    });
                    if fatal {
                        break;
                    }
                }
            }
        }

        Ok(ParsedFile::from_rows(path, rows, errors))
    }
}

fn row_entry(path: &Path, record: &csv::StringRecord, line: usize) -> Result<Row, Error> {
    let invalid = |reason: String| Error::InvalidRow {
        path: path.to_path_buf(),
        line: Some(line),
        reason,
    };
    match (record.get(0), record.get(1)) {
        (Some(key), Some(_)) if key.trim().is_empty() => Err(invalid("blank key".to_string())),
        (Some(key), Some(value)) => Ok(Row::accepted(key, value, Some(line))),
        _ => Err(invalid(format!(
            "expected two columns (key, text), found {}",
            record.len()
        ))),
    }
}
