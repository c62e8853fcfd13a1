//! Error table CSV export.
//!
//! Columns are `TimeStamp,APE,RPE`. RPE is left empty on rows without a
//! value so the file joins cleanly with other per-timestamp tables.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::Result;
use crate::evaluation::{ErrorRow, ErrorTable};

/// Save an error table as CSV.
pub fn save_error_csv(table: &ErrorTable, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_error_csv(table, BufWriter::new(file))?;
    log::debug!("Saved {} error rows to {}", table.len(), path.display());
    Ok(())
}

/// Write an error table as CSV with a header row.
pub fn write_error_csv<W: Write>(table: &ErrorTable, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in &table.rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Load an error table written by [`save_error_csv`].
pub fn load_error_csv(path: &Path) -> Result<ErrorTable> {
    read_error_csv(BufReader::new(File::open(path)?))
}

/// Read an error table from CSV with a `TimeStamp,APE,RPE` header.
pub fn read_error_csv<R: Read>(reader: R) -> Result<ErrorTable> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let rows = rdr
        .deserialize::<ErrorRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ErrorTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ErrorTable {
        ErrorTable {
            rows: vec![
                ErrorRow {
                    timestamp: 10.0,
                    ape: 0.5,
                    rpe: None,
                },
                ErrorRow {
                    timestamp: 10.5,
                    ape: 0.25,
                    rpe: Some(0.125),
                },
            ],
        }
    }

    #[test]
    fn test_header_and_empty_rpe() {
        let mut buf = Vec::new();
        write_error_csv(&sample_table(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "TimeStamp,APE,RPE");
        assert!(lines[1].ends_with(','), "{}", lines[1]);
        assert!(lines[2].ends_with("0.125"), "{}", lines[2]);
    }

    #[test]
    fn test_read_back_written_table() {
        let mut buf = Vec::new();
        write_error_csv(&sample_table(), &mut buf).unwrap();
        let table = read_error_csv(buf.as_slice()).unwrap();
        assert_eq!(table, sample_table());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.csv");
        save_error_csv(&sample_table(), &path).unwrap();
        let table = load_error_csv(&path).unwrap();
        assert_eq!(table.rpe_count(), 1);
    }
}
