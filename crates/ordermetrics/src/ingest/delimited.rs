use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use super::table::RawTable;
use crate::error::IngestError;

pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<RawTable, IngestError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    read_csv_str(&content)
}

/// Parses CSV text with a header row.
///
/// Rows the reader cannot decode are skipped with a warning; a broken header
/// is an error.
pub fn read_csv_str(content: &str) -> Result<RawTable, IngestError> {
    let text = content.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(record.iter().map(|v| v.to_string()).collect()),
            Err(e) => {
                warn!("Skipping malformed CSV record: {}", e);
                skipped += 1;
            }
        }
    }

    debug!(rows = rows.len(), skipped, columns = headers.len(), "Read CSV table");
    Ok(RawTable::new(headers, rows))
}

/// Writes `table` as CSV with a header row.
pub fn write_csv<W: Write>(table: &RawTable, writer: W) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;

    debug!(rows = table.len(), "Wrote CSV table");
    Ok(())
}

pub fn write_csv_path<P: AsRef<Path>>(table: &RawTable, path: P) -> Result<(), IngestError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| IngestError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    write_csv(table, file)
}
