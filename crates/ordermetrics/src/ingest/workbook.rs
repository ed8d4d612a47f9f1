use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use super::table::RawTable;
use crate::error::IngestError;

pub const ORDERS_SHEET: &str = "Orders";
pub const SEARCHES_SHEET: &str = "Searches";

/// Reads the `Orders` sheet and, when present, the `Searches` sheet.
pub fn read_workbook_path<P: AsRef<Path>>(
    path: P,
) -> Result<(RawTable, Option<RawTable>), IngestError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names();
    debug!(sheets = ?sheet_names, "Opened workbook");

    if !sheet_names.iter().any(|s| s == ORDERS_SHEET) {
        return Err(IngestError::MissingSheet {
            path: path.to_path_buf(),
            sheet: ORDERS_SHEET.to_string(),
        });
    }
    let has_searches = sheet_names.iter().any(|s| s == SEARCHES_SHEET);

    let orders = workbook
        .worksheet_range(ORDERS_SHEET)
        .map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let orders = range_to_table(&orders);

    let searches = if has_searches {
        let range = workbook
            .worksheet_range(SEARCHES_SHEET)
            .map_err(|e| IngestError::Workbook {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Some(range_to_table(&range))
    } else {
        None
    };

    Ok((orders, searches))
}

/// First row is the header; fully blank rows are dropped.
fn range_to_table(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => return RawTable::default(),
    };

    let rows = rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>())
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    RawTable::new(headers, rows)
}

pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() <= 9_007_199_254_740_992.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        // Formula errors read as missing values.
        Data::Error(_) => String::new(),
    }
}
