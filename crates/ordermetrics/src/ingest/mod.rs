//! Reading order exports into untyped tables.
//!
//! CSV files carry only orders. Workbooks carry an `Orders` sheet and an
//! optional `Searches` sheet with funnel counts.

pub mod delimited;
pub mod table;
pub mod workbook;

use std::path::{Path, PathBuf};

use tracing::info_span;
use walkdir::WalkDir;

use crate::error::IngestError;

pub use delimited::{read_csv_path, read_csv_str, write_csv, write_csv_path};
pub use table::RawTable;
pub use workbook::{read_workbook_path, ORDERS_SHEET, SEARCHES_SHEET};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Workbook,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(DataFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(DataFormat::Workbook),
            _ => None,
        }
    }
}

/// The two inputs of one uploaded file.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub orders: RawTable,
    pub funnel: Option<RawTable>,
}

pub fn load_tables<P: AsRef<Path>>(path: P) -> Result<SourceTables, IngestError> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>");
    let _span = info_span!("load_tables", filename = %filename).entered();

    match DataFormat::from_path(path) {
        Some(DataFormat::Csv) => Ok(SourceTables {
            orders: read_csv_path(path)?,
            funnel: None,
        }),
        Some(DataFormat::Workbook) => {
            let (orders, funnel) = read_workbook_path(path)?;
            Ok(SourceTables { orders, funnel })
        }
        None => Err(IngestError::UnsupportedFormat(filename.to_string())),
    }
}

/// Supported data files directly inside `dir`, sorted by file name.
pub fn discover_data_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, IngestError> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| IngestError::ScanFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if entry.file_type().is_file() && DataFormat::from_path(entry.path()).is_some() {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DataFormat::from_path(Path::new("orders.CSV")),
            Some(DataFormat::Csv)
        );
        assert_eq!(
            DataFormat::from_path(Path::new("export.xlsx")),
            Some(DataFormat::Workbook)
        );
        assert_eq!(DataFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(DataFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_load_csv_has_no_funnel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        std::fs::write(&path, "eventId,amount,stateId\n2,10,4\n").unwrap();

        let tables = load_tables(&path).unwrap();
        assert_eq!(tables.orders.len(), 1);
        assert!(tables.funnel.is_none());
    }

    #[test]
    fn test_unsupported_format() {
        let result = load_tables("orders.json");
        assert!(matches!(result, Err(IngestError::UnsupportedFormat(name)) if name == "orders.json"));
    }

    #[test]
    fn test_discover_lists_supported_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "x\n").unwrap();
        std::fs::write(dir.path().join("a.xlsx"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.csv"), "x\n").unwrap();

        let files = discover_data_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.xlsx", "b.csv"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let result = discover_data_files("/nonexistent/data");
        assert!(matches!(result, Err(IngestError::ScanFailed { .. })));
    }
}
