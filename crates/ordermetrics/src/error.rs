use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderMetricsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse event catalog YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid name for event {id}: {reason}")]
    InvalidEventName { id: i64, reason: String },
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported data file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read data file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read workbook '{path}': {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("Workbook '{path}' has no '{sheet}' sheet")]
    MissingSheet { path: PathBuf, sheet: String },

    #[error("Failed to list data directory '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A required column is absent from an input table.
///
/// Fatal to the current computation: nothing downstream runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{table} table is missing required column(s): {}", missing.join(", "))]
pub struct SchemaError {
    pub table: String,
    pub missing: Vec<String>,
}

impl SchemaError {
    pub fn new(table: &str, missing: Vec<String>) -> Self {
        Self {
            table: table.to_string(),
            missing,
        }
    }
}

pub type Result<T> = std::result::Result<T, OrderMetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_every_missing_column() {
        let err = SchemaError::new("orders", vec!["amount".into(), "stateId".into()]);
        assert_eq!(
            err.to_string(),
            "orders table is missing required column(s): amount, stateId"
        );
    }

    #[test]
    fn schema_error_converts_into_crate_error() {
        let err: OrderMetricsError = SchemaError::new("searches", vec!["event_id".into()]).into();
        assert!(matches!(err, OrderMetricsError::Schema(_)));
    }
}
