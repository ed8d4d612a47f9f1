use std::path::Path;

use chrono::format::{Item, StrftimeItems};

use crate::config::catalog::EventCatalog;
use crate::config::schema::Config;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Builds the event catalog for `config`.
///
/// `events_file` is resolved against `base_dir` when relative, which is the
/// directory holding the config file.
pub fn resolve_catalog(config: &Config, base_dir: Option<&Path>) -> Result<EventCatalog, ConfigError> {
    let mut catalog = EventCatalog::new(config.events.clone())?;

    if let Some(events_file) = &config.events_file {
        let path = Path::new(events_file);
        let path = match base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        };
        tracing::debug!(path = %path.display(), "Loading external event catalog");
        catalog.merge(EventCatalog::from_path(&path)?);
    }

    Ok(catalog)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.date_formats.is_empty() {
        return Err(ConfigError::Validation {
            message: "At least one date format is required".to_string(),
        });
    }

    for format in &config.date_formats {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Validation {
                message: format!("Invalid date format: {}", format),
            });
        }
    }

    // Event names are checked by the catalog itself.
    EventCatalog::new(config.events.clone())?;

    Ok(())
}
