//! Event id to display-name lookup.
//!
//! The catalog is deployment data: it comes from the config file and an
//! optional external YAML/JSON file, never from compiled-in constants.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCatalog {
    #[serde(default)]
    events: BTreeMap<i64, String>,
}

impl EventCatalog {
    pub fn new(events: BTreeMap<i64, String>) -> Result<Self, ConfigError> {
        let catalog = Self { events };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let catalog: EventCatalog = serde_yaml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let catalog: EventCatalog = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads a catalog file, picking the parser from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Overlays `other` on this catalog; ids present in both take `other`'s name.
    pub fn merge(&mut self, other: EventCatalog) {
        self.events.extend(other.events);
    }

    /// Display name for an event id, or the id in decimal when unmapped.
    pub fn name_for(&self, event_id: i64) -> String {
        self.events
            .get(&event_id)
            .cloned()
            .unwrap_or_else(|| event_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (id, name) in &self.events {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidEventName {
                    id: *id,
                    reason: "name is empty".to_string(),
                });
            }
        }
        Ok(())
    }
}
