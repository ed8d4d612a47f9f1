use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::policy::ConfirmationPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub confirmation: ConfirmationPolicy,
    /// Event id to display name. Unmapped ids render as their decimal form.
    #[serde(default)]
    pub events: BTreeMap<i64, String>,
    /// External event catalog (YAML or JSON), merged over `events`.
    #[serde(default)]
    pub events_file: Option<String>,
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
    #[serde(default = "default_data_directory")]
    pub data_directory: String,
}

pub fn default_date_formats() -> Vec<String> {
    [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y",
    ]
    .iter()
    .map(|f| f.to_string())
    .collect()
}

fn default_data_directory() -> String {
    "./data".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            confirmation: ConfirmationPolicy::default(),
            events: BTreeMap::new(),
            events_file: None,
            date_formats: default_date_formats(),
            data_directory: default_data_directory(),
        }
    }
}
