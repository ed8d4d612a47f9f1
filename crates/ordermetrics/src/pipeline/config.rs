use std::path::{Path, PathBuf};

use crate::config::{resolve_catalog, Config, ConfirmationPolicy, EventCatalog};
use crate::error::ConfigError;

pub struct PipelineConfig {
    pub policy: ConfirmationPolicy,
    pub catalog: EventCatalog,
    pub date_formats: Vec<String>,
    pub data_directory: PathBuf,
}

impl PipelineConfig {
    /// `base_dir` is where relative paths in `config` are resolved from.
    pub fn from_config(config: &Config, base_dir: Option<&Path>) -> Result<Self, ConfigError> {
        Ok(Self {
            policy: config.confirmation,
            catalog: resolve_catalog(config, base_dir)?,
            date_formats: config.date_formats.clone(),
            data_directory: resolve_relative(&config.data_directory, base_dir),
        })
    }
}

fn resolve_relative(path: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(path);
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let config = Config::default();
        Self {
            policy: config.confirmation,
            catalog: EventCatalog::default(),
            date_formats: config.date_formats,
            data_directory: PathBuf::from(config.data_directory),
        }
    }
}
