//! Locating and loading the configuration file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use log::info;

use ordermetrics::{load_config, Config, PipelineConfig};

/// Configuration plus the file it came from, if any.
pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Relative paths inside the config resolve against its directory.
    pub fn base_dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    pub fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        PipelineConfig::from_config(&self.config, self.base_dir())
            .context("Failed to build event catalog")
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ordermetrics").join("config.json"))
}

/// An explicit path always wins, even when missing. The per-user default is
/// used only when it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.is_file()),
    }
}

pub fn load(explicit: Option<&Path>) -> anyhow::Result<LoadedConfig> {
    match resolve_config_path(explicit) {
        Some(path) => {
            let config = load_config(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            info!("Configuration loaded from {}", path.display());
            Ok(LoadedConfig {
                config,
                path: Some(path),
            })
        }
        None => {
            info!("No config file found, using built-in defaults");
            Ok(LoadedConfig {
                config: Config::default(),
                path: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordermetrics::ConfirmationPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_is_kept_even_if_missing() {
        let path = Path::new("/nonexistent/ordermetrics.json");
        assert_eq!(resolve_config_path(Some(path)), Some(path.to_path_buf()));
        assert!(load(Some(path)).is_err());
    }

    #[test]
    fn test_load_resolves_events_file_next_to_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("events.yaml"), "events:\n  9: Coppa Primavera\n").unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "version": "1.0", "confirmation": "state_confirmed", "events_file": "events.yaml" }"#,
        )
        .unwrap();

        let loaded = load(Some(&path)).unwrap();
        assert_eq!(loaded.base_dir(), Some(dir.path()));

        let pipeline_config = loaded.pipeline_config().unwrap();
        assert_eq!(pipeline_config.policy, ConfirmationPolicy::StateConfirmed);
        assert_eq!(pipeline_config.catalog.name_for(9), "Coppa Primavera");
    }
}
