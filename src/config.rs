use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Application folder under the platform config directory
pub const APP_DIR_NAME: &str = "MatchOverlay";

fn default_prefab_dir() -> String {
    "mods/prefabs/".to_string()
}

fn default_channel() -> String {
    "scoreboard".to_string()
}

fn default_reveal_delay() -> f64 {
    4.7
}

fn default_display_duration() -> f64 {
    5.0
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Values of archived console variables, keyed by alias
    #[serde(default)]
    pub archived_variables: BTreeMap<String, String>,

    /// Directory holding saved prefabs
    #[serde(default = "default_prefab_dir")]
    pub prefab_dir: String,

    /// Presentation channel the scoreboard is published to
    #[serde(default = "default_channel")]
    pub scoreboard_channel: String,

    /// Seconds after match end before the postgame scoreboard is shown
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_secs: f64,

    /// Seconds the postgame scoreboard stays up before the session resets
    #[serde(default = "default_display_duration")]
    pub display_duration_secs: f64,

    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archived_variables: BTreeMap::new(),
            prefab_dir: default_prefab_dir(),
            scoreboard_channel: default_channel(),
            reveal_delay_secs: default_reveal_delay(),
            display_duration_secs: default_display_duration(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from `config_path`.
    /// Creates default config if file doesn't exist.
    pub fn load_or_create(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let config = Self::load_from(config_path)?;
            tracing::info!("Loaded config from: {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(config_path)?;
            tracing::info!("Created default config at: {}", config_path.display());
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::LoadFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: Config = serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::SaveFailed {
                path: path.display().to_string(),
                source,
            }
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_failed(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;

        tracing::debug!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Reject timings the sequencer cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("reveal_delay_secs", self.reveal_delay_secs),
            ("display_duration_secs", self.display_duration_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    field, value
                )));
            }
        }
        if self.scoreboard_channel.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "scoreboard_channel must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Merge archived variable values drained from the console
    ///
    /// Returns true when anything changed and the config should be saved.
    pub fn absorb_archived(&mut self, values: BTreeMap<String, String>) -> bool {
        let mut changed = false;
        for (alias, value) in values {
            if self.archived_variables.get(&alias) != Some(&value) {
                self.archived_variables.insert(alias, value);
                changed = true;
            }
        }
        changed
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_secs_f64(self.reveal_delay_secs)
    }

    pub fn display_duration(&self) -> Duration {
        Duration::from_secs_f64(self.display_duration_secs)
    }

    /// Base directory for config and logs
    pub fn app_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(ConfigError::DirectoryUnavailable)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::app_dir()?.join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.archived_variables.is_empty());
        assert_eq!(config.prefab_dir, "mods/prefabs/");
        assert_eq!(config.scoreboard_channel, "scoreboard");
        assert_eq!(config.reveal_delay().as_millis(), 4700);
        assert_eq!(config.display_duration(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.scoreboard_channel, "scoreboard");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config
            .archived_variables
            .insert("forge_monitor_speed".to_string(), "2".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(
            loaded.archived_variables.get("forge_monitor_speed"),
            Some(&"2".to_string())
        );
    }

    #[test]
    fn test_invalid_timing_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"reveal_delay_secs": -1.0}"#).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::load_or_create(&path).unwrap();
        assert_eq!(config.scoreboard_channel, "scoreboard");
        assert!(path.exists());
    }

    #[test]
    fn test_absorb_archived() {
        let mut config = Config::default();
        let mut values = BTreeMap::new();
        values.insert("a".to_string(), "1".to_string());

        assert!(config.absorb_archived(values.clone()));
        assert!(!config.absorb_archived(values));
    }
}
