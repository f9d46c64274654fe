//! User configuration file handling
//!
//! Manages settings from ~/.config/glyphsmith/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// User configuration from ~/.config/glyphsmith/settings.json
///
/// These settings override built-in defaults but are overridden by CLI arguments
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    /// Snap tolerance in screen pixels
    pub snap_distance: Option<f64>,
    pub grid_size: Option<f64>,
    pub rotation_step_degrees: Option<f64>,
    pub simplify_tolerance: Option<f64>,
    pub snap_to_points: Option<bool>,
}

impl ConfigFile {
    /// Get the path to the glyphsmith config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("glyphsmith")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Get the path to the logs directory
    pub fn logs_dir() -> PathBuf {
        Self::config_dir().join("logs")
    }

    /// Get the path to today's log file
    pub fn current_log_file() -> PathBuf {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d");
        Self::logs_dir().join(format!("glyphsmith.log.{}", timestamp))
    }

    /// Initialize the logs directory
    pub fn initialize_logs_directory() -> anyhow::Result<PathBuf> {
        let logs_dir = Self::logs_dir();
        fs::create_dir_all(&logs_dir)?;
        debug!("Created logs directory: {:?}", logs_dir);
        Ok(logs_dir)
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!("Loaded user settings from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse settings.json: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read settings.json: {}", e);
                None
            }
        }
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Initialize the user configuration directory
    ///
    /// This creates:
    /// 1. The ~/.config/glyphsmith directory structure
    /// 2. A settings.json file with default values
    /// 3. A logs/ directory
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        let config_dir = Self::config_dir();
        fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = Self::initialize_logs_directory()?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = Self::config_path();
        if !settings_path.exists() {
            let defaults = crate::core::settings::EditorSettings::default();
            let example = ConfigFile {
                snap_distance: Some(defaults.snap_distance),
                grid_size: defaults.grid_size,
                rotation_step_degrees: Some(defaults.rotation_step_degrees),
                simplify_tolerance: Some(defaults.simplify_tolerance),
                snap_to_points: Some(defaults.snap_to_points),
            };
            example.save_to(&settings_path)?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        println!("\nConfiguration initialized successfully!");
        println!("  - Edit settings at: {:?}", settings_path);
        println!("  - View application logs in: {:?}", logs_dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let config = ConfigFile {
            snap_distance: Some(8.0),
            snap_to_points: Some(false),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(ConfigFile::load_from(&path), Some(config));
    }

    #[test]
    fn test_missing_or_broken_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert!(ConfigFile::load_from(&path).is_none());
        fs::write(&path, "{ not json").unwrap();
        assert!(ConfigFile::load_from(&path).is_none());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "grid_size": 25.0 }"#).unwrap();
        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.grid_size, Some(25.0));
        assert_eq!(config.snap_distance, None);
    }
}
