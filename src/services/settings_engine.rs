// Settings engine for the details screen host.
// Loads, saves and edits `DetailsSettings`, stored as a JSON file at the
// platform config path.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::DetailsSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<DetailsSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &DetailsSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: DetailsSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// Without an override, the file is `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string()
        });

        Self {
            config_path,
            settings: DetailsSettings::default(),
        }
    }

    /// Resolves the cache database file, falling back to the platform data directory.
    pub fn database_path(&self) -> PathBuf {
        let configured = &self.settings.cache.database_path;
        if configured.is_empty() {
            platform::get_data_dir().join("cache.db")
        } else {
            PathBuf::from(configured)
        }
    }

    /// Walks `parts` into `root` and replaces the leaf, which must already exist.
    fn replace_at(root: &mut Value, parts: &[&str], key: &str, value: Value) -> Result<(), SettingsError> {
        let (leaf, parents) = parts
            .split_last()
            .ok_or_else(|| SettingsError::InvalidKey("Key cannot be empty".to_string()))?;

        let mut current = root;
        for part in parents {
            current = current.get_mut(*part).ok_or_else(|| {
                SettingsError::InvalidKey(format!("Key '{}' not found in settings", key))
            })?;
        }

        match current {
            Value::Object(map) if map.contains_key(*leaf) => {
                map.insert(leaf.to_string(), value);
                Ok(())
            }
            Value::Object(_) => Err(SettingsError::InvalidKey(format!(
                "Key '{}' not found in settings",
                key
            ))),
            _ => Err(SettingsError::InvalidKey(format!(
                "Cannot navigate to key '{}': intermediate value is not an object",
                key
            ))),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields defaults; a malformed one is a serialization error.
    fn load(&mut self) -> Result<DetailsSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            debug!("No settings file at {}, using defaults", self.config_path);
            self.settings = DetailsSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.settings.clone())
    }

    /// Saves the current settings, creating parent directories as needed.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &DetailsSettings {
        &self.settings
    }

    /// Updates one setting by dot-notation key, e.g. `"api.timeout_secs"`.
    ///
    /// The edited tree is deserialized back into `DetailsSettings` to validate
    /// the value, then saved to disk.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }
        let parts: Vec<&str> = key.split('.').collect();

        let mut tree = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        Self::replace_at(&mut tree, &parts, key, value)?;

        self.settings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        self.save()
    }

    /// Resets all settings to defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = DetailsSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
