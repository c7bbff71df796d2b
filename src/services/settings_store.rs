// tabdeck Settings Store
// Manages panel settings: loading, saving, updating individual values, and
// resetting to defaults. Settings are stored as a JSON file at the
// platform-specific config path.

use std::fs;
use std::path::Path;

use log::warn;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::PanelSettings;

/// Longest hover delay the store accepts, in milliseconds.
pub const MAX_HOVER_DELAY_MS: u64 = 10_000;

/// Trait defining the settings store interface.
pub trait SettingsStoreTrait {
    fn load(&mut self) -> Result<PanelSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &PanelSettings;
    fn set_hover_delay_ms(&mut self, delay_ms: u64) -> Result<(), SettingsError>;
    fn set_color_pairing(&mut self, pairing_id: &str) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings store implementation that persists settings as JSON on disk.
pub struct SettingsStore {
    config_path: String,
    settings: PanelSettings,
}

impl SettingsStore {
    /// Creates a new SettingsStore.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with
    /// `settings.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => {
                let config_dir = platform::get_config_dir();
                config_dir
                    .join("settings.json")
                    .to_string_lossy()
                    .to_string()
            }
        };

        Self {
            config_path,
            settings: PanelSettings::default(),
        }
    }
}

impl SettingsStoreTrait for SettingsStore {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields defaults. A file that no longer parses also
    /// yields defaults, with a warning, so a corrupted config can never keep
    /// the panel from starting.
    fn load(&mut self) -> Result<PanelSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = PanelSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        match serde_json::from_str::<PanelSettings>(&content) {
            Ok(settings) => self.settings = settings,
            Err(e) => {
                warn!(
                    "Config file {} is unreadable ({}); falling back to defaults",
                    self.config_path, e
                );
                self.settings = PanelSettings::default();
            }
        }
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Returns a reference to the current in-memory settings.
    fn get_settings(&self) -> &PanelSettings {
        &self.settings
    }

    /// Updates the hover preview delay and saves to disk.
    fn set_hover_delay_ms(&mut self, delay_ms: u64) -> Result<(), SettingsError> {
        if delay_ms > MAX_HOVER_DELAY_MS {
            return Err(SettingsError::InvalidValue(format!(
                "Hover delay {} ms exceeds the {} ms maximum",
                delay_ms, MAX_HOVER_DELAY_MS
            )));
        }
        self.settings.hover_preview_delay_ms = delay_ms;
        self.save()?;
        Ok(())
    }

    /// Updates the color pairing id and saves to disk.
    fn set_color_pairing(&mut self, pairing_id: &str) -> Result<(), SettingsError> {
        if pairing_id.is_empty() {
            return Err(SettingsError::InvalidValue(
                "Color pairing id cannot be empty".to_string(),
            ));
        }
        self.settings.color_pairing_id = pairing_id.to_string();
        self.save()?;
        Ok(())
    }

    /// Resets all settings to factory defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = PanelSettings::default();
        self.save()?;
        Ok(())
    }

    /// Returns the path to the config file.
    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
