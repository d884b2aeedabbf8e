//! Game settings and preferences
//!
//! Persisted as JSON in the user's config directory, separately from the
//! unlock ledger.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

const APP_DIR: &str = "memory-match";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the unlock ledger lives (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
    /// Fixed seed for the deck stream (reproducible sessions)
    pub seed: Option<u64>,
    /// How long a mismatched pair stays face up, in milliseconds
    pub mismatch_reveal_ms: u64,
    /// Terminal bell on flips and results
    pub sound: bool,
    /// Show the round timer
    pub show_timer: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed: None,
            // Two 300 ms flip halves
            mismatch_reveal_ms: 600,
            sound: true,
            show_timer: true,
        }
    }
}

impl Settings {
    /// Default settings file location
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE_NAME))
    }

    /// Directory the unlock ledger is stored in
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join(APP_DIR)))
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::info!("No config directory, using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to read settings at {}: {}", path.display(), err);
                }
                log::info!("Using default settings");
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Failed to parse settings at {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), PersistenceError> {
        let path = Self::path()
            .ok_or_else(|| PersistenceError::Unavailable("no config directory".into()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| PersistenceError::io("create", dir, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| PersistenceError::io("write", path, e))?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join(SETTINGS_FILE_NAME);
        let settings = Settings {
            seed: Some(7),
            sound: false,
            mismatch_reveal_ms: 250,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, r#"{"seed": 11}"#).unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(settings.seed, Some(11));
        assert_eq!(settings.mismatch_reveal_ms, 600);
        assert!(settings.sound);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, "{ nope").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        assert_eq!(
            Settings::load_from(&dir.path().join("absent.json")),
            Settings::default()
        );
    }

    #[test]
    fn test_data_dir_override() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/tmp/mm")),
            ..Settings::default()
        };
        assert_eq!(settings.resolved_data_dir(), Some(PathBuf::from("/tmp/mm")));
    }
}
