use std::path::PathBuf;

use crate::i18n::normalize_language_setting;
use crate::models::{Settings, SettingsFile};
use crate::storage::{KeyValueStore, StorageError, SETTINGS_KEY};

pub const DATA_DIR_ENV: &str = "TODO_BOARD_DATA_DIR";
pub const APP_DIR_NAME: &str = "todo-board";

const SCHEMA_VERSION: u32 = 1;

/// Explicit directory (flag or `TODO_BOARD_DATA_DIR`) first, then the platform
/// data directory, then a dot-directory under the working directory.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit.filter(|dir| !dir.as_os_str().is_empty()) {
        return dir;
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR_NAME}")))
}

pub fn load_settings(store: &impl KeyValueStore) -> Settings {
    let text = match store.load(SETTINGS_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => return Settings::default(),
        Err(error) => {
            log::warn!("failed to read settings, using defaults: {error}");
            return Settings::default();
        }
    };
    match serde_json::from_str::<SettingsFile>(&text) {
        Ok(file) => normalize_settings(file.settings),
        Err(error) => {
            log::warn!("settings are not valid json, using defaults: {error}");
            Settings::default()
        }
    }
}

pub fn save_settings(store: &impl KeyValueStore, settings: &Settings) -> Result<(), StorageError> {
    let file = SettingsFile {
        schema_version: SCHEMA_VERSION,
        settings: normalize_settings(settings.clone()),
    };
    let text = serde_json::to_string_pretty(&file)?;
    store.save(SETTINGS_KEY, &text)
}

fn normalize_settings(mut settings: Settings) -> Settings {
    settings.language = normalize_language_setting(&settings.language);
    settings
}
