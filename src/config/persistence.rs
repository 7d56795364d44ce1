//! Configuration file persistence for PixelMark
//!
//! This module handles loading and saving the settings and user-data files to
//! platform-specific directories with robust error handling and graceful
//! fallback to defaults.

use crate::config::{Settings, UserData};
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "pixelmark";

/// Settings file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Backup settings file name (used during atomic writes)
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

/// User data file name (drafts, skins, snippets, AI history)
const USER_DATA_FILE_NAME: &str = "userdata.json";

/// Backup user data file name (used during atomic writes)
const USER_DATA_BACKUP_NAME: &str = "userdata.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// Returns the appropriate directory based on the operating system:
/// - **Windows**: `%APPDATA%\pixelmark\`
/// - **macOS**: `~/Library/Application Support/pixelmark/`
/// - **Linux**: `~/.config/pixelmark/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be
/// determined (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the settings file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Get the full path to the user data file.
pub fn get_user_data_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(USER_DATA_FILE_NAME))
}

/// Ensure the configuration directory exists, creating it if necessary.
fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir = get_config_dir()?;

    if !config_dir.exists() {
        debug!("Creating config directory: {}", config_dir.display());
        fs::create_dir_all(&config_dir).map_err(|e| Error::ConfigSave {
            path: config_dir.clone(),
            source: Box::new(e),
        })?;
    }

    Ok(config_dir)
}

/// Read a config file's contents, treating missing and empty files alike.
///
/// Returns `Ok(None)` when the file does not exist or holds only whitespace,
/// so callers can fall back to defaults without logging an error.
fn read_json_file(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        debug!("File not found at {}, using defaults", path.display());
        return Ok(None);
    }

    debug!("Loading from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("File at {} is empty, using defaults", path.display());
        return Ok(None);
    }

    Ok(Some(contents))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from the default config file location.
///
/// # Behavior
///
/// 1. If the config file exists and is valid JSON, load and sanitize it
/// 2. If the config file doesn't exist, return default settings
/// 3. If the config file is corrupted/invalid, log a warning and return defaults
pub fn load_config() -> Settings {
    load_config_internal()
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Internal implementation of settings loading.
fn load_config_internal() -> Result<Settings> {
    let config_path = get_config_file_path()?;

    let Some(contents) = read_json_file(&config_path)? else {
        return Ok(Settings::default());
    };

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(settings)
}

/// Load user data from the default file location.
///
/// Follows the same fallback rules as [`load_config`]: a missing, empty or
/// corrupt file degrades to defaults with a warning, never an error.
pub fn load_user_data() -> UserData {
    load_user_data_internal()
        .unwrap_or_warn_default(UserData::default(), "Failed to load user data")
}

/// Internal implementation of user data loading.
fn load_user_data_internal() -> Result<UserData> {
    let data_path = get_user_data_file_path()?;

    let Some(contents) = read_json_file(&data_path)? else {
        return Ok(UserData::default());
    };

    let data = UserData::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "User data file at {} contains invalid JSON: {}",
            data_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse user data file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!("User data loaded successfully from {}", data_path.display());
    Ok(data)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save
// ─────────────────────────────────────────────────────────────────────────────

/// Write JSON atomically: write to a backup file first, then rename it over
/// the target so a crash mid-write never leaves a truncated file behind.
fn write_atomic(file_name: &str, backup_name: &str, json: &str) -> Result<PathBuf> {
    let config_dir = ensure_config_dir()?;
    let target_path = config_dir.join(file_name);
    let backup_path = config_dir.join(backup_name);

    debug!("Saving to: {}", target_path.display());

    fs::write(&backup_path, json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, &target_path).map_err(|e| Error::ConfigSave {
        path: target_path.clone(),
        source: Box::new(e),
    })?;

    Ok(target_path)
}

/// Save settings to the default config file location.
///
/// # Errors
///
/// - `Error::ConfigDirNotFound`: Config directory cannot be determined
/// - `Error::ConfigSave`: Failed to write the config file
pub fn save_config(settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: PathBuf::from(CONFIG_FILE_NAME),
        source: Box::new(e),
    })?;

    let path = write_atomic(CONFIG_FILE_NAME, CONFIG_BACKUP_NAME, &json)?;
    info!("Configuration saved successfully to {}", path.display());
    Ok(())
}

/// Save user data to the default file location.
pub fn save_user_data(data: &UserData) -> Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(|e| Error::ConfigSave {
        path: PathBuf::from(USER_DATA_FILE_NAME),
        source: Box::new(e),
    })?;

    let path = write_atomic(USER_DATA_FILE_NAME, USER_DATA_BACKUP_NAME, &json)?;
    info!("User data saved successfully to {}", path.display());
    Ok(())
}

/// Save settings, ignoring errors.
///
/// This is useful for "best effort" saves where failure shouldn't
/// interrupt the application flow (e.g., saving on exit).
///
/// # Returns
///
/// Returns `true` if the save was successful, `false` otherwise.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

/// Save user data, ignoring errors. Returns `true` on success.
pub fn save_user_data_silent(data: &UserData) -> bool {
    match save_user_data(data) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save user data: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
