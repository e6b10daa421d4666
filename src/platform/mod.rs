// Platform-specific paths for the settings file and the cache database.
//
// Uses `cfg(target_os)` to pick the conventional location on each OS.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "author-details";

fn home_dir() -> PathBuf {
    let var = if cfg!(target_os = "windows") { "USERPROFILE" } else { "HOME" };
    PathBuf::from(env::var(var).unwrap_or_else(|_| env::temp_dir().to_string_lossy().to_string()))
}

/// Returns the configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/author-details` or `~/.config/author-details`
/// - **macOS**: `~/Library/Application Support/author-details`
/// - **Windows**: `%APPDATA%/author-details`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR)
    }
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"))
            .join(APP_DIR)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home_dir().join(".config"))
            .join(APP_DIR)
    }
}

/// Returns the data directory holding the cache database.
///
/// - **Linux**: `$XDG_DATA_HOME/author-details` or `~/.local/share/author-details`
/// - **macOS**: `~/Library/Application Support/author-details/data`
/// - **Windows**: `%LOCALAPPDATA%/author-details`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        get_config_dir().join("data")
    }
    #[cfg(target_os = "windows")]
    {
        env::var("LOCALAPPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home_dir().join("AppData").join("Local"))
            .join(APP_DIR)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home_dir().join(".local").join("share"))
            .join(APP_DIR)
    }
}
