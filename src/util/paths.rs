//! Paths for tabsteer data files.

use std::path::PathBuf;

/// Base data directory (`~/.tabsteer`).
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".tabsteer"))
        .unwrap_or_else(|| PathBuf::from(".tabsteer"))
}

/// Settings file location.
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
