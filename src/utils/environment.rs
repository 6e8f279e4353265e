use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable that overrides the Cursor data directory
pub const CURSOR_DIR_ENV: &str = "CURSOR_DATA_DIR";

/// Get the Cursor data directory
///
/// `CURSOR_DATA_DIR` wins when set; otherwise the platform config directory is used:
/// `%APPDATA%\Cursor` on Windows, `~/Library/Application Support/Cursor` on macOS and
/// `~/.config/Cursor` on Linux.
pub fn get_cursor_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(CURSOR_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let config_dir = dirs::config_dir().context("Could not determine platform config directory")?;
    Ok(config_dir.join("Cursor"))
}
