//! JSON persistence for exported chats and the path mapping
//!
//! Both artifacts are written whole: the value is serialized in memory first, then written to
//! a sibling temp file that is renamed over the target, so a failed run never leaves a
//! half-written file behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::mapping::ProjectMapping;
use crate::models::ChatRecord;

/// Write the exported chats, replacing any previous file
pub fn save_chats(path: &Path, chats: &[ChatRecord]) -> Result<()> {
    write_json_atomic(path, chats)?;
    info!("Saved {} chats to {}", chats.len(), path.display());
    Ok(())
}

pub fn load_chats(path: &Path) -> Result<Vec<ChatRecord>> {
    read_json(path)
}

/// Write the conversation -> project mapping, replacing any previous file
pub fn save_mapping(path: &Path, mapping: &ProjectMapping) -> Result<()> {
    write_json_atomic(path, mapping)?;
    info!("Saved {} mapped conversations to {}", mapping.len(), path.display());
    Ok(())
}

pub fn load_mapping(path: &Path) -> Result<ProjectMapping> {
    read_json(path)
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let temp = temp_path(path);
    fs::write(&temp, json).with_context(|| format!("Failed to write {}", temp.display()))?;
    fs::rename(&temp, path)
        .with_context(|| format!("Failed to rename {} to {}", temp.display(), path.display()))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
