use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::error::StoreError;
use super::sqlite::{DISK_KV_TABLE, ITEM_TABLE, SqliteStore};
use super::traits::KeyValueStore;
use crate::models::ProjectDescriptor;
use crate::utils::{common_directory, project_name_from_path, strip_file_uri};

/// Database file inside each workspace directory
pub const WORKSPACE_DB_FILENAME: &str = "state.vscdb";

/// Tables tried in order; newer builds use `ItemTable`, some older ones `cursorDiskKV`
const WORKSPACE_TABLES: &[&str] = &[ITEM_TABLE, DISK_KV_TABLE];

/// Keys that may reveal a workspace's root, tried in order
pub const WORKSPACE_KEYS: &[&str] =
    &["history.entries", "debug.selectedroot", "memento/workbench.editors.files.textFileEditor"];

/// Discover the known-project set from Cursor's per-workspace databases
///
/// Scans `workspace_storage/<id>/state.vscdb` in directory-name order, stopping after
/// `max_workspaces` directories. Workspaces whose database is missing, unreadable or holds no
/// path are skipped.
///
/// Returns an empty Vec if the workspace storage directory doesn't exist (not an error).
///
/// # Errors
///
/// Returns an error if the storage directory exists but cannot be listed.
pub fn discover_known_projects(
    workspace_storage: &Path,
    max_workspaces: usize,
) -> Result<Vec<ProjectDescriptor>> {
    if !workspace_storage.is_dir() {
        warn!("Workspace storage not found at {}", workspace_storage.display());
        return Ok(Vec::new());
    }

    let mut projects = Vec::new();
    let mut scanned = 0;

    let walker = WalkDir::new(workspace_storage).min_depth(1).max_depth(1).sort_by_file_name();
    for entry in walker {
        let entry = entry.with_context(|| {
            format!("Failed to read workspace storage {}", workspace_storage.display())
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if scanned >= max_workspaces {
            debug!("Workspace limit {} reached", max_workspaces);
            break;
        }
        scanned += 1;

        let db_path = entry.path().join(WORKSPACE_DB_FILENAME);
        if !db_path.is_file() {
            continue;
        }

        match project_from_workspace_db(&db_path) {
            Ok(Some(project)) => {
                debug!(
                    "Workspace {} -> {}",
                    entry.file_name().to_string_lossy(),
                    project.root_path
                );
                projects.push(project);
            }
            Ok(None) => {}
            Err(e) => debug!("Skipping workspace {}: {}", db_path.display(), e),
        }
    }

    info!("Found {} known projects in {} workspaces", projects.len(), scanned);
    Ok(projects)
}

/// Read the project root recorded in one workspace database
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
pub fn project_from_workspace_db(db_path: &Path) -> Result<Option<ProjectDescriptor>, StoreError> {
    for table in WORKSPACE_TABLES {
        let store = match SqliteStore::open(db_path, table) {
            Ok(store) => store,
            Err(StoreError::MissingTable { .. }) => continue,
            Err(e) => return Err(e),
        };
        if let Some(project) = project_from_store(&store)? {
            return Ok(Some(project));
        }
    }
    Ok(None)
}

/// Look up the well-known keys in a workspace store; the first one that yields a root wins
pub fn project_from_store(
    store: &dyn KeyValueStore,
) -> Result<Option<ProjectDescriptor>, StoreError> {
    for key in WORKSPACE_KEYS {
        let Some(raw) = store.get(key)? else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            debug!("Workspace key {} is not JSON", key);
            continue;
        };
        if let Some((root, file_count)) = root_from_value(&value) {
            let name = project_name_from_path(&root);
            return Ok(Some(ProjectDescriptor::new(name, root, file_count)));
        }
    }
    Ok(None)
}

/// Extract a root path (and the number of files it was derived from) from a workspace value
///
/// - a list of history entries: the common directory of their file resources
/// - a string: the path itself
/// - an object: the first string value that looks like a path
fn root_from_value(value: &Value) -> Option<(String, usize)> {
    match value {
        Value::Array(entries) => {
            let files: BTreeSet<String> = entries
                .iter()
                .filter_map(entry_resource)
                .map(strip_file_uri)
                .filter(|path| !path.is_empty())
                .collect();
            let files: Vec<String> = files.into_iter().collect();
            common_directory(&files).map(|root| (root, files.len()))
        }
        Value::String(s) => {
            let path = strip_file_uri(s);
            (!path.is_empty()).then_some((path, 0))
        }
        Value::Object(map) => map.values().find_map(|v| match v {
            Value::String(s) if s.contains("file://") || s.contains('\\') || s.contains('/') => {
                Some((strip_file_uri(s), 0))
            }
            _ => None,
        }),
        _ => None,
    }
}

/// The resource URI of a history entry, in any of the shapes Cursor has used
fn entry_resource(entry: &Value) -> Option<&str> {
    entry
        .pointer("/editor/resource")
        .and_then(Value::as_str)
        .or_else(|| entry.get("resource").and_then(Value::as_str))
        .or_else(|| entry.pointer("/resource/path").and_then(Value::as_str))
        .or_else(|| entry.pointer("/resource/fsPath").and_then(Value::as_str))
}
