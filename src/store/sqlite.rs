use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use tracing::debug;

use super::error::StoreError;
use super::traits::KeyValueStore;
use crate::models::RawRecord;

/// Table holding chat bubbles in the global database
pub const DISK_KV_TABLE: &str = "cursorDiskKV";

/// Table holding editor state in workspace databases
pub const ITEM_TABLE: &str = "ItemTable";

/// A read-only key/value table inside a SQLite database
pub struct SqliteStore {
    conn: Connection,
    table: String,
    path: PathBuf,
}

impl SqliteStore {
    /// Open `table` in the database at `path` without write access
    ///
    /// # Errors
    ///
    /// - [`StoreError::Unavailable`] if the file is missing or is not a readable database
    /// - [`StoreError::MissingTable`] if the table does not exist (or is not a plain identifier)
    pub fn open(path: &Path, table: &str) -> Result<Self, StoreError> {
        if !path.is_file() {
            return Err(StoreError::Unavailable {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        if !is_plain_identifier(table) {
            return Err(StoreError::MissingTable { table: table.to_string() });
        }

        let unavailable = |e: rusqlite::Error| StoreError::Unavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(unavailable)?;

        // A non-database file only fails once it is actually read
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                params![table],
                |row| row.get(0),
            )
            .map_err(unavailable)?;

        if !exists {
            return Err(StoreError::MissingTable { table: table.to_string() });
        }

        debug!("Opened {} in {}", table, path.display());
        Ok(Self { conn, table: table.to_string(), path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl KeyValueStore for SqliteStore {
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<RawRecord>, StoreError> {
        // substr() keeps the match exact and case-sensitive, unlike LIKE
        let sql = format!(
            "SELECT key, value FROM {} WHERE substr(key, 1, length(?1)) = ?1",
            self.table
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![prefix], |row| {
            let key: String = row.get(0)?;
            let value = value_to_string(row.get_ref(1)?);
            Ok(RawRecord { key, value })
        })?;

        let records = rows.collect::<Result<Vec<_>, _>>()?;
        debug!("Read {} records with prefix {:?} from {}", records.len(), prefix, self.table);
        Ok(records)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let sql = format!("SELECT value FROM {} WHERE key = ?1", self.table);
        let value = self
            .conn
            .query_row(&sql, params![key], |row| Ok(value_to_string(row.get_ref(0)?)))
            .optional()?;
        Ok(value)
    }
}

/// Values are TEXT in some Cursor versions and BLOB in others
fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Null => String::new(),
    }
}

fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
