//! Read-only access to Cursor's SQLite key/value databases
//!
//! The global database (`User/globalStorage/state.vscdb`) holds chat bubbles in the
//! `cursorDiskKV` table. Each workspace database (`User/workspaceStorage/<id>/state.vscdb`)
//! holds editor metadata in `ItemTable`, which is where known project roots come from.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;
pub mod workspace;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KeyValueStore;
pub use workspace::discover_known_projects;
