//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use serde_json::{Map, Value, json};
use tempfile::TempDir;

/// Builder for test Cursor data directories (`User/globalStorage` + `User/workspaceStorage`)
pub struct CursorDirBuilder {
    temp_dir: TempDir,
}

impl CursorDirBuilder {
    /// Create a new builder with an empty Cursor directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the Cursor directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn global_db_path(&self) -> PathBuf {
        self.temp_dir.path().join("User").join("globalStorage").join("state.vscdb")
    }

    /// Create the global database with an empty `cursorDiskKV` table
    pub fn with_empty_global_db(self) -> Self {
        self.with_rows(&[])
    }

    /// Insert raw key/value rows into the global `cursorDiskKV` table
    pub fn with_rows(self, rows: &[(&str, &str)]) -> Self {
        let db_path = self.global_db_path();
        fs::create_dir_all(db_path.parent().unwrap()).expect("Failed to create globalStorage");

        let conn = Connection::open(&db_path).expect("Failed to open global db");
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cursorDiskKV (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB)",
            [],
        )
        .expect("Failed to create cursorDiskKV");
        for (key, value) in rows {
            conn.execute(
                "INSERT INTO cursorDiskKV (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .expect("Failed to insert row");
        }
        self
    }

    /// Add bubbles to the global database
    pub fn with_bubbles(self, bubbles: &[BubbleBuilder]) -> Self {
        let rows: Vec<(String, String)> = bubbles.iter().map(|b| (b.key(), b.to_json())).collect();
        let rows: Vec<(&str, &str)> = rows.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        self.with_rows(&rows)
    }

    /// Add a workspace whose editor history references the given files
    pub fn with_workspace(self, id: &str, files: &[&str]) -> Self {
        let workspace_dir = self.temp_dir.path().join("User").join("workspaceStorage").join(id);
        fs::create_dir_all(&workspace_dir).expect("Failed to create workspace dir");

        let entries: Vec<Value> = files
            .iter()
            .map(|f| json!({"editor": {"resource": format!("file://{}", f)}}))
            .collect();

        let conn = Connection::open(workspace_dir.join("state.vscdb"))
            .expect("Failed to open workspace db");
        conn.execute("CREATE TABLE ItemTable (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB)", [])
            .expect("Failed to create ItemTable");
        conn.execute(
            "INSERT INTO ItemTable (key, value) VALUES ('history.entries', ?1)",
            params![Value::Array(entries).to_string()],
        )
        .expect("Failed to insert history entries");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for CursorDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for bubble rows (`bubbleId:<conversation>:<bubble>`)
pub struct BubbleBuilder {
    conversation_id: String,
    bubble_id: String,
    fields: Map<String, Value>,
}

impl BubbleBuilder {
    fn with_type(conversation_id: &str, bubble_id: &str, type_code: i64) -> Self {
        let mut fields = Map::new();
        fields.insert("type".to_string(), json!(type_code));
        fields.insert("text".to_string(), json!("Test message"));
        Self {
            conversation_id: conversation_id.to_string(),
            bubble_id: bubble_id.to_string(),
            fields,
        }
    }

    /// Create a new user bubble
    pub fn user(conversation_id: &str, bubble_id: &str) -> Self {
        Self::with_type(conversation_id, bubble_id, 1)
    }

    /// Create a new assistant bubble
    pub fn assistant(conversation_id: &str, bubble_id: &str) -> Self {
        Self::with_type(conversation_id, bubble_id, 2)
    }

    pub fn text(mut self, text: &str) -> Self {
        self.fields.insert("text".to_string(), json!(text));
        self
    }

    /// Set the creation time (epoch milliseconds)
    pub fn created_at(mut self, ms: i64) -> Self {
        self.fields.insert("cTime".to_string(), json!(ms));
        self
    }

    /// Attach a folder, as Cursor records when a folder is added to the chat context
    pub fn attached_folder(mut self, path: &str) -> Self {
        self.fields.insert("attachedFolders".to_string(), json!([path]));
        self
    }

    pub fn key(&self) -> String {
        format!("bubbleId:{}:{}", self.conversation_id, self.bubble_id)
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

/// A Cursor directory with one known workspace and a handful of conversations
pub fn realistic_cursor_dir() -> TempDir {
    CursorDirBuilder::new()
        .with_workspace("a1b2c3", &["/work/robot-arm/src/main.rs", "/work/robot-arm/Cargo.toml"])
        .with_bubbles(&[
            BubbleBuilder::user("ARM", "1")
                .text("the robot-arm kinematics are off")
                .created_at(3000),
            BubbleBuilder::assistant("ARM", "2").text("Check the joint limits").created_at(3100),
            BubbleBuilder::user("SHOP", "1")
                .text("error in /home/alice/shop/src/app.ts")
                .created_at(2000),
            BubbleBuilder::assistant("SHOP", "2")
                .text("also look at /home/alice/shop/lib/db.ts")
                .created_at(2100),
            BubbleBuilder::user("UI", "1")
                .text("How do I write a react component with hooks and state")
                .created_at(1000),
        ])
        .build()
}
