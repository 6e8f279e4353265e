//! Run configuration.
//!
//! The Cursor data directory is resolved with the following precedence:
//! 1. `--cursor-dir` on the command line
//! 2. The `CURSOR_DATA_DIR` environment variable
//! 3. The platform config directory (`<config>/Cursor`)

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::parsers::bubble::BUBBLE_KEY_PREFIX;
use crate::utils::get_cursor_dir;

pub const DEFAULT_OUTPUT_FILE: &str = "test-chat-data.json";
pub const DEFAULT_MAPPING_FILE: &str = "real_project_mapping.json";
pub const DEFAULT_MAX_WORKSPACES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Root of Cursor's user data (the directory containing `User/`)
    pub cursor_dir: PathBuf,
    pub output_path: PathBuf,
    pub mapping_path: PathBuf,
    /// Upper bound on workspace databases scanned for known projects
    pub max_workspaces: usize,
    pub bubble_prefix: String,
}

impl ExtractorConfig {
    /// Defaults rooted at an explicit Cursor data directory
    pub fn new(cursor_dir: impl Into<PathBuf>) -> Self {
        Self {
            cursor_dir: cursor_dir.into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            mapping_path: PathBuf::from(DEFAULT_MAPPING_FILE),
            max_workspaces: DEFAULT_MAX_WORKSPACES,
            bubble_prefix: BUBBLE_KEY_PREFIX.to_string(),
        }
    }

    /// Defaults rooted at `cursor_dir` if given, otherwise at the environment/platform location
    pub fn resolve(cursor_dir: Option<PathBuf>) -> Result<Self> {
        let cursor_dir = match cursor_dir {
            Some(dir) => dir,
            None => get_cursor_dir()?,
        };
        Ok(Self::new(cursor_dir))
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_mapping(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_path = path.into();
        self
    }

    pub fn with_max_workspaces(mut self, max_workspaces: usize) -> Self {
        self.max_workspaces = max_workspaces;
        self
    }

    /// `<cursor_dir>/User/globalStorage/state.vscdb`
    pub fn global_db_path(&self) -> PathBuf {
        self.user_dir().join("globalStorage").join("state.vscdb")
    }

    /// `<cursor_dir>/User/workspaceStorage`
    pub fn workspace_storage_dir(&self) -> PathBuf {
        self.user_dir().join("workspaceStorage")
    }

    /// Key prefix including the delimiter, as used for store scans
    pub fn bubble_scan_prefix(&self) -> String {
        format!("{}:", self.bubble_prefix)
    }

    fn user_dir(&self) -> PathBuf {
        Path::new(&self.cursor_dir).join("User")
    }
}
