//! Cursor Chat Extractor - Recover and label Cursor AI chat history
//!
//! Cursor keeps every chat message ("bubble") as a JSON value in a SQLite key-value table.
//! This library reads those rows and turns them into project-labelled conversations:
//!
//! - Reading bubble rows from the global `state.vscdb` (or any [`store::KeyValueStore`])
//! - Parsing bubbles into message fragments, tolerating malformed rows
//! - Assembling fragments into time-ordered sessions
//! - Classifying each session into a project from path hints, known workspaces and keywords
//! - Exporting the result as JSON, optionally overridden by an attachment-derived mapping
//!
//! # Example
//!
//! ```no_run
//! use cursor_chat_extractor::{ExtractorConfig, extract_chats};
//! use std::path::PathBuf;
//!
//! let config = ExtractorConfig::new(PathBuf::from("/home/alice/.config/Cursor"));
//! let (chats, report) = extract_chats(&config);
//! println!("Extracted {} chats from {} bubbles", chats.len(), report.records_read);
//! ```

pub mod assembler;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod export;
pub mod extractor;
pub mod mapping;
pub mod models;
pub mod parsers;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use assembler::assemble_sessions;
pub use classifier::classify_session;
pub use config::ExtractorConfig;
pub use extractor::{ExtractionReport, build_chats, extract_chats};
pub use models::{ChatRecord, ProjectDescriptor, Session};
pub use parsers::parse_bubbles;
pub use utils::paths::format_path_with_tilde;
