//! End-to-end extraction: store -> fragments -> sessions -> classified chats
//!
//! # Error Handling Strategy
//!
//! Extraction degrades instead of failing:
//!
//! - **Unavailable stores**: a missing or unreadable global database is logged and treated as
//!   holding no bubbles; a missing workspace storage yields an empty known-project set.
//! - **Malformed rows**: skipped and counted by the parser (see [`crate::parsers`]).
//! - **Unreadable mapping file**: logged and ignored, classification proceeds without it.
//! - **Ambiguous classification**: never an error, every session gets a descriptor.
//!
//! Only writing the output is fatal, and that happens in [`crate::export`].

pub mod builder;

pub use builder::{ExtractionReport, build_chats, extract_chats, extract_path_mapping};
