//! Decoding of raw chat-database rows into message fragments
//!
//! # Error Handling Strategy
//!
//! Bubble rows are best-effort data, so parsing never fails as a whole:
//!
//! - **Malformed keys**: rows whose key lacks the `prefix:conversation:bubble` shape are skipped
//!   and counted.
//! - **Undecodable payloads**: rows whose value is not a JSON object are skipped and counted.
//!   The first few failures are logged as warnings, the rest only show up in the totals.
//! - **Missing optional fields**: treated as absent via the lenient deserializers, never as an
//!   error.
//!
//! Counts are returned in [`ParseDiagnostics`] instead of being accumulated in shared state.

pub mod bubble;
pub mod deserializers;

pub use bubble::{BubbleKey, ParseDiagnostics, ParseOutcome, parse_bubbles, split_bubble_key};
