//! Data models for Cursor chat history extraction.
//!
//! - [`RawRecord`] - A key/value row as read from the chat database
//! - [`BubblePayload`] - The decoded JSON body of a bubble row
//! - [`MessageFragment`] - One validated bubble, not yet grouped
//! - [`Session`] / [`Message`] - A reconstructed, ordered conversation
//! - [`ProjectDescriptor`] - The project label attached to a conversation
//! - [`ChatRecord`] - The exported unit: one session with its project
//!
//! Payload fields are duck-typed in the source data, so [`BubblePayload`] uses the
//! lenient deserializers in `parsers::deserializers` and treats wrong-typed fields as absent.

pub mod bubble;
pub mod chat;
pub mod project;
pub mod session;

pub use bubble::{BubblePayload, MessageFragment, RawRecord};
pub use chat::ChatRecord;
pub use project::ProjectDescriptor;
pub use session::{Message, Role, Session};
