//! Conversation session engine for recall.
//!
//! - `transcript`: in-memory ordered message list with undo
//! - `repository`: `ConversationRepository` port for durable storage
//! - `context`: context injection and its sourcing ports
//! - `commands`: classification of a line against the command vocabulary
//! - `summary`: the summary request sent by the save flow
//! - `io`: terminal-facing ports (input, output, clipboard)
//! - `session`: the `SessionController` dispatch loop

pub mod commands;
pub mod context;
pub mod io;
pub mod repository;
pub mod session;
pub mod summary;
pub mod transcript;
