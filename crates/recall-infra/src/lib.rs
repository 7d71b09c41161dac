//! Infrastructure layer for recall.
//!
//! Contains implementations of the ports defined in `recall-core`:
//! SQLite conversation storage, the streaming LLM providers, the web and
//! ripgrep context sources, plus configuration and credential loading.

pub mod config;
pub mod context;
pub mod llm;
pub mod secret;
pub mod sqlite;
pub mod transcript_log;
