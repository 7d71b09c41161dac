//! Shared domain types for recall.
//!
//! This crate contains the core domain types used across the workspace:
//! chat messages, provider identities, persisted conversations, global
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
