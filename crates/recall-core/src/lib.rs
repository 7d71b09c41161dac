//! Session engine and port trait definitions for recall.
//!
//! This crate defines the "ports" (provider, repository and collaborator
//! traits) that the infrastructure layer implements, plus the pure logic
//! built on them: the transcript, context injection, command parsing and
//! the `SessionController` loop. It depends only on `recall-types` -- never
//! on `recall-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
