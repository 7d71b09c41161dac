//! LLM provider abstractions for recall.
//!
//! - `LlmProvider`: object-safe trait every backend adapter implements
//! - `CompletionStream`: the boxed delta stream a completion produces

pub mod provider;

pub use provider::{CompletionStream, LlmProvider};
