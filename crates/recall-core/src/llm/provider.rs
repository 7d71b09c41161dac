//! LlmProvider trait definition.
//!
//! This is the core abstraction that all LLM providers implement. The
//! session controller holds a `Box<dyn LlmProvider>` and never inspects
//! which backend sits behind it.

use std::pin::Pin;

use futures_util::Stream;

use recall_types::llm::{LlmError, Message, StreamEvent};

/// A lazy, finite, non-restartable stream of completion events.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for LLM provider backends (OpenAI-compatible, Mistral).
///
/// Object safe so the controller can be handed any adapter at runtime.
/// Sampling parameters are fixed when the adapter is constructed.
///
/// Implementations live in recall-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Provider family name for logs (e.g., "together", "mistral").
    fn name(&self) -> &str;

    /// Backend model identifier sent with every request.
    fn model(&self) -> &str;

    /// Start a streamed completion over the full ordered message list.
    ///
    /// Each non-empty text fragment is yielded as a `TextDelta` as soon as it
    /// is decoded. A transport or decode failure ends the stream with a single
    /// `Err` after whatever deltas were already produced.
    fn begin_completion(&self, messages: &[Message]) -> CompletionStream;
}
