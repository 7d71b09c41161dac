//! In-memory transcript for the active session.
//!
//! The transcript is the full ordered message list replayed to the provider
//! on every turn. It is owned exclusively by one `SessionController`.

use recall_types::llm::{Message, MessageRole};

/// Ordered sequence of role-tagged messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
    }

    /// Drop the last two messages.
    ///
    /// No-op when fewer than two exist, regardless of parity. Returns whether
    /// anything was removed.
    pub fn undo(&mut self) -> bool {
        if self.messages.len() < 2 {
            return false;
        }
        let keep = self.messages.len() - 2;
        self.messages.truncate(keep);
        true
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Replace the whole transcript. Destructive, no confirmation.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Remove the final message, used to discard a dangling user turn.
    pub fn pop_last(&mut self) -> Option<Message> {
        self.messages.pop()
    }
}
