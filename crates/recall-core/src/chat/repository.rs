//! ConversationRepository trait definition.
//!
//! Durable storage for saved conversations. Rows are created by an explicit
//! save and never mutated or deleted by the session engine.

use recall_types::conversation::{ConversationListing, ConversationRecord};
use recall_types::error::RepositoryError;
use recall_types::llm::Message;

/// Repository trait for conversation persistence.
///
/// Implementations live in recall-infra (e.g., `SqliteConversationRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ConversationRepository: Send + Sync {
    /// Store a transcript. Storage assigns the id and creation timestamp.
    fn insert(
        &self,
        messages: &[Message],
        summary: &str,
        model: &str,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Get a conversation by id. A missing id is `Ok(None)`, never an error.
    fn get(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<ConversationRecord>, RepositoryError>> + Send;

    /// List at most `limit` conversations, newest first.
    ///
    /// Ordered by `created_at` descending with `id` descending as tiebreak.
    fn list_recent(
        &self,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationListing>, RepositoryError>> + Send;
}
