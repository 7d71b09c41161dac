//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `recall-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, inserts on the writer
//! and reads on the reader.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::Row;

use recall_core::chat::repository::ConversationRepository;
use recall_types::conversation::{ConversationListing, ConversationRecord};
use recall_types::error::RepositoryError;
use recall_types::llm::Message;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: i64,
    content: String,
    created_at: String,
    summary: String,
    model: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            summary: row.try_get("summary")?,
            model: row.try_get("model")?,
        })
    }

    fn into_record(self) -> Result<ConversationRecord, RepositoryError> {
        let messages: Vec<Message> =
            serde_json::from_str(&self.content).map_err(|e| RepositoryError::Corrupt {
                id: self.id,
                reason: format!("invalid transcript JSON: {e}"),
            })?;
        let created_at = parse_datetime(&self.created_at).map_err(|reason| {
            RepositoryError::Corrupt {
                id: self.id,
                reason,
            }
        })?;

        Ok(ConversationRecord {
            id: self.id,
            messages,
            created_at,
            summary: self.summary,
            model: self.model,
        })
    }
}

/// Parse a stored timestamp.
///
/// Rows written by this crate use RFC 3339; rows from earlier releases use
/// SQLite's `CURRENT_TIMESTAMP` form (`YYYY-MM-DD HH:MM:SS`, UTC).
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid datetime '{s}': {e}"))
}

// ---------------------------------------------------------------------------
// ConversationRepository implementation
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    #[tracing::instrument(name = "conversation.insert", skip(self, messages), fields(messages = messages.len()))]
    async fn insert(
        &self,
        messages: &[Message],
        summary: &str,
        model: &str,
    ) -> Result<i64, RepositoryError> {
        let content = serde_json::to_string(messages)
            .map_err(|e| RepositoryError::Query(format!("serialize transcript: {e}")))?;

        let result = sqlx::query("INSERT INTO conversations (content, summary, model) VALUES (?, ?, ?)")
            .bind(content)
            .bind(summary)
            .bind(model)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<Option<ConversationRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, content, CAST(created_at AS TEXT) AS created_at, summary, model FROM conversations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conversation_row.into_record()?))
            }
            None => Ok(None),
        }
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<ConversationListing>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT summary, id FROM conversations ORDER BY julianday(created_at) DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| -> Result<ConversationListing, sqlx::Error> {
                Ok(ConversationListing {
                    summary: row.try_get("summary")?,
                    id: row.try_get("id")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::{DatabasePool, database_url};

    async fn test_repo() -> (SqliteConversationRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&database_url(dir.path())).await.unwrap();
        (SqliteConversationRepository::new(pool), dir)
    }

    fn transcript() -> Vec<Message> {
        vec![
            Message::user("hello"),
            Message::assistant("Hi there"),
            Message::user("summarize this conversation as a one-line heading only"),
            Message::assistant("Greeting"),
        ]
    }

    async fn insert_at(repo: &SqliteConversationRepository, summary: &str, created_at: &str) -> i64 {
        let result = sqlx::query(
            "INSERT INTO conversations (content, created_at, summary, model) VALUES ('[]', ?, ?, 'llama')",
        )
        .bind(created_at)
        .bind(summary)
        .execute(&repo.pool.writer)
        .await
        .unwrap();
        result.last_insert_rowid()
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let (repo, _dir) = test_repo().await;

        let id = repo.insert(&transcript(), "Greeting", "llama").await.unwrap();
        assert_eq!(id, 1);

        let record = repo.get(id).await.unwrap().unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.messages, transcript());
        assert_eq!(record.summary, "Greeting");
        assert_eq!(record.model, "llama");
        assert!((Utc::now() - record.created_at).num_seconds() < 60);
    }

    #[tokio::test]
    async fn test_ids_are_assigned_incrementally() {
        let (repo, _dir) = test_repo().await;
        let first = repo.insert(&transcript(), "one", "llama").await.unwrap();
        let second = repo.insert(&transcript(), "two", "mistral").await.unwrap();
        assert_eq!(second, first + 1);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (repo, _dir) = test_repo().await;
        assert!(repo.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stored_content_is_plain_json_array() {
        let (repo, _dir) = test_repo().await;
        let id = repo
            .insert(&[Message::user("hi")], "Hi", "typhoon")
            .await
            .unwrap();

        let (content,): (String,) = sqlx::query_as("SELECT content FROM conversations WHERE id = ?")
            .bind(id)
            .fetch_one(&repo.pool.reader)
            .await
            .unwrap();
        assert_eq!(content, r#"[{"role":"user","content":"hi"}]"#);
    }

    #[tokio::test]
    async fn test_list_recent_orders_by_creation_not_insertion() {
        let (repo, _dir) = test_repo().await;
        insert_at(&repo, "middle", "2024-02-01T10:00:00.000Z").await;
        insert_at(&repo, "newest", "2024-03-01T10:00:00.000Z").await;
        insert_at(&repo, "oldest", "2024-01-01T10:00:00.000Z").await;
        insert_at(&repo, "legacy", "2024-02-15 08:30:00").await;

        let listings = repo.list_recent(3).await.unwrap();
        let summaries: Vec<&str> = listings.iter().map(|l| l.summary.as_str()).collect();
        assert_eq!(summaries, vec!["newest", "legacy", "middle"]);
    }

    #[tokio::test]
    async fn test_list_recent_ties_break_by_id() {
        let (repo, _dir) = test_repo().await;
        let first = insert_at(&repo, "a", "2024-01-01T10:00:00.000Z").await;
        let second = insert_at(&repo, "b", "2024-01-01T10:00:00.000Z").await;

        let listings = repo.list_recent(10).await.unwrap();
        assert_eq!(listings[0].id, second);
        assert_eq!(listings[1].id, first);
    }

    #[tokio::test]
    async fn test_list_recent_empty() {
        let (repo, _dir) = test_repo().await;
        assert!(repo.list_recent(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_legacy_row() {
        let (repo, _dir) = test_repo().await;
        let result = sqlx::query(
            r#"INSERT INTO conversations (content, created_at, summary, model)
               VALUES ('[{"role": "user", "content": "hi"}]', '2023-11-05 14:02:11', 'Old', 'mistral')"#,
        )
        .execute(&repo.pool.writer)
        .await
        .unwrap();

        let record = repo.get(result.last_insert_rowid()).await.unwrap().unwrap();
        assert_eq!(record.messages, vec![Message::user("hi")]);
        assert_eq!(record.created_at.to_rfc3339(), "2023-11-05T14:02:11+00:00");
    }

    #[tokio::test]
    async fn test_get_corrupt_content() {
        let (repo, _dir) = test_repo().await;
        let id = insert_at(&repo, "bad", "2024-01-01T10:00:00.000Z").await;
        sqlx::query("UPDATE conversations SET content = 'not json' WHERE id = ?")
            .bind(id)
            .execute(&repo.pool.writer)
            .await
            .unwrap();

        let err = repo.get(id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Corrupt { .. }));
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime("2024-05-01T12:00:00.123Z").is_ok());
        assert!(parse_datetime("2024-05-01 12:00:00").is_ok());
        assert!(parse_datetime("yesterday").is_err());
    }
}
