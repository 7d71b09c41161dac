use std::path::PathBuf;

use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in recall-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("corrupt conversation row {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Failures while sourcing external text for context injection.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("no readable text could be extracted from {0}")]
    EmptyExtraction(String),

    #[error("file search failed: {0}")]
    Search(String),

    #[error("no files match '{0}'")]
    NoMatches(String),

    #[error("failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("input cancelled")]
    Cancelled,
}

/// A bad pick from a numbered list (file search results or saved conversations).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("index {index} is out of range (0..{len})")]
    OutOfRange { index: usize, len: usize },
}

impl SelectionError {
    /// Parse a zero-based pick into a list of `len` entries.
    pub fn parse_index(input: &str, len: usize) -> Result<usize, SelectionError> {
        let trimmed = input.trim();
        let index: usize = trimmed
            .parse()
            .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))?;
        if index >= len {
            return Err(SelectionError::OutOfRange { index, len });
        }
        Ok(index)
    }
}

/// Startup configuration failures. Fatal before any session state exists.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown provider '{0}' (expected one of: typhoon, mistral, llama, deepseek)")]
    UnknownProvider(String),

    #[error("{env_var} is not set; it is required for the '{provider}' provider")]
    MissingCredential {
        provider: String,
        env_var: String,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
#[error("clipboard error: {0}")]
pub struct ClipboardError(pub String);

/// Any failure raised while handling one command of the session loop.
///
/// Every variant except `Interrupted` is reported and the loop returns to
/// idle; `Interrupted` closes the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error("conversation {0} not found")]
    ConversationNotFound(i64),

    #[error("interrupted")]
    Interrupted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_parse_index_valid() {
        assert_eq!(SelectionError::parse_index(" 1 ", 3), Ok(1));
    }

    #[test]
    fn test_parse_index_out_of_range() {
        assert_eq!(
            SelectionError::parse_index("5", 2),
            Err(SelectionError::OutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_parse_index_not_a_number() {
        assert_eq!(
            SelectionError::parse_index("two", 2),
            Err(SelectionError::NotANumber("two".to_string()))
        );
        assert!(matches!(
            SelectionError::parse_index("-1", 2),
            Err(SelectionError::NotANumber(_))
        ));
    }

    #[test]
    fn test_missing_credential_names_variable() {
        let err = ConfigError::MissingCredential {
            provider: "llama".to_string(),
            env_var: "TOGETHER_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("TOGETHER_API_KEY"));
        assert!(err.to_string().contains("llama"));
    }

    #[test]
    fn test_session_error_storage_display() {
        let err: SessionError = RepositoryError::Query("database is locked".to_string()).into();
        assert!(err.to_string().starts_with("storage error"));
    }
}
