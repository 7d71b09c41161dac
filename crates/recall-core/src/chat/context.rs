//! Context injection for retrieval-augmented turns.
//!
//! External text (a web page or a local file) is wrapped in a delimited
//! block and followed by the user's own instruction. The two sourcing
//! strategies are ports implemented in recall-infra.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use recall_types::error::ContextError;

pub const CONTEXT_OPEN: &str = "<context>";
pub const CONTEXT_CLOSE: &str = "</context>";

/// Boxed future returned by the context sourcing ports.
pub type ContextFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ContextError>> + Send + 'a>>;

/// The delimited block shown to the user before the instruction prompt.
pub fn context_block(context: &str) -> String {
    format!("{CONTEXT_OPEN}\n{context}\n{CONTEXT_CLOSE}")
}

/// Build the augmented user turn.
///
/// No escaping is applied: delimiter markers inside `context` pass through
/// verbatim.
pub fn inject(context: &str, instruction: &str) -> String {
    format!("{}\n\n\n{instruction}", context_block(context))
}

/// Fetches a web page and returns its main-content plain text.
pub trait WebExtractor: Send + Sync {
    fn fetch_text<'a>(&'a self, url: &'a str) -> ContextFuture<'a, String>;
}

/// Case-insensitive content search over a directory tree.
pub trait FileSearcher: Send + Sync {
    /// Directory searched; results are displayed relative to it.
    fn root(&self) -> &Path;

    /// Matching files, most relevant first, at most `limit` entries.
    fn search<'a>(&'a self, pattern: &'a str, limit: usize) -> ContextFuture<'a, Vec<PathBuf>>;

    /// Full text of a chosen file.
    fn read<'a>(&'a self, path: &'a Path) -> ContextFuture<'a, String>;
}
