//! File search backed by ripgrep.
//!
//! Runs `rg -i -l` under a fixed root and returns the matching file paths.
//! The matching files are read whole as UTF-8 text.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use recall_core::chat::context::{ContextFuture, FileSearcher};
use recall_types::error::ContextError;

const RIPGREP_PROGRAM: &str = "rg";

/// Case-insensitive content search under a root directory.
#[derive(Debug, Clone)]
pub struct RipgrepSearcher {
    root: PathBuf,
    program: String,
}

impl RipgrepSearcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            program: RIPGREP_PROGRAM.to_string(),
        }
    }

    /// Use a different executable in place of `rg`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn run(&self, pattern: &str, limit: usize) -> Result<Vec<PathBuf>, ContextError> {
        // Most recently modified first; `--sortr` also makes the order stable.
        let output = Command::new(&self.program)
            .arg("--ignore-case")
            .arg("--files-with-matches")
            .arg("--sortr=modified")
            .arg("--")
            .arg(pattern)
            .arg(&self.root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ContextError::Search(format!("'{}' is not installed or not on PATH", self.program))
                } else {
                    ContextError::Search(format!("failed to execute ripgrep: {e}"))
                }
            })?;

        match output.status.code() {
            Some(0) => {}
            // rg exits 1 when nothing matched.
            Some(1) => return Ok(Vec::new()),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(ContextError::Search(stderr.trim().to_string()));
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let paths = parse_matches(&stdout, limit);
        tracing::debug!(pattern, matches = paths.len(), "ripgrep search finished");
        Ok(paths)
    }
}

impl FileSearcher for RipgrepSearcher {
    fn root(&self) -> &Path {
        &self.root
    }

    fn search<'a>(&'a self, pattern: &'a str, limit: usize) -> ContextFuture<'a, Vec<PathBuf>> {
        Box::pin(self.run(pattern, limit))
    }

    fn read<'a>(&'a self, path: &'a Path) -> ContextFuture<'a, String> {
        Box::pin(async move {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ContextError::Read {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
        })
    }
}

/// Parse `rg -l` output into at most `limit` paths.
fn parse_matches(stdout: &str, limit: usize) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ripgrep_available() -> bool {
        std::process::Command::new(RIPGREP_PROGRAM)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_parse_matches_limits_and_skips_blank_lines() {
        let stdout = "/notes/a.md\n\n/notes/b.md\n/notes/c.md\n/notes/d.md\n";
        let paths = parse_matches(stdout, 3);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/notes/a.md"),
                PathBuf::from("/notes/b.md"),
                PathBuf::from("/notes/c.md"),
            ]
        );
    }

    #[test]
    fn test_parse_matches_empty() {
        assert!(parse_matches("", 3).is_empty());
    }

    #[tokio::test]
    async fn test_missing_program_is_search_error() {
        let dir = tempfile::tempdir().unwrap();
        let searcher = RipgrepSearcher::new(dir.path()).with_program("rg-not-installed-anywhere");

        let err = searcher.search("x", 3).await.unwrap_err();
        assert!(matches!(err, ContextError::Search(msg) if msg.contains("not installed")));
    }

    #[tokio::test]
    async fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        std::fs::write(&path, "# Note\nbody").unwrap();

        let searcher = RipgrepSearcher::new(dir.path());
        assert_eq!(searcher.read(&path).await.unwrap(), "# Note\nbody");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.md");

        let searcher = RipgrepSearcher::new(dir.path());
        let err = searcher.read(&path).await.unwrap_err();
        assert!(matches!(err, ContextError::Read { path: p, .. } if p == path));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        if !ripgrep_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "Tokio runtime notes").unwrap();
        std::fs::write(dir.path().join("b.md"), "nothing here").unwrap();

        let searcher = RipgrepSearcher::new(dir.path());
        let paths = searcher.search("TOKIO", 3).await.unwrap();
        assert_eq!(paths, vec![dir.path().join("a.md")]);
    }

    #[tokio::test]
    async fn test_search_without_matches_is_empty() {
        if !ripgrep_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "alpha").unwrap();

        let searcher = RipgrepSearcher::new(dir.path());
        assert!(searcher.search("zeta", 3).await.unwrap().is_empty());
    }
}
