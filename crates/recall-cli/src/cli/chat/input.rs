//! Async readline input for the session loop.
//!
//! Wraps `rustyline_async::Readline`. A fresh editor is created for every
//! prompt so the terminal is only in raw mode while a line is being read;
//! between prompts Ctrl+C reaches the process as a signal and interrupts a
//! streaming response. History is carried across editors by hand.
//!
//! When stdin is not a terminal (piped or redirected input) lines are read
//! plainly from stdin instead. The editor would otherwise open the
//! controlling terminal and ignore the pipe.

use std::io::{IsTerminal, Write};

use rustyline_async::{Readline, ReadlineEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use recall_core::chat::io::{InputEvent, LineReader};

const MAX_HISTORY: usize = 500;

type PlainLines = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Terminal line reader with in-session history.
pub struct ChatInput {
    history: Vec<String>,
    /// Set when input does not come from a terminal, or the editor failed to start.
    plain: Option<PlainLines>,
}

impl ChatInput {
    /// Pick the line editor or plain stdin depending on whether stdin is a terminal.
    pub fn new() -> Self {
        if std::io::stdin().is_terminal() {
            Self {
                history: Vec::new(),
                plain: None,
            }
        } else {
            tracing::debug!("stdin is not a terminal, reading lines directly");
            Self::from_reader(BufReader::new(tokio::io::stdin()))
        }
    }

    /// Read plain lines from `reader`, without the line editor.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);
        Self {
            history: Vec::new(),
            plain: Some(reader.lines()),
        }
    }

    async fn read_interactive(&mut self, prompt: &str) -> Option<InputEvent> {
        let (mut rl, _writer) = match Readline::new(prompt.to_string()) {
            Ok(editor) => editor,
            Err(e) => {
                tracing::debug!(error = %e, "line editor unavailable, reading stdin directly");
                return None;
            }
        };
        for entry in &self.history {
            let _ = rl.add_history_entry(entry.clone());
        }

        let event = match rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => InputEvent::Line(strip_line_ending(&line).to_string()),
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(e) => {
                tracing::warn!(error = %e, "readline failed");
                InputEvent::Eof
            }
        };
        let _ = rl.flush();

        if let InputEvent::Line(line) = &event {
            self.remember(line);
        }
        Some(event)
    }

    async fn read_plain(&mut self, prompt: &str) -> InputEvent {
        print!("{prompt}");
        let _ = std::io::stdout().flush();

        let lines = self.plain.get_or_insert_with(|| {
            let stdin: Box<dyn AsyncBufRead + Unpin + Send> =
                Box::new(BufReader::new(tokio::io::stdin()));
            stdin.lines()
        });
        match lines.next_line().await {
            Ok(Some(line)) => InputEvent::Line(strip_line_ending(&line).to_string()),
            Ok(None) => InputEvent::Eof,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stdin");
                InputEvent::Eof
            }
        }
    }

    fn remember(&mut self, line: &str) {
        if line.trim().is_empty() || self.history.last().is_some_and(|last| last == line) {
            return;
        }
        if self.history.len() == MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push(line.to_string());
    }
}

impl LineReader for ChatInput {
    async fn read_line(&mut self, prompt: &str) -> InputEvent {
        if self.plain.is_none() {
            if let Some(event) = self.read_interactive(prompt).await {
                return event;
            }
        }
        self.read_plain(prompt).await
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("hello\r\n"), "hello");
        assert_eq!(strip_line_ending("  indented  "), "  indented  ");
    }

    fn plain_input(text: &str) -> ChatInput {
        ChatInput::from_reader(std::io::Cursor::new(text.as_bytes().to_vec()))
    }

    #[tokio::test]
    async fn test_plain_reader_yields_lines_then_eof() {
        let mut input = plain_input("hello\r\n  indented  \n'\n");

        assert_eq!(input.read_line("# P: ").await, InputEvent::Line("hello".to_string()));
        assert_eq!(
            input.read_line("").await,
            InputEvent::Line("  indented  ".to_string())
        );
        assert_eq!(input.read_line("").await, InputEvent::Line("'".to_string()));
        assert_eq!(input.read_line("# P: ").await, InputEvent::Eof);
    }

    #[test]
    fn test_history_skips_blanks_and_repeats() {
        let mut input = plain_input("");
        input.remember("first");
        input.remember("first");
        input.remember("   ");
        input.remember("second");
        assert_eq!(input.history, vec!["first", "second"]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut input = plain_input("");
        for i in 0..=MAX_HISTORY {
            input.remember(&format!("line {i}"));
        }
        assert_eq!(input.history.len(), MAX_HISTORY);
        assert_eq!(input.history[0], "line 1");
    }
}
