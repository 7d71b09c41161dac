//! Terminal output for the session loop.
//!
//! Prints to stdout, shows a thinking spinner until the first delta of a
//! response arrives, and mirrors everything into the session transcript log.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use recall_core::chat::io::SessionOutput;
use recall_core::chat::session::RESPONSE_HEADER;
use recall_infra::transcript_log::TranscriptLog;

use super::renderer::ChatRenderer;

/// Stdout sink with a transcript log mirror.
pub struct TerminalOutput {
    renderer: ChatRenderer,
    log: Option<TranscriptLog>,
    spinner: Option<ProgressBar>,
}

impl TerminalOutput {
    pub fn new(renderer: ChatRenderer, log: Option<TranscriptLog>) -> Self {
        Self {
            renderer,
            log,
            spinner: None,
        }
    }

    fn start_spinner(&mut self) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn log_line(&mut self, text: &str) {
        self.write_log(|log| log.write_line(text));
    }

    fn log_fragment(&mut self, text: &str) {
        self.write_log(|log| log.write_fragment(text));
    }

    /// The log is dropped after the first failed write; the session goes on.
    fn write_log<F>(&mut self, write: F)
    where
        F: FnOnce(&mut TranscriptLog) -> std::io::Result<()>,
    {
        let Some(log) = self.log.as_mut() else {
            return;
        };
        if let Err(e) = write(log) {
            tracing::warn!(error = %e, path = %log.path().display(), "transcript log disabled");
            self.log = None;
        }
    }
}

impl SessionOutput for TerminalOutput {
    fn line(&mut self, text: &str) {
        self.stop_spinner();
        if text.starts_with("! ") {
            println!("{}", style(text).red().bold());
        } else {
            println!("{text}");
        }
        self.log_line(text);
    }

    fn record(&mut self, text: &str) {
        self.log_line(text);
    }

    fn begin_response(&mut self) {
        println!("{}", style(RESPONSE_HEADER.trim_end()).cyan().bold());
        self.log_line(RESPONSE_HEADER.trim_end());
        self.start_spinner();
    }

    fn delta(&mut self, text: &str) {
        self.stop_spinner();
        print!("{text}");
        let _ = std::io::stdout().flush();
        self.log_fragment(text);
    }

    fn end_response(&mut self, full: &str) {
        self.stop_spinner();
        if !full.is_empty() && !full.ends_with('\n') {
            println!();
            self.log_line("");
        }
        println!();
        self.log_line("");
        if let Some(log) = self.log.as_mut() {
            let _ = log.flush();
        }
    }

    fn markdown(&mut self, text: &str) {
        self.stop_spinner();
        println!("{}", self.renderer.render_final(text));
        self.log_line(text);
    }
}

impl Drop for TerminalOutput {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_is_mirrored_to_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = TranscriptLog::open(dir.path()).unwrap();
        let path = log.path().to_path_buf();
        let mut output = TerminalOutput::new(ChatRenderer::new(), Some(log));

        output.record("# P: hello");
        output.begin_response();
        output.delta("Hi");
        output.delta(" there");
        output.end_response("Hi there");
        output.line("Conversation saved with id 1");
        drop(output);

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            contents,
            "# P: hello\n# M:\nHi there\n\nConversation saved with id 1\n"
        );
    }

    #[test]
    fn test_interrupted_response_without_text() {
        let dir = tempfile::tempdir().unwrap();
        let log = TranscriptLog::open(dir.path()).unwrap();
        let path = log.path().to_path_buf();
        let mut output = TerminalOutput::new(ChatRenderer::new(), Some(log));

        output.begin_response();
        output.end_response("");
        drop(output);

        assert_eq!(std::fs::read_to_string(path).unwrap(), "# M:\n\n");
    }

    #[test]
    fn test_without_log() {
        let mut output = TerminalOutput::new(ChatRenderer::new(), None);
        output.line("no log attached");
        output.markdown("**bold**");
    }
}
