//! Terminal-facing ports used by the session loop.
//!
//! Kept as traits so the controller runs unchanged against scripted fakes
//! in tests and against rustyline/termimad/arboard in the binary.

use std::future::Future;

use recall_types::error::ClipboardError;

/// Result of reading one line from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A line of input, without the trailing newline.
    Line(String),
    /// End of input (Ctrl-D).
    Eof,
    /// Interrupt (Ctrl-C).
    Interrupted,
}

/// Source of user input lines.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> impl Future<Output = InputEvent>;
}

/// Sink for everything the session shows the user.
///
/// Every method is mirrored to the session transcript log by the terminal
/// implementation.
pub trait SessionOutput {
    /// A status or listing line.
    fn line(&mut self, text: &str);

    /// Text that goes to the transcript log only (prompts, echoed input, sources).
    fn record(&mut self, text: &str);

    /// Start of a streamed model response.
    fn begin_response(&mut self);

    /// One incremental fragment of the response.
    fn delta(&mut self, text: &str);

    /// End of the response; `full` is everything received.
    fn end_response(&mut self, full: &str);

    /// A block rendered as markdown.
    fn markdown(&mut self, text: &str);
}

/// System clipboard access.
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
    fn paste(&mut self) -> Result<String, ClipboardError>;
}
