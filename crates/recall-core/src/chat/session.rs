//! The session controller: command-dispatch loop over one transcript.
//!
//! Reads a line, classifies it against the command vocabulary, and either
//! runs a streamed chat turn (possibly context-augmented) or performs a
//! session-management side effect. Every mid-loop failure is reported and
//! the loop returns to idle; only an interrupt or end of input closes it.

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use recall_types::error::{ContextError, SelectionError, SessionError};
use recall_types::llm::{MessageRole, StreamEvent};

use crate::chat::commands::{self, MULTILINE_MARKER, PASTE_KEYWORD, SessionCommand};
use crate::chat::context::{FileSearcher, WebExtractor, context_block, inject};
use crate::chat::io::{Clipboard, InputEvent, LineReader, SessionOutput};
use crate::chat::repository::ConversationRepository;
use crate::chat::summary::{SUMMARY_REQUEST, summary_line};
use crate::chat::transcript::Transcript;
use crate::llm::LlmProvider;

pub const MAIN_PROMPT: &str = "# P: ";
pub const RESPONSE_HEADER: &str = "# M: ";
pub const URL_PROMPT: &str = "Enter URL: ";
pub const PATTERN_PROMPT: &str = "Pattern: ";
pub const SELECT_PROMPT: &str = "Select: ";
pub const LOAD_PROMPT: &str = "Load: ";
pub const INSTRUCTION_PROMPT: &str = "> ";
pub const MULTILINE_PROMPT: &str = "";

const PREVIEW_CHARS: usize = 80;

/// Per-session settings resolved at startup.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Selector label persisted with saved conversations (e.g. "llama").
    pub model_label: String,
    /// How many saved conversations `load` lists.
    pub recent_conversations: u32,
    /// How many file-search candidates `rg` offers.
    pub search_choices: usize,
}

/// The collaborators a session talks to, all behind trait objects.
pub struct SessionPorts {
    pub provider: Box<dyn LlmProvider>,
    pub output: Box<dyn SessionOutput>,
    pub clipboard: Box<dyn Clipboard>,
    pub web: Box<dyn WebExtractor>,
    pub files: Box<dyn FileSearcher>,
}

/// How a session closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// End of input at the main prompt. Nothing is saved.
    EndOfInput,
    /// Interrupt. `saved` is the id of the conversation written on the way out.
    Interrupted { saved: Option<i64> },
}

/// Drives one interactive session.
pub struct SessionController<R, I> {
    repository: R,
    input: I,
    provider: Box<dyn LlmProvider>,
    output: Box<dyn SessionOutput>,
    clipboard: Box<dyn Clipboard>,
    web: Box<dyn WebExtractor>,
    files: Box<dyn FileSearcher>,
    transcript: Transcript,
    settings: SessionSettings,
    interrupt: CancellationToken,
}

impl<R: ConversationRepository, I: LineReader> SessionController<R, I> {
    /// Create a controller with an empty transcript.
    ///
    /// `interrupt` is cancelled by the binary's Ctrl-C listener; it is raced
    /// against every prompt and every streamed delta.
    pub fn new(
        repository: R,
        input: I,
        ports: SessionPorts,
        settings: SessionSettings,
        interrupt: CancellationToken,
    ) -> Self {
        let SessionPorts {
            provider,
            output,
            clipboard,
            web,
            files,
        } = ports;
        Self {
            repository,
            input,
            provider,
            output,
            clipboard,
            web,
            files,
            transcript: Transcript::new(),
            settings,
            interrupt,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Run the loop until end of input or an interrupt.
    ///
    /// An interrupt with a non-empty transcript runs the save flow exactly
    /// once before closing; that save is not itself interruptible.
    pub async fn run(&mut self) -> SessionEnd {
        info!(
            provider = self.provider.name(),
            model = self.provider.model(),
            "session started"
        );

        let end = self.run_until_closed().await;
        let farewell = match end {
            SessionEnd::EndOfInput => "Session ended".to_string(),
            SessionEnd::Interrupted { saved: Some(id) } => format!("Session ended, saved as {id}"),
            SessionEnd::Interrupted { saved: None } => "Session ended, nothing saved".to_string(),
        };
        self.output.line(&farewell);
        end
    }

    async fn run_until_closed(&mut self) -> SessionEnd {
        loop {
            let line = match self.next_input(MAIN_PROMPT).await {
                InputEvent::Line(line) => line,
                InputEvent::Eof => {
                    info!(messages = self.transcript.len(), "end of input, closing");
                    return SessionEnd::EndOfInput;
                }
                InputEvent::Interrupted => return self.close_on_interrupt().await,
            };

            match self.dispatch(&line).await {
                Ok(()) => {}
                Err(SessionError::Interrupted) => return self.close_on_interrupt().await,
                Err(err) => self.report(&err),
            }
        }
    }

    async fn dispatch(&mut self, line: &str) -> Result<(), SessionError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        // Commands match on the trimmed line; a chat turn keeps the line as typed.
        let Some(command) = commands::parse(trimmed) else {
            return self.chat_turn(line.to_string()).await;
        };
        debug!(command = command.token(), "dispatching command");

        match command {
            SessionCommand::MultiLine => {
                let text = self.capture_multiline().await?;
                if text.trim().is_empty() {
                    return Ok(());
                }
                self.chat_turn(text).await
            }
            SessionCommand::Url => {
                let prompt = self.url_flow().await?;
                self.chat_turn(prompt).await
            }
            SessionCommand::Search => {
                let prompt = self.search_flow().await?;
                self.chat_turn(prompt).await
            }
            SessionCommand::Undo => {
                if self.transcript.undo() {
                    self.output.line("Removed the last exchange");
                } else {
                    self.output.line("Nothing to undo");
                }
                Ok(())
            }
            SessionCommand::Save => {
                let id = self.save(true).await?;
                self.output.line(&format!("Conversation saved with id {id}"));
                Ok(())
            }
            SessionCommand::Load => self.load_flow().await,
            SessionCommand::Copy => self.copy_last(),
            SessionCommand::Help => {
                for line in commands::help_lines() {
                    self.output.line(&line);
                }
                Ok(())
            }
        }
    }

    async fn chat_turn(&mut self, text: String) -> Result<(), SessionError> {
        self.transcript.append(MessageRole::User, text);
        self.complete_turn(true).await.map(|_| ())
    }

    /// Stream one completion over the whole transcript and append the reply.
    ///
    /// On a provider error the partial text (if any) is kept as the assistant
    /// message; with no text the dangling user message is dropped. An
    /// interrupt leaves the transcript untouched.
    async fn complete_turn(&mut self, honor_interrupt: bool) -> Result<String, SessionError> {
        debug!(messages = self.transcript.len(), "starting completion");
        self.output.begin_response();

        let mut stream = self.provider.begin_completion(self.transcript.messages());
        let mut response = String::new();

        loop {
            let next = if honor_interrupt {
                tokio::select! {
                    biased;
                    _ = self.interrupt.cancelled() => {
                        self.output.end_response(&response);
                        warn!(received = response.len(), "completion interrupted");
                        return Err(SessionError::Interrupted);
                    }
                    next = stream.next() => next,
                }
            } else {
                stream.next().await
            };

            match next {
                Some(Ok(StreamEvent::TextDelta { text })) => {
                    if !text.is_empty() {
                        self.output.delta(&text);
                        response.push_str(&text);
                    }
                }
                Some(Ok(StreamEvent::MessageDelta { stop_reason })) => {
                    debug!(%stop_reason, "completion stopping");
                }
                Some(Ok(StreamEvent::Connected)) => {}
                Some(Ok(StreamEvent::Done)) | None => break,
                Some(Err(err)) => {
                    self.output.end_response(&response);
                    self.settle_failed_turn(&response);
                    return Err(err.into());
                }
            }
        }

        self.output.end_response(&response);
        self.transcript
            .append(MessageRole::Assistant, response.clone());
        Ok(response)
    }

    fn settle_failed_turn(&mut self, partial: &str) {
        if !partial.is_empty() {
            self.transcript.append(MessageRole::Assistant, partial);
        } else if self
            .transcript
            .last()
            .is_some_and(|message| message.role == MessageRole::User)
        {
            self.transcript.pop_last();
        }
    }

    /// Ask the model for a heading, then persist the transcript including
    /// the summary exchange.
    async fn save(&mut self, honor_interrupt: bool) -> Result<i64, SessionError> {
        self.transcript.append(MessageRole::User, SUMMARY_REQUEST);
        let response = match self.complete_turn(honor_interrupt).await {
            Ok(response) => response,
            Err(SessionError::Interrupted) => {
                self.transcript.pop_last();
                return Err(SessionError::Interrupted);
            }
            Err(err) => return Err(err),
        };

        let summary = summary_line(&response);
        let messages = self.transcript.snapshot();
        let id = self
            .repository
            .insert(&messages, &summary, &self.settings.model_label)
            .await?;
        info!(id, summary = %summary, "conversation saved");
        Ok(id)
    }

    async fn close_on_interrupt(&mut self) -> SessionEnd {
        if self.transcript.is_empty() {
            info!("interrupted with an empty transcript, closing without saving");
            return SessionEnd::Interrupted { saved: None };
        }

        self.output.line("Interrupted, saving conversation");
        match self.save(false).await {
            Ok(id) => {
                self.output.line(&format!("Conversation saved with id {id}"));
                SessionEnd::Interrupted { saved: Some(id) }
            }
            Err(err) => {
                self.report(&err);
                SessionEnd::Interrupted { saved: None }
            }
        }
    }

    async fn load_flow(&mut self) -> Result<(), SessionError> {
        let listings = self
            .repository
            .list_recent(self.settings.recent_conversations)
            .await?;
        if listings.is_empty() {
            self.output.line("No saved conversations");
            return Ok(());
        }
        for (index, listing) in listings.iter().enumerate() {
            self.output.line(&format!("{index}: {}", listing.summary));
        }

        let pick = self.read_nested(LOAD_PROMPT).await?;
        let index = SelectionError::parse_index(&pick, listings.len())?;
        let id = listings[index].id;
        let record = self
            .repository
            .get(id)
            .await?
            .ok_or(SessionError::ConversationNotFound(id))?;

        info!(id, messages = record.messages.len(), model = %record.model, "conversation loaded");
        self.transcript.replace(record.messages);
        self.output
            .line(&format!("Loaded conversation {id}: {}", record.summary));
        self.replay();
        Ok(())
    }

    /// Show a loaded transcript: previews for every message, the final
    /// assistant reply in full as markdown.
    fn replay(&mut self) {
        let last_reply = self
            .transcript
            .messages()
            .iter()
            .rposition(|message| message.role == MessageRole::Assistant);

        for (index, message) in self.transcript.messages().iter().enumerate() {
            let header = match message.role {
                MessageRole::User => MAIN_PROMPT,
                MessageRole::Assistant => RESPONSE_HEADER,
            };
            if Some(index) == last_reply {
                self.output.line(header.trim_end());
                self.output.markdown(&message.content);
            } else {
                self.output
                    .line(&format!("{header}{}", preview(&message.content)));
            }
        }
    }

    async fn url_flow(&mut self) -> Result<String, SessionError> {
        let url = self.read_nested(URL_PROMPT).await?;
        if url.is_empty() {
            return Err(ContextError::Cancelled.into());
        }

        let text = tokio::select! {
            biased;
            _ = self.interrupt.cancelled() => return Err(SessionError::Interrupted),
            text = self.web.fetch_text(&url) => text?,
        };
        debug!(url = %url, chars = text.len(), "web page extracted");
        self.instruct(&text, &url).await
    }

    async fn search_flow(&mut self) -> Result<String, SessionError> {
        let pattern = self.read_nested(PATTERN_PROMPT).await?;
        if pattern.is_empty() {
            return Err(ContextError::Cancelled.into());
        }

        let limit = self.settings.search_choices;
        let mut matches = tokio::select! {
            biased;
            _ = self.interrupt.cancelled() => return Err(SessionError::Interrupted),
            matches = self.files.search(&pattern, limit) => matches?,
        };
        matches.truncate(limit);
        if matches.is_empty() {
            return Err(ContextError::NoMatches(pattern).into());
        }

        let root = self.files.root().to_path_buf();
        for (index, path) in matches.iter().enumerate() {
            let shown = path.strip_prefix(&root).unwrap_or(path.as_path());
            self.output.line(&format!("{index}: {}", shown.display()));
        }

        let pick = self.read_nested(SELECT_PROMPT).await?;
        let index = SelectionError::parse_index(&pick, matches.len())?;
        let path = &matches[index];
        let text = self.files.read(path).await?;
        self.instruct(&text, &path.display().to_string()).await
    }

    /// Show the sourced text, then ask for the instruction that follows it.
    async fn instruct(&mut self, context: &str, source: &str) -> Result<String, SessionError> {
        self.output.record(&format!("source: {source}"));
        self.output.line(&context_block(context));
        let instruction = self.read_nested(INSTRUCTION_PROMPT).await?;
        Ok(inject(context, &instruction))
    }

    async fn capture_multiline(&mut self) -> Result<String, SessionError> {
        self.output.line("Multi-line input, end with ' or Ctrl-D");
        let mut lines = Vec::new();

        loop {
            match self.next_input(MULTILINE_PROMPT).await {
                InputEvent::Line(line) => {
                    let marker = line.trim();
                    if marker == MULTILINE_MARKER {
                        break;
                    }
                    if marker.eq_ignore_ascii_case(PASTE_KEYWORD) {
                        match self.clipboard.paste() {
                            Ok(text) => {
                                self.output.line(&text);
                                lines.push(text);
                            }
                            Err(err) => self.report(&err.into()),
                        }
                    } else {
                        lines.push(line);
                    }
                }
                InputEvent::Eof => break,
                InputEvent::Interrupted => return Err(SessionError::Interrupted),
            }
        }

        Ok(lines.join("\n"))
    }

    fn copy_last(&mut self) -> Result<(), SessionError> {
        let Some(last) = self.transcript.last() else {
            self.output.line("Nothing to copy");
            return Ok(());
        };
        self.clipboard.copy(&last.content)?;
        self.output.line("Copied to clipboard");
        Ok(())
    }

    /// Single-line nested prompt. End of input cancels the enclosing flow.
    async fn read_nested(&mut self, prompt: &str) -> Result<String, SessionError> {
        match self.next_input(prompt).await {
            InputEvent::Line(line) => Ok(line.trim().to_string()),
            InputEvent::Eof => Err(ContextError::Cancelled.into()),
            InputEvent::Interrupted => Err(SessionError::Interrupted),
        }
    }

    async fn next_input(&mut self, prompt: &str) -> InputEvent {
        let event = tokio::select! {
            biased;
            _ = self.interrupt.cancelled() => InputEvent::Interrupted,
            event = self.input.read_line(prompt) => event,
        };
        if let InputEvent::Line(line) = &event {
            self.output.record(&format!("{prompt}{line}"));
        }
        event
    }

    fn report(&mut self, err: &SessionError) {
        warn!(error = %err, "command failed");
        self.output.line(&format!("! {err}"));
    }
}

fn preview(content: &str) -> String {
    let first = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    if first.chars().count() > PREVIEW_CHARS || content.trim() != first {
        let cut: String = first.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        first.to_string()
    }
}
