//! Command parsing for the session loop.
//!
//! A command is the whole trimmed input line, matched case-insensitively.
//! Anything else is a plain chat turn.

/// Line that opens and closes multi-line capture.
pub const MULTILINE_MARKER: &str = "'";

/// Line that, inside multi-line capture, is replaced by the clipboard contents.
pub const PASTE_KEYWORD: &str = "paste";

/// Session control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Read lines until the marker recurs or input ends.
    MultiLine,
    /// Inject the text of a web page.
    Url,
    /// Inject the text of a file found by content search.
    Search,
    /// Drop the last exchange.
    Undo,
    /// Summarize and persist the transcript.
    Save,
    /// Browse and restore a saved conversation.
    Load,
    /// Copy the most recent message to the clipboard.
    Copy,
    /// Show available commands.
    Help,
}

impl SessionCommand {
    pub const ALL: [SessionCommand; 8] = [
        SessionCommand::MultiLine,
        SessionCommand::Url,
        SessionCommand::Search,
        SessionCommand::Undo,
        SessionCommand::Save,
        SessionCommand::Load,
        SessionCommand::Copy,
        SessionCommand::Help,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            SessionCommand::MultiLine => MULTILINE_MARKER,
            SessionCommand::Url => "url",
            SessionCommand::Search => "rg",
            SessionCommand::Undo => "undo",
            SessionCommand::Save => "save",
            SessionCommand::Load => "load",
            SessionCommand::Copy => "copy",
            SessionCommand::Help => "help",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SessionCommand::MultiLine => "Multi-line input, end with ' or Ctrl-D",
            SessionCommand::Url => "Ask about the text of a web page",
            SessionCommand::Search => "Ask about a file found by content search",
            SessionCommand::Undo => "Remove the last exchange",
            SessionCommand::Save => "Summarize and save the conversation",
            SessionCommand::Load => "Load a recent conversation",
            SessionCommand::Copy => "Copy the last message to the clipboard",
            SessionCommand::Help => "Show this help message",
        }
    }
}

/// Parse user input as a session command.
///
/// Returns `None` if the input is a chat message.
pub fn parse(input: &str) -> Option<SessionCommand> {
    let wanted = input.trim().to_lowercase();
    SessionCommand::ALL
        .into_iter()
        .find(|cmd| cmd.token() == wanted)
}

/// Help text listing the command vocabulary, one command per line.
pub fn help_lines() -> Vec<String> {
    let mut lines: Vec<String> = SessionCommand::ALL
        .iter()
        .map(|cmd| format!("  {:<6} {}", cmd.token(), cmd.description()))
        .collect();
    lines.push("  Ctrl-C saves a non-empty conversation and exits; Ctrl-D exits".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("'"), Some(SessionCommand::MultiLine));
        assert_eq!(parse("url"), Some(SessionCommand::Url));
        assert_eq!(parse("rg"), Some(SessionCommand::Search));
        assert_eq!(parse("undo"), Some(SessionCommand::Undo));
        assert_eq!(parse("save"), Some(SessionCommand::Save));
        assert_eq!(parse("load"), Some(SessionCommand::Load));
        assert_eq!(parse("copy"), Some(SessionCommand::Copy));
        assert_eq!(parse("help"), Some(SessionCommand::Help));
    }

    #[test]
    fn test_parse_case_insensitive_and_trimmed() {
        assert_eq!(parse("  SAVE "), Some(SessionCommand::Save));
        assert_eq!(parse("Url"), Some(SessionCommand::Url));
    }

    #[test]
    fn test_parse_chat_message() {
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse("save this for later"), None);
        assert_eq!(parse("''"), None);
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_lines().join("\n");
        for cmd in SessionCommand::ALL {
            assert!(help.contains(cmd.description()));
        }
    }
}
