//! Conversation summary generation for the save flow.
//!
//! The summary is produced by an ordinary streamed turn, so the request and
//! its answer become part of the saved transcript.

/// Synthetic user turn appended before saving.
pub const SUMMARY_REQUEST: &str = "summarize this conversation as a one-line heading only";

/// Reduce a summary response to a single heading line.
///
/// Takes the last non-empty line of the trimmed response, stripped of
/// markdown heading markers and surrounding quotes. Models often prefix the
/// heading with a sentence like "Here is a heading:".
pub fn summary_line(response: &str) -> String {
    let line = response
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .unwrap_or_default();

    line.trim_start_matches('#')
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_single_line() {
        assert_eq!(summary_line("Greeting exchange"), "Greeting exchange");
    }

    #[test]
    fn test_summary_takes_last_non_empty_line() {
        let raw = "Sure, here is a heading:\n\nRust lifetimes explained\n\n";
        assert_eq!(summary_line(raw), "Rust lifetimes explained");
    }

    #[test]
    fn test_summary_strips_heading_and_quotes() {
        assert_eq!(summary_line("  # \"Trip planning\"  "), "Trip planning");
        assert_eq!(summary_line("'Quantum basics'"), "Quantum basics");
    }

    #[test]
    fn test_summary_empty_response() {
        assert_eq!(summary_line("  \n "), "");
    }

    #[test]
    fn test_summary_request_text() {
        assert!(SUMMARY_REQUEST.contains("one-line heading"));
    }
}
