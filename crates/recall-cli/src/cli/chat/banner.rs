//! Welcome banner display for chat sessions.
//!
//! Prints the selected model and the command vocabulary when a session
//! starts.

use console::style;

use recall_core::chat::commands::SessionCommand;

/// Plain banner line, as written to the transcript log.
pub fn banner_text(model_label: &str) -> String {
    let commands: Vec<&str> = SessionCommand::ALL.iter().map(|cmd| cmd.token()).collect();
    format!("# {model_label} | {}", commands.join(", "))
}

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(model_label: &str, model_id: &str) {
    println!();
    println!("{}", style(banner_text(model_label)).cyan().bold());
    println!("  {}", style(model_id).dim());
    println!(
        "  {}",
        style("Type help for commands, Ctrl+C to save and exit, Ctrl+D to exit").dim()
    );
    println!();
}
