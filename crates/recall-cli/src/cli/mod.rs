//! CLI argument definitions for the `recall` binary.
//!
//! Uses clap derive macros. There are no subcommands: the binary always
//! starts one interactive session.

pub mod chat;

use std::path::PathBuf;

use clap::Parser;

use recall_types::llm::ProviderKind;

/// Chat with a hosted LLM from the terminal, with web and file context.
#[derive(Parser)]
#[command(name = "recall", version, about, long_about = None)]
pub struct Cli {
    /// Model selector: typhoon, mistral, llama or deepseek.
    #[arg(short, long, default_value = "llama")]
    pub model: ProviderKind,

    /// Directory holding the conversation database, config.toml and logs.
    #[arg(long, env = "RECALL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory searched by the `rg` command (overrides config.toml).
    #[arg(long)]
    pub search_root: Option<PathBuf>,

    /// Detailed diagnostics on stderr (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_model_defaults_to_llama() {
        let cli = Cli::try_parse_from(["recall"]).unwrap();
        assert_eq!(cli.model, ProviderKind::Llama);
        assert_eq!(cli.verbose, 0);
        assert!(cli.search_root.is_none());
    }

    #[test]
    fn test_model_selector_parsed() {
        let cli = Cli::try_parse_from(["recall", "--model", "mistral", "-vv"]).unwrap();
        assert_eq!(cli.model, ProviderKind::Mistral);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_unknown_model_rejected() {
        let err = Cli::try_parse_from(["recall", "--model", "gpt"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("typhoon, mistral, llama, deepseek"));
    }

    #[test]
    fn test_search_root_flag() {
        let cli = Cli::try_parse_from(["recall", "--search-root", "/srv/notes"]).unwrap();
        assert_eq!(cli.search_root, Some(PathBuf::from("/srv/notes")));
    }
}
