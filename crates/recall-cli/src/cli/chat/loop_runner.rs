//! Session wiring.
//!
//! Builds the provider and the terminal ports from the resolved
//! [`AppState`], installs the Ctrl+C listener and runs the
//! [`SessionController`] to completion.

use anyhow::Context;
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use recall_core::chat::session::{SessionController, SessionEnd, SessionPorts, SessionSettings};
use recall_core::chat::io::SessionOutput;
use recall_infra::context::ripgrep::RipgrepSearcher;
use recall_infra::context::web::HttpWebExtractor;
use recall_infra::llm::create_provider;
use recall_infra::transcript_log::TranscriptLog;
use recall_types::llm::SamplingParams;

use crate::state::AppState;

use super::banner::{banner_text, print_welcome_banner};
use super::clipboard::SystemClipboard;
use super::input::ChatInput;
use super::output::TerminalOutput;
use super::renderer::ChatRenderer;

/// Exit status used when a second Ctrl+C aborts the interrupt save.
const FORCED_EXIT_CODE: i32 = 130;

/// Run one interactive session.
pub async fn run_chat_loop(state: AppState) -> anyhow::Result<SessionEnd> {
    let AppState {
        provider_kind,
        api_key,
        data_dir,
        search_root,
        config,
        repository,
    } = state;

    let provider = create_provider(provider_kind, api_key, SamplingParams::default());
    let model_id = provider.model().to_string();

    let log = TranscriptLog::open(&data_dir)
        .with_context(|| format!("failed to open a session log under {}", data_dir.display()))?;
    info!(path = %log.path().display(), "session log");

    let model_label = provider_kind.as_str().to_string();
    print_welcome_banner(&model_label, &model_id);

    let mut output = TerminalOutput::new(ChatRenderer::new(), Some(log));
    output.record(&banner_text(&model_label));

    let interrupt = CancellationToken::new();
    spawn_interrupt_listener(interrupt.clone());

    let ports = SessionPorts {
        provider,
        output: Box::new(output),
        clipboard: Box::new(SystemClipboard::new()),
        web: Box::new(HttpWebExtractor::new()),
        files: Box::new(RipgrepSearcher::new(search_root)),
    };
    let settings = SessionSettings {
        model_label,
        recent_conversations: config.recent_conversations,
        search_choices: config.search_choices,
    };

    let mut controller =
        SessionController::new(repository, ChatInput::new(), ports, settings, interrupt);
    // The controller reports the close through the output, so it reaches the log.
    let end = controller.run().await;
    info!(?end, "session closed");
    Ok(end)
}

/// First Ctrl+C cancels `interrupt`; a second one exits immediately.
fn spawn_interrupt_listener(interrupt: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            return;
        }
        info!("interrupt received");
        interrupt.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{}", style("Interrupted again, exiting without saving.").yellow());
            std::process::exit(FORCED_EXIT_CODE);
        }
    });
}
