//! Application state resolved before the session starts.
//!
//! Everything that can fail fatally (credentials, data directory, database,
//! configuration) is settled here, before any transcript exists.

use std::path::PathBuf;

use secrecy::SecretString;

use recall_infra::config::{load_global_config, resolve_data_dir, resolve_search_root};
use recall_infra::secret::api_key_from_env;
use recall_infra::sqlite::conversation::SqliteConversationRepository;
use recall_infra::sqlite::pool::{DatabasePool, database_url};
use recall_types::config::GlobalConfig;
use recall_types::llm::ProviderKind;

use crate::cli::Cli;

/// Resolved startup state for one session.
pub struct AppState {
    pub provider_kind: ProviderKind,
    pub api_key: SecretString,
    pub data_dir: PathBuf,
    pub search_root: PathBuf,
    pub config: GlobalConfig,
    pub repository: SqliteConversationRepository,
}

impl AppState {
    /// Resolve credentials, open the database and load config.toml.
    pub async fn init(cli: &Cli) -> anyhow::Result<Self> {
        let provider_kind = cli.model;

        // A missing credential is fatal before anything touches disk
        let api_key = api_key_from_env(provider_kind)?;

        let data_dir = resolve_data_dir(cli.data_dir.clone())?;
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let search_root = resolve_search_root(cli.search_root.clone(), &config)?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let repository = SqliteConversationRepository::new(db_pool);

        tracing::info!(
            provider = %provider_kind,
            data_dir = %data_dir.display(),
            search_root = %search_root.display(),
            "application state initialized"
        );

        Ok(Self {
            provider_kind,
            api_key,
            data_dir,
            search_root,
            config,
            repository,
        })
    }
}
