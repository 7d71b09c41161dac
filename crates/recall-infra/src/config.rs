//! Global configuration loader for recall.
//!
//! Reads `config.toml` from the data directory (`~/.llm/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};

use recall_types::config::GlobalConfig;
use recall_types::error::ConfigError;

/// Directory name under the home directory used when no data dir is given.
pub const DEFAULT_DATA_DIR_NAME: &str = ".llm";

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Resolve the data directory.
///
/// Priority: explicit flag/env value, then `~/.llm`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DATA_DIR_NAME))
        .ok_or_else(|| ConfigError::Invalid("cannot determine the home directory".to_string()))
}

/// Resolve the directory searched by `rg`.
///
/// Priority: command-line override, then `search_root` from config.toml,
/// then the home directory.
pub fn resolve_search_root(
    cli_override: Option<PathBuf>,
    global_config: &GlobalConfig,
) -> Result<PathBuf, ConfigError> {
    cli_override
        .or_else(|| global_config.search_root.clone())
        .or_else(dirs::home_dir)
        .ok_or_else(|| ConfigError::Invalid("cannot determine the search root".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
search_root = "/srv/notes"
recent_conversations = 10
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.search_root, Some(PathBuf::from("/srv/notes")));
        assert_eq!(config.recent_conversations, 10);
        assert_eq!(config.search_choices, 3);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn resolve_data_dir_prefers_explicit() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/recall"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/recall"));
    }

    #[test]
    fn resolve_search_root_priority() {
        let config = GlobalConfig {
            search_root: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };
        let root = resolve_search_root(Some(PathBuf::from("/from/cli")), &config).unwrap();
        assert_eq!(root, PathBuf::from("/from/cli"));

        let root = resolve_search_root(None, &config).unwrap();
        assert_eq!(root, PathBuf::from("/from/config"));
    }
}
