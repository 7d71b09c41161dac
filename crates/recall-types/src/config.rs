//! Global configuration types for recall.
//!
//! `GlobalConfig` represents the optional `config.toml` in the data
//! directory. All fields have sensible defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Root directory searched by the `rg` command. `None` means the home directory.
    #[serde(default)]
    pub search_root: Option<PathBuf>,

    /// How many file-search candidates are offered for selection.
    #[serde(default = "default_search_choices")]
    pub search_choices: usize,

    /// How many saved conversations the `load` browser lists.
    #[serde(default = "default_recent_conversations")]
    pub recent_conversations: u32,
}

fn default_search_choices() -> usize {
    3
}

fn default_recent_conversations() -> u32 {
    3
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            search_root: None,
            search_choices: default_search_choices(),
            recent_conversations: default_recent_conversations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert!(config.search_root.is_none());
        assert_eq!(config.search_choices, 3);
        assert_eq!(config.recent_conversations, 3);
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
search_root = "/home/me/vault"
search_choices = 5
recent_conversations = 10
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search_root, Some(PathBuf::from("/home/me/vault")));
        assert_eq!(config.search_choices, 5);
        assert_eq!(config.recent_conversations, 10);
    }
}
