//! Environment variable credential lookup.
//!
//! Each provider reads its API key from a fixed variable (see
//! `ProviderKind::api_key_env`). Llama and Deepseek share `TOGETHER_API_KEY`.
//! A missing, empty or non-Unicode variable is a fatal startup error.

use secrecy::SecretString;

use recall_types::error::ConfigError;
use recall_types::llm::ProviderKind;

/// Read the API key for `kind` from the process environment.
pub fn api_key_from_env(kind: ProviderKind) -> Result<SecretString, ConfigError> {
    api_key_with(kind, |name| std::env::var(name).ok())
}

/// Resolve the API key for `kind` through an arbitrary variable lookup.
pub fn api_key_with<F>(kind: ProviderKind, lookup: F) -> Result<SecretString, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env_var = kind.api_key_env();
    match lookup(env_var) {
        Some(value) if !value.trim().is_empty() => {
            tracing::debug!(provider = %kind, env_var, "credential found");
            Ok(SecretString::from(value.trim().to_string()))
        }
        _ => Err(ConfigError::MissingCredential {
            provider: kind.to_string(),
            env_var: env_var.to_string(),
        }),
    }
}
