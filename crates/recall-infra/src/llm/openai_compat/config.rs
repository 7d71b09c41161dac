//! Configuration types and per-provider defaults for OpenAI-compatible providers.
//!
//! Each backend that speaks the OpenAI chat completions protocol gets a
//! factory function returning an [`OpenAiCompatConfig`] with the correct
//! base URL and provider name.

use secrecy::SecretString;

use recall_types::llm::{ProviderKind, SamplingParams};

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "typhoon", "together").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.together.xyz/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling settings applied to every request.
    pub sampling: SamplingParams,
}

/// OpenTyphoon default configuration.
///
/// Base URL: `https://api.opentyphoon.ai/v1`
pub fn typhoon_defaults(api_key: SecretString, sampling: SamplingParams) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "typhoon".into(),
        base_url: ProviderKind::Typhoon.base_url().into(),
        api_key,
        model: ProviderKind::Typhoon.model_id().into(),
        sampling,
    }
}

/// Together AI default configuration, shared by the llama and deepseek models.
///
/// Base URL: `https://api.together.xyz/v1`
pub fn together_defaults(
    api_key: SecretString,
    model: &str,
    sampling: SamplingParams,
) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "together".into(),
        base_url: ProviderKind::Llama.base_url().into(),
        api_key,
        model: model.into(),
        sampling,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typhoon_defaults() {
        let config = typhoon_defaults(SecretString::from("k"), SamplingParams::default());
        assert_eq!(config.provider_name, "typhoon");
        assert_eq!(config.base_url, "https://api.opentyphoon.ai/v1");
        assert_eq!(config.model, "typhoon-v2-70b-instruct");
    }

    #[test]
    fn test_together_defaults() {
        let config = together_defaults(
            SecretString::from("k"),
            ProviderKind::Deepseek.model_id(),
            SamplingParams::default(),
        );
        assert_eq!(config.provider_name, "together");
        assert_eq!(config.base_url, "https://api.together.xyz/v1");
        assert_eq!(config.model, "deepseek-ai/DeepSeek-R1-Distill-Llama-70B-free");
    }
}
