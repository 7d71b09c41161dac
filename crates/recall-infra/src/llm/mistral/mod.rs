//! MistralProvider -- native [`LlmProvider`] implementation for Mistral AI.
//!
//! Talks to `POST /v1/chat/completions` with `stream: true` over plain
//! reqwest and decodes the SSE body itself, since Mistral deltas may carry
//! typed content chunks that the OpenAI client types do not model.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

pub mod streaming;
pub mod types;

use std::time::Duration;

use secrecy::SecretString;

use recall_core::llm::{CompletionStream, LlmProvider};
use recall_types::llm::{Message, ProviderKind, SamplingParams};

use self::streaming::create_mistral_stream;
use self::types::MistralChatRequest;

/// Mistral AI LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers.
pub struct MistralProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    sampling: SamplingParams,
}

impl MistralProvider {
    /// Create a new Mistral provider against the public API.
    pub fn new(api_key: SecretString, model: &str, sampling: SamplingParams) -> Self {
        Self::with_base_url(api_key, ProviderKind::Mistral.base_url(), model, sampling)
    }

    pub fn with_base_url(
        api_key: SecretString,
        base_url: &str,
        model: &str,
        sampling: SamplingParams,
    ) -> Self {
        // No overall timeout: a response streams for as long as the model generates.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            sampling,
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, messages: &[Message]) -> MistralChatRequest {
        MistralChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            max_tokens: self.sampling.max_tokens,
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
            stream: true,
        }
    }
}

// MistralProvider intentionally does NOT derive Debug.

impl LlmProvider for MistralProvider {
    fn name(&self) -> &str {
        "mistral"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn begin_completion(&self, messages: &[Message]) -> CompletionStream {
        let body = self.build_request(messages);
        let url = self.url();

        tracing::debug!(url = %url, model = %self.model, messages = messages.len(), "Mistral stream request");

        create_mistral_stream(&self.client, &url, body, &self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_and_identity() {
        let provider = MistralProvider::new(
            SecretString::from("ms-test"),
            "mistral-small-latest",
            SamplingParams::default(),
        );
        assert_eq!(provider.name(), "mistral");
        assert_eq!(provider.model(), "mistral-small-latest");
        assert_eq!(provider.url(), "https://api.mistral.ai/v1/chat/completions");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = MistralProvider::with_base_url(
            SecretString::from("ms-test"),
            "http://localhost:8080/v1/",
            "m",
            SamplingParams::default(),
        );
        assert_eq!(provider.url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_request_uses_fixed_sampling() {
        let sampling = SamplingParams {
            max_tokens: 128,
            temperature: 0.1,
            top_p: 0.5,
        };
        let provider = MistralProvider::new(SecretString::from("k"), "m", sampling);
        let request = provider.build_request(&[Message::user("a"), Message::assistant("b")]);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.max_tokens, 128);
        assert!(request.stream);
    }
}
