//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait
//! defined in `recall-core`, and a provider factory ([`create_provider`])
//! that constructs the right adapter for a [`ProviderKind`].

pub mod mistral;
pub mod openai_compat;

use secrecy::SecretString;

use recall_core::llm::LlmProvider;
use recall_types::llm::{ProviderFamily, ProviderKind, SamplingParams};

use self::mistral::MistralProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Create a boxed provider for `kind`.
///
/// Sampling parameters are fixed for the lifetime of the adapter.
pub fn create_provider(
    kind: ProviderKind,
    api_key: SecretString,
    sampling: SamplingParams,
) -> Box<dyn LlmProvider> {
    tracing::info!(provider = %kind, model = kind.model_id(), "creating provider");
    match (kind.family(), kind) {
        (ProviderFamily::Mistral, _) => {
            Box::new(MistralProvider::new(api_key, kind.model_id(), sampling))
        }
        (ProviderFamily::OpenAiCompatible, ProviderKind::Typhoon) => {
            Box::new(OpenAiCompatibleProvider::typhoon(api_key, sampling))
        }
        (ProviderFamily::OpenAiCompatible, _) => Box::new(OpenAiCompatibleProvider::together(
            api_key,
            kind.model_id(),
            sampling,
        )),
    }
}
