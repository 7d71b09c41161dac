//! LLM conversation and streaming types.
//!
//! These types model the data shapes for provider interactions: the
//! role-tagged messages of a transcript, the fixed sampling parameters an
//! adapter is built with, the provider-agnostic streaming events, and the
//! static set of supported providers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation.
///
/// Serializes as `{"role":"user","content":"..."}`, the same shape stored in
/// the `content` column of saved conversations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Generation ceiling and sampling settings applied to every request.
///
/// Supplied once when an adapter is constructed; never varied per call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.6,
            top_p: 0.95,
        }
    }
}

/// Reason why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ContentFilter,
    Other(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::ContentFilter => write!(f, "content_filter"),
            StopReason::Other(reason) => write!(f, "{reason}"),
        }
    }
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason` string.
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" | "eos" => StopReason::EndTurn,
            "length" | "model_length" => StopReason::MaxTokens,
            "content_filter" => StopReason::ContentFilter,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// Events emitted during a streaming completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Connection established with the provider.
    Connected,

    /// An incremental fragment of response text.
    TextDelta { text: String },

    /// The message is finishing with a stop reason.
    MessageDelta { stop_reason: StopReason },

    /// The stream has completed.
    Done,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// The static set of supported providers, selected once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Typhoon,
    Mistral,
    Llama,
    Deepseek,
}

/// Wire protocol family a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFamily {
    OpenAiCompatible,
    Mistral,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Typhoon,
        ProviderKind::Mistral,
        ProviderKind::Llama,
        ProviderKind::Deepseek,
    ];

    /// The selector string accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Typhoon => "typhoon",
            ProviderKind::Mistral => "mistral",
            ProviderKind::Llama => "llama",
            ProviderKind::Deepseek => "deepseek",
        }
    }

    pub fn family(&self) -> ProviderFamily {
        match self {
            ProviderKind::Mistral => ProviderFamily::Mistral,
            ProviderKind::Typhoon | ProviderKind::Llama | ProviderKind::Deepseek => {
                ProviderFamily::OpenAiCompatible
            }
        }
    }

    /// Backend model identifier sent with every request.
    pub fn model_id(&self) -> &'static str {
        match self {
            ProviderKind::Typhoon => "typhoon-v2-70b-instruct",
            ProviderKind::Mistral => "mistral-small-latest",
            ProviderKind::Llama => "meta-llama/Llama-3.3-70B-Instruct-Turbo-Free",
            ProviderKind::Deepseek => "deepseek-ai/DeepSeek-R1-Distill-Llama-70B-free",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            ProviderKind::Typhoon => "https://api.opentyphoon.ai/v1",
            ProviderKind::Mistral => "https://api.mistral.ai/v1",
            ProviderKind::Llama | ProviderKind::Deepseek => "https://api.together.xyz/v1",
        }
    }

    /// Environment variable holding the API credential.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Typhoon => "OPENTYPHOON_API_KEY",
            ProviderKind::Mistral => "MISTRAL_API_KEY",
            ProviderKind::Llama | ProviderKind::Deepseek => "TOGETHER_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownProvider(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_display() {
        assert_eq!(MessageRole::User.to_string(), "user");
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_message_serde_shape() {
        let msg = Message::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);
    }

    #[test]
    fn test_legacy_transcript_deserializes() {
        let json = r#"[{"role": "user", "content": "hi"}, {"role": "assistant", "content": "hello"}]"#;
        let messages: Vec<Message> = serde_json::from_str(json).unwrap();
        assert_eq!(messages, vec![Message::user("hi"), Message::assistant("hello")]);
    }

    #[test]
    fn test_sampling_defaults() {
        let params = SamplingParams::default();
        assert_eq!(params.max_tokens, 4096);
        assert!((params.temperature - 0.6).abs() < f32::EPSILON);
        assert!((params.top_p - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_provider_kind_roundtrip() {
        for kind in ProviderKind::ALL {
            let parsed: ProviderKind = kind.to_string().parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_provider_kind_case_insensitive() {
        assert_eq!("LLAMA".parse::<ProviderKind>().unwrap(), ProviderKind::Llama);
    }

    #[test]
    fn test_provider_kind_unknown_fails() {
        let err = "gpt".parse::<ProviderKind>().unwrap_err();
        assert!(err.to_string().contains("gpt"));
        assert!(err.to_string().contains("llama"));
    }

    #[test]
    fn test_together_models_share_credential() {
        assert_eq!(
            ProviderKind::Llama.api_key_env(),
            ProviderKind::Deepseek.api_key_env()
        );
        assert_eq!(ProviderKind::Mistral.family(), ProviderFamily::Mistral);
        assert_eq!(ProviderKind::Typhoon.family(), ProviderFamily::OpenAiCompatible);
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(StopReason::from_finish_reason("stop"), StopReason::EndTurn);
        assert_eq!(StopReason::from_finish_reason("length"), StopReason::MaxTokens);
        assert_eq!(
            StopReason::from_finish_reason("tool_calls"),
            StopReason::Other("tool_calls".to_string())
        );
    }
}
