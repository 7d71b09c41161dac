//! Mistral chat completions wire types.
//!
//! Request messages reuse the domain [`Message`] serialization, which already
//! matches the `{"role": ..., "content": ...}` shape the API expects.

use serde::{Deserialize, Serialize};

use recall_types::llm::Message;

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct MistralChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
}

/// One `data:` frame of the streaming response.
#[derive(Debug, Deserialize)]
pub struct MistralStreamChunk {
    #[serde(default)]
    pub choices: Vec<MistralChoice>,
}

#[derive(Debug, Deserialize)]
pub struct MistralChoice {
    #[serde(default)]
    pub delta: MistralDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MistralDelta {
    #[serde(default)]
    pub content: Option<MistralContent>,
}

/// Delta content: a plain string, or a list of typed chunks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MistralContent {
    Text(String),
    Chunks(Vec<MistralContentChunk>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MistralContentChunk {
    Text { text: String },
    #[serde(other)]
    Other,
}

impl MistralContent {
    /// Concatenated text parts; non-text chunks are skipped.
    pub fn text(&self) -> String {
        match self {
            MistralContent::Text(text) => text.clone(),
            MistralContent::Chunks(chunks) => chunks
                .iter()
                .filter_map(|chunk| match chunk {
                    MistralContentChunk::Text { text } => Some(text.as_str()),
                    MistralContentChunk::Other => None,
                })
                .collect(),
        }
    }
}
