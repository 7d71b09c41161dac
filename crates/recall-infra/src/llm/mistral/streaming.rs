//! Mistral SSE stream adapter.
//!
//! The response body is a `text/event-stream` of `data: {json}` frames
//! separated by blank lines and terminated by `data: [DONE]`. Frames are
//! decoded incrementally from the byte stream, so a frame split across
//! network chunks is reassembled before parsing.

use std::fmt::Display;

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};

use recall_core::llm::CompletionStream;
use recall_types::llm::{LlmError, StopReason, StreamEvent};

use super::types::{MistralChatRequest, MistralStreamChunk};

const DONE_SENTINEL: &str = "[DONE]";

/// POST the request and stream back [`StreamEvent`]s.
pub fn create_mistral_stream(
    client: &reqwest::Client,
    url: &str,
    body: MistralChatRequest,
    api_key: &SecretString,
) -> CompletionStream {
    let client = client.clone();
    let url = url.to_string();
    let api_key = api_key.expose_secret().to_string();

    Box::pin(async_stream::try_stream! {
        let response = client
            .post(&url)
            .bearer_auth(&api_key)
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let response = check_status(response).await?;
        yield StreamEvent::Connected;

        let mut events = decode_event_stream(response.bytes_stream());
        while let Some(event) = events.next().await {
            yield event?;
        }
    })
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, body = %error_body, "Mistral API error response");
    Err(status_error(status.as_u16(), error_body))
}

/// Map a non-success HTTP status to an [`LlmError`].
pub(crate) fn status_error(status: u16, body: String) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited,
        400 | 422 => LlmError::InvalidRequest(body),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

/// Decode an SSE byte stream into text deltas, stop reasons and a final `Done`.
pub(crate) fn decode_event_stream<S, B, E>(body: S) -> CompletionStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut events = Box::pin(body.eventsource());

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| LlmError::Stream(e.to_string()))?;
            let data = event.data.trim();
            if data == DONE_SENTINEL {
                break;
            }
            if data.is_empty() {
                continue;
            }
            for stream_event in parse_chunk(data)? {
                yield stream_event;
            }
        }

        yield StreamEvent::Done;
    })
}

/// Parse one `data:` payload.
pub(crate) fn parse_chunk(data: &str) -> Result<Vec<StreamEvent>, LlmError> {
    let chunk: MistralStreamChunk = serde_json::from_str(data)
        .map_err(|e| LlmError::Deserialization(format!("mistral chunk: {e}")))?;

    let mut events = Vec::new();
    for choice in chunk.choices {
        if let Some(content) = choice.delta.content {
            let text = content.text();
            if !text.is_empty() {
                events.push(StreamEvent::TextDelta { text });
            }
        }
        if let Some(reason) = choice.finish_reason {
            events.push(StreamEvent::MessageDelta {
                stop_reason: StopReason::from_finish_reason(&reason),
            });
        }
    }
    Ok(events)
}
