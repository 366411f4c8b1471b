use async_stream::stream;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use log::{debug, error, trace, warn};
use serde::{Deserialize, Serialize};

use super::{ChatBackend, ChatMessage, DeltaStream};
use crate::errors::PageError;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [&'a ChatMessage; 2],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// Hosted chat-completion API reached with a bearer credential
pub struct OpenAiBackend {
    client: reqwest::Client,
    api: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiBackend {
    pub fn new(
        client: reqwest::Client,
        api: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self { client, api: api.into(), api_key, model: model.into() }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    fn model(&self) -> &str {
        &self.model
    }

    async fn stream_chat(
        &self,
        system: &ChatMessage,
        user: &ChatMessage,
    ) -> Result<DeltaStream, PageError> {
        let url = self.endpoint();
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [system, user],
            stream: true,
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        debug!("Sending chat completion request to {} for {}", url, self.model);
        let response = builder.send().await.map_err(|e| {
            error!("Chat completion request failed: {}", e);
            PageError::Fetch(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Chat completion returned {}: {}", status, body);
            return Err(PageError::Fetch(format!("chat completion returned {}: {}", status, body)));
        }

        Ok(decode_event_stream(response.bytes_stream()))
    }
}

/// Decode an SSE body into content deltas, stopping at `data: [DONE]`
pub fn decode_event_stream<S, B, E>(body: S) -> DeltaStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    Box::pin(stream! {
        let mut events = Box::pin(body.eventsource());
        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    yield Err(PageError::Fetch(format!("event stream: {}", e)));
                    break;
                }
            };
            trace!("SSE event: {:?}", event);
            let data = event.data.trim();
            if data == "[DONE]" {
                break;
            }
            if data.is_empty() {
                continue;
            }
            let chunk: ChatCompletionChunk = match serde_json::from_str(data) {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!("Skipping unparsable chunk: {} ({})", data, e);
                    continue;
                }
            };
            let content = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
                .unwrap_or_default();
            if !content.is_empty() {
                yield Ok(content);
            }
        }
    })
}
