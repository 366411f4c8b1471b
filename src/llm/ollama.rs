use async_stream::stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use super::{ChatBackend, ChatMessage, DeltaStream};
use crate::errors::PageError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [&'a ChatMessage; 2],
    stream: bool,
}

/// One line of the newline-delimited response
#[derive(Debug, Deserialize)]
struct ChatPart {
    #[serde(default)]
    message: Option<PartMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PartMessage {
    #[serde(default)]
    content: String,
}

/// Open-weight model behind a locally routed Ollama gateway
pub struct OllamaBackend {
    client: reqwest::Client,
    host: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(client: reqwest::Client, host: impl Into<String>, model: impl Into<String>) -> Self {
        Self { client, host: host.into(), model: model.into() }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.host.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    fn model(&self) -> &str {
        &self.model
    }

    async fn stream_chat(
        &self,
        system: &ChatMessage,
        user: &ChatMessage,
    ) -> Result<DeltaStream, PageError> {
        let url = self.endpoint();
        let request = ChatRequest {
            model: &self.model,
            messages: [system, user],
            stream: true,
        };

        debug!("Sending chat request to {} for {}", url, self.model);
        let response = self.client.post(&url).json(&request).send().await.map_err(|e| {
            error!("Ollama request failed: {}", e);
            PageError::Fetch(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Ollama returned {}: {}", status, body);
            return Err(PageError::Fetch(format!("ollama returned {}: {}", status, body)));
        }

        Ok(decode_ndjson_stream(response.bytes_stream()))
    }
}

enum Line {
    Delta(String),
    Done,
    Skip,
}

fn parse_line(line: &[u8]) -> Result<Line, PageError> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Skip);
    }
    let part: ChatPart = match serde_json::from_str(line) {
        Ok(part) => part,
        Err(e) => {
            warn!("Skipping unparsable line: {} ({})", line, e);
            return Ok(Line::Skip);
        }
    };
    if let Some(message) = part.error {
        return Err(PageError::Fetch(format!("ollama: {}", message)));
    }
    if part.done {
        // The final part may still carry trailing content
        return Ok(match part.message {
            Some(message) if !message.content.is_empty() => Line::Delta(message.content),
            _ => Line::Done,
        });
    }
    Ok(part.message.map(|m| Line::Delta(m.content)).unwrap_or(Line::Skip))
}

/// Decode newline-delimited JSON parts into content deltas
pub fn decode_ndjson_stream<S, B, E>(body: S) -> DeltaStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    Box::pin(stream! {
        let mut body = Box::pin(body);
        let mut buffer: Vec<u8> = Vec::new();
        let mut finished = false;
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => buffer.extend_from_slice(bytes.as_ref()),
                Err(e) => {
                    yield Err(PageError::Fetch(format!("ollama stream: {}", e)));
                    finished = true;
                    break;
                }
            }
            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                match parse_line(&line) {
                    Ok(Line::Delta(text)) => {
                        if !text.is_empty() {
                            yield Ok(text);
                        }
                    }
                    Ok(Line::Done) => {
                        finished = true;
                        break;
                    }
                    Ok(Line::Skip) => {}
                    Err(e) => {
                        yield Err(e);
                        finished = true;
                        break;
                    }
                }
            }
            if finished {
                break;
            }
        }
        if !finished {
            // Last line without a trailing newline
            match parse_line(&buffer) {
                Ok(Line::Delta(text)) if !text.is_empty() => {
                    yield Ok(text);
                }
                Err(e) => {
                    yield Err(e);
                }
                _ => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::stream;
    use std::convert::Infallible;

    fn part(content: &str, done: bool) -> String {
        format!(
            "{{\"model\":\"qwen2\",\"message\":{{\"role\":\"assistant\",\"content\":{}}},\"done\":{}}}\n",
            serde_json::to_string(content).unwrap(),
            done
        )
    }

    async fn deltas(chunks: Vec<String>) -> Vec<Result<String, PageError>> {
        let body = stream::iter(chunks.into_iter().map(|c| Ok::<_, Infallible>(Bytes::from(c))));
        decode_ndjson_stream(body).collect().await
    }

    #[tokio::test]
    async fn yields_message_content_until_done() {
        let out = deltas(vec![part("Hello", false), part(" there", false), part("", true), part("late", false)]).await;
        let texts: Vec<String> = out.into_iter().map(Result::unwrap).collect();
        assert_eq!(texts, ["Hello", " there"]);
    }

    #[tokio::test]
    async fn lines_split_across_chunks_are_reassembled() {
        let line = part("Hi", false);
        let (head, tail) = line.split_at(10);
        let out = deltas(vec![head.to_string(), tail.to_string(), part("", true)]).await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref().unwrap(), "Hi");
    }

    #[tokio::test]
    async fn trailing_line_without_newline_is_read() {
        let last = part("end", false);
        let out = deltas(vec![last.trim_end().to_string()]).await;
        assert_eq!(out[0].as_ref().unwrap(), "end");
    }

    #[tokio::test]
    async fn error_lines_fail_the_stream() {
        let out = deltas(vec![part("a", false), "{\"error\":\"model not found\"}\n".to_string()]).await;
        assert_eq!(out.len(), 2);
        match &out[1] {
            Err(PageError::Fetch(message)) => assert!(message.contains("model not found")),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }
}
