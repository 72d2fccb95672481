use std::time::Duration;

use bytes::BytesMut;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio::time::timeout;
use tracing::{debug, info};

use super::models::{ChatChunk, ChatRequest, Message};
use crate::error::ChatError;

const DEFAULT_CHUNK_TIMEOUT_SECS: u64 = 120;

/// Client for an Ollama-compatible `/api/chat` endpoint.
pub struct ChatClient {
    http: Client,
    base_url: String,
    model: String,
    chunk_timeout_secs: u64,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            chunk_timeout_secs: DEFAULT_CHUNK_TIMEOUT_SECS,
        }
    }

    pub fn with_chunk_timeout(mut self, secs: u64) -> Self {
        self.chunk_timeout_secs = secs;
        self
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    /// Send the conversation and collect the streamed reply into one string.
    pub async fn chat(&self, messages: &[Message]) -> Result<String, ChatError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: true,
        };
        info!(model = %self.model, url = %self.chat_url(), "sending chat request");

        let response = self
            .http
            .post(self.chat_url())
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let mut stream = response.bytes_stream();
        let mut pending = BytesMut::new();
        let mut reply = String::new();
        let chunk_timeout = Duration::from_secs(self.chunk_timeout_secs);

        loop {
            match timeout(chunk_timeout, stream.next()).await {
                Ok(Some(chunk)) => pending.extend_from_slice(&chunk?),
                Ok(None) => break,
                Err(_) => return Err(ChatError::Timeout(self.chunk_timeout_secs)),
            }

            while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
                let line = pending.split_to(pos + 1);
                if apply_line(&line, &mut reply)? {
                    debug!(chars = reply.len(), "chat stream finished");
                    return Ok(reply);
                }
            }
        }

        // Final line may arrive without a trailing newline.
        apply_line(&pending, &mut reply)?;
        debug!(chars = reply.len(), "chat stream closed");
        Ok(reply)
    }
}

/// Appends one NDJSON line to `reply`; returns `true` once the stream reports `done`.
fn apply_line(line: &[u8], reply: &mut String) -> Result<bool, ChatError> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return Ok(false);
    }

    let chunk: ChatChunk = serde_json::from_str(text)?;
    if let Some(error) = chunk.error {
        return Err(ChatError::Api {
            status: 200,
            message: error,
        });
    }
    if let Some(message) = chunk.message {
        reply.push_str(&message.content);
    }
    Ok(chunk.done)
}
