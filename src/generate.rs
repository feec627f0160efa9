//! Concrete [`Generator`] speaking an OpenAI-compatible chat completions
//! API with SSE streaming, e.g. a local Docker model runner or any hosted
//! endpoint exposing `/chat/completions`.
//!
//! The request carries three messages: the fixed system instructions, the
//! workflow file's content as a second system message, and the fixed user
//! prompt. Fragments are forwarded to the observer as they arrive and the
//! returned final text is their concatenation.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GenerationConfig;
use crate::contract::{ChunkObserver, GenerateError, GenerationRequest, Generator};

pub struct OpenAiGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate<'a, 'b>(
        &self,
        request: GenerationRequest<'a>,
        observer: &'b mut (dyn ChunkObserver + 'b),
    ) -> Result<String, GenerateError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: request.system_instructions },
                ChatMessage { role: "system", content: request.source_content },
                ChatMessage { role: "user", content: request.user_prompt },
            ],
            stream: true,
        };

        let mut http_request = self.client.post(self.completions_url()).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(format!("generation API error ({status}): {detail}").into());
        }

        let mut stream = response.bytes_stream();
        let mut lines = LineBuffer::new();
        let mut assembled = String::new();
        let mut done = false;

        while let Some(bytes) = stream.next().await {
            let bytes = bytes?;
            for line in lines.extend(&bytes) {
                match parse_sse_line(&line)? {
                    SsePayload::Delta(text) => {
                        observer.on_chunk(&text);
                        assembled.push_str(&text);
                    }
                    SsePayload::Done => done = true,
                    SsePayload::Ignore => {}
                }
            }
            if done {
                break;
            }
        }

        debug!(chars = assembled.len(), "Generation stream finished");
        Ok(assembled)
    }
}

/// Accumulates raw network bytes and yields complete lines.
///
/// Network chunk boundaries fall at arbitrary byte offsets, so a multi-byte
/// codepoint can arrive split across chunks. Decoding happens only once a
/// full line (terminated by `\n`) is buffered, never on a partial chunk.
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Appends raw bytes and returns the lines they completed, with line
    /// terminators stripped.
    fn extend(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            lines.push(String::from_utf8_lossy(&line).trim_end().to_string());
        }
        lines
    }
}

enum SsePayload {
    /// An incremental text fragment.
    Delta(String),
    /// The `[DONE]` terminator.
    Done,
    /// Blank line, comment, or an event with no text content.
    Ignore,
}

/// Parses one server-sent-event line from a chat completions stream.
fn parse_sse_line(line: &str) -> Result<SsePayload, GenerateError> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(SsePayload::Ignore);
    };
    let data = data.trim();
    if data.is_empty() {
        return Ok(SsePayload::Ignore);
    }
    if data == "[DONE]" {
        return Ok(SsePayload::Done);
    }
    let event: StreamEvent = serde_json::from_str(data)
        .map_err(|e| format!("malformed stream event {data:?}: {e}"))?;
    match event
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
    {
        Some(text) if !text.is_empty() => Ok(SsePayload::Delta(text)),
        _ => Ok(SsePayload::Ignore),
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct StreamEvent {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;

    fn config(endpoint: &str) -> GenerationConfig {
        GenerationConfig {
            endpoint: endpoint.to_string(),
            model: "test-model".to_string(),
            api_key: None,
            system_instructions: "sys".to_string(),
            user_prompt: "prompt".to_string(),
        }
    }

    #[test]
    fn completions_url_strips_trailing_slash() {
        let generator = OpenAiGenerator::new(&config("http://localhost:12434/engines/v1/"));
        assert_eq!(
            generator.completions_url(),
            "http://localhost:12434/engines/v1/chat/completions"
        );
    }

    #[test]
    fn parses_delta_line() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        match parse_sse_line(line).unwrap() {
            SsePayload::Delta(text) => assert_eq!(text, "Hello"),
            _ => panic!("expected a delta"),
        }
    }

    #[test]
    fn recognises_done_terminator() {
        assert!(matches!(
            parse_sse_line("data: [DONE]").unwrap(),
            SsePayload::Done
        ));
    }

    #[test]
    fn ignores_blank_lines_and_role_only_events() {
        assert!(matches!(parse_sse_line("").unwrap(), SsePayload::Ignore));
        assert!(matches!(parse_sse_line(": ping").unwrap(), SsePayload::Ignore));
        let role_only = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert!(matches!(parse_sse_line(role_only).unwrap(), SsePayload::Ignore));
    }

    #[test]
    fn malformed_event_is_an_error() {
        assert!(parse_sse_line("data: {not-json").is_err());
    }

    #[test]
    fn line_buffer_only_yields_complete_lines() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.extend(b"data: par").is_empty());
        let lines = buffer.extend(b"tial\ndata: next");
        assert_eq!(lines, vec!["data: partial"]);
        assert_eq!(buffer.extend(b"\n"), vec!["data: next"]);
    }

    #[test]
    fn line_buffer_reassembles_codepoints_split_across_chunks() {
        let event = "data: {\"choices\":[{\"delta\":{\"content\":\"caf\u{e9}\"}}]}\n";
        let bytes = event.as_bytes();
        // Split between the two bytes of the 'é' codepoint.
        let split = bytes.iter().position(|&b| b == 0xC3).unwrap() + 1;

        let mut buffer = LineBuffer::new();
        assert!(buffer.extend(&bytes[..split]).is_empty());
        let lines = buffer.extend(&bytes[split..]);
        assert_eq!(lines.len(), 1);

        match parse_sse_line(&lines[0]).unwrap() {
            SsePayload::Delta(text) => assert_eq!(text, "caf\u{e9}"),
            _ => panic!("expected a delta"),
        }
    }
}
