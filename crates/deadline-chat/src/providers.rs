//! External LLM provider streaming implementations.
//!
//! Each provider streams tokens via SSE from their respective APIs.
//! OpenAI, Groq and Gemini (through its OpenAI-compatible endpoint) use the
//! same format. Anthropic uses a different one.

use std::pin::Pin;

use futures::Stream;
use reqwest::Client;
use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tracing::{debug, error};

use deadline_core::{Error, Result};

use crate::types::{ChatMessage, LLMProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

/// Boxed stream type for returning different stream implementations.
pub type BoxedStream = Pin<Box<dyn Stream<Item = StreamChunk> + Send>>;

/// A single streamed token or error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    Token(String),
    Done { tokens_used: usize },
    Error(String),
}

/// Sampling settings for one call.
#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    pub temperature: f64,
    pub max_tokens: usize,
}

/// Stream tokens from the appropriate provider.
pub fn stream_llm(
    client: &Client,
    provider: LLMProvider,
    messages: Vec<ChatMessage>,
    model: &str,
    api_key: &str,
    sampling: Sampling,
) -> BoxedStream {
    let url = match provider {
        LLMProvider::Anthropic => {
            return Box::pin(stream_anthropic(
                client.clone(),
                messages,
                model.to_string(),
                api_key.to_string(),
                sampling,
            ))
        }
        LLMProvider::OpenAI => OPENAI_URL,
        LLMProvider::Groq => GROQ_URL,
        LLMProvider::Gemini => GEMINI_URL,
    };
    Box::pin(stream_openai_compat(
        client.clone(),
        url,
        messages,
        model.to_string(),
        api_key.to_string(),
        sampling,
    ))
}

/// Drain a token stream into the full completion text.
pub async fn collect_stream(mut stream: BoxedStream) -> Result<String> {
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            StreamChunk::Token(token) => text.push_str(&token),
            StreamChunk::Done { tokens_used } => {
                debug!("Completion finished after {} chunk(s)", tokens_used);
                break;
            }
            StreamChunk::Error(message) => return Err(Error::Generation(message)),
        }
    }
    Ok(text)
}

/// Split complete lines off the front of a raw SSE byte buffer.
///
/// Only whole lines are decoded, so a multi-byte character split across
/// network chunks stays intact in the tail until its line completes.
fn drain_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
        let raw: Vec<u8> = buffer.drain(..=line_end).collect();
        let line = String::from_utf8_lossy(&raw[..line_end]).trim().to_string();
        if !line.is_empty() && !line.starts_with(':') {
            lines.push(line);
        }
    }
    lines
}

/// Interpret one `data:` payload of an OpenAI-compatible stream.
fn openai_chunk(data: &str) -> Option<StreamChunk> {
    if data.trim() == "[DONE]" {
        return Some(StreamChunk::Done { tokens_used: 0 });
    }
    let parsed: Value = serde_json::from_str(data).ok()?;
    if let Some(message) = parsed["error"]["message"].as_str() {
        return Some(StreamChunk::Error(message.to_string()));
    }
    parsed["choices"][0]["delta"]["content"]
        .as_str()
        .filter(|c| !c.is_empty())
        .map(|c| StreamChunk::Token(c.to_string()))
}

/// Interpret one `data:` payload of an Anthropic Messages stream.
fn anthropic_chunk(data: &str) -> Option<StreamChunk> {
    let parsed: Value = serde_json::from_str(data).ok()?;
    match parsed["type"].as_str() {
        Some("content_block_delta") => parsed["delta"]["text"]
            .as_str()
            .filter(|t| !t.is_empty())
            .map(|t| StreamChunk::Token(t.to_string())),
        Some("message_stop") => Some(StreamChunk::Done { tokens_used: 0 }),
        Some("error") => {
            let msg = parsed["error"]["message"]
                .as_str()
                .unwrap_or("Unknown error");
            error!("Anthropic error: {}", msg);
            Some(StreamChunk::Error(msg.to_string()))
        }
        _ => None,
    }
}

/// Stream from OpenAI-compatible APIs (OpenAI, Groq, Gemini).
fn stream_openai_compat(
    client: Client,
    url: &'static str,
    messages: Vec<ChatMessage>,
    model: String,
    api_key: String,
    sampling: Sampling,
) -> impl Stream<Item = StreamChunk> + Send + 'static {
    let msgs: Vec<Value> = messages
        .iter()
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    async_stream::stream! {
        let body = json!({
            "model": model,
            "messages": msgs,
            "temperature": sampling.temperature,
            "max_tokens": sampling.max_tokens,
            "stream": true,
        });

        debug!("Streaming from {} with model {}", url, model);

        let response = match client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                yield StreamChunk::Error(format!("Request failed: {}", e));
                return;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            yield StreamChunk::Error(format!("API error {}: {}", status, body));
            return;
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut token_count = 0usize;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    yield StreamChunk::Error(format!("Stream read error: {}", e));
                    return;
                }
            };

            buffer.extend_from_slice(&bytes);

            for line in drain_lines(&mut buffer) {
                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                match openai_chunk(data.trim_start()) {
                    Some(StreamChunk::Token(token)) => {
                        token_count += 1;
                        yield StreamChunk::Token(token);
                    }
                    Some(StreamChunk::Done { .. }) => {
                        yield StreamChunk::Done { tokens_used: token_count };
                        return;
                    }
                    Some(err @ StreamChunk::Error(_)) => {
                        yield err;
                        return;
                    }
                    None => {}
                }
            }
        }

        yield StreamChunk::Done { tokens_used: token_count };
    }
}

/// Stream from Anthropic's Messages API.
fn stream_anthropic(
    client: Client,
    messages: Vec<ChatMessage>,
    model: String,
    api_key: String,
    sampling: Sampling,
) -> impl Stream<Item = StreamChunk> + Send + 'static {
    // Separate system message from conversation
    let system_msg: Option<String> = messages
        .iter()
        .find(|m| m.role == "system")
        .map(|m| m.content.clone());

    let conv_msgs: Vec<Value> = messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    async_stream::stream! {
        let mut body = json!({
            "model": model,
            "messages": conv_msgs,
            "temperature": sampling.temperature,
            "max_tokens": sampling.max_tokens,
            "stream": true,
        });

        if let Some(sys) = system_msg {
            body["system"] = json!(sys);
        }

        debug!("Streaming from Anthropic with model {}", model);

        let response = match client
            .post(ANTHROPIC_URL)
            .header("x-api-key", &api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                yield StreamChunk::Error(format!("Request failed: {}", e));
                return;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            yield StreamChunk::Error(format!("API error {}: {}", status, body));
            return;
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut token_count = 0usize;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    yield StreamChunk::Error(format!("Stream read error: {}", e));
                    return;
                }
            };

            buffer.extend_from_slice(&bytes);

            // Anthropic uses "event: " lines followed by "data: " lines
            for line in drain_lines(&mut buffer) {
                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                match anthropic_chunk(data.trim_start()) {
                    Some(StreamChunk::Token(token)) => {
                        token_count += 1;
                        yield StreamChunk::Token(token);
                    }
                    Some(StreamChunk::Done { .. }) => {
                        yield StreamChunk::Done { tokens_used: token_count };
                        return;
                    }
                    Some(err @ StreamChunk::Error(_)) => {
                        yield err;
                        return;
                    }
                    None => {}
                }
            }
        }

        yield StreamChunk::Done { tokens_used: token_count };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_lines_keeps_partial_tail() {
        let mut buffer = b"event: ping\n: comment\n\ndata: {\"a\":1}\ndata: {\"b\"".to_vec();
        let lines = drain_lines(&mut buffer);
        assert_eq!(lines, vec!["event: ping", "data: {\"a\":1}"]);
        assert_eq!(buffer, b"data: {\"b\"");
    }

    #[test]
    fn test_drain_lines_joins_character_split_across_chunks() {
        let encoded = "data: Caf\u{e9}\n".as_bytes();
        let split = encoded.len() - 2;
        let mut buffer = Vec::new();

        buffer.extend_from_slice(&encoded[..split]);
        assert!(drain_lines(&mut buffer).is_empty());
        buffer.extend_from_slice(&encoded[split..]);
        assert_eq!(drain_lines(&mut buffer), vec!["data: Caf\u{e9}"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_openai_chunks() {
        assert_eq!(
            openai_chunk(r#"{"choices":[{"delta":{"content":"[{"}}]}"#),
            Some(StreamChunk::Token("[{".into()))
        );
        assert_eq!(openai_chunk(r#"{"choices":[{"delta":{}}]}"#), None);
        assert_eq!(openai_chunk("[DONE]"), Some(StreamChunk::Done { tokens_used: 0 }));
        assert_eq!(
            openai_chunk(r#"{"error":{"message":"quota"}}"#),
            Some(StreamChunk::Error("quota".into()))
        );
    }

    #[test]
    fn test_anthropic_chunks() {
        assert_eq!(
            anthropic_chunk(r#"{"type":"content_block_delta","delta":{"text":"ok"}}"#),
            Some(StreamChunk::Token("ok".into()))
        );
        assert_eq!(anthropic_chunk(r#"{"type":"ping"}"#), None);
        assert_eq!(
            anthropic_chunk(r#"{"type":"message_stop"}"#),
            Some(StreamChunk::Done { tokens_used: 0 })
        );
    }

    #[tokio::test]
    async fn test_collect_stream() {
        let ok: BoxedStream = Box::pin(tokio_stream::iter(vec![
            StreamChunk::Token("[".into()),
            StreamChunk::Token("]".into()),
            StreamChunk::Done { tokens_used: 2 },
            StreamChunk::Token("ignored".into()),
        ]));
        assert_eq!(collect_stream(ok).await.unwrap(), "[]");

        let failed: BoxedStream = Box::pin(tokio_stream::iter(vec![
            StreamChunk::Token("[".into()),
            StreamChunk::Error("API error 401".into()),
        ]));
        assert!(matches!(collect_stream(failed).await, Err(Error::Generation(_))));
    }
}
