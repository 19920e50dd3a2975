//! Ollama chat client.
//!
//! Calls `/api/chat` with streaming on and assembles the newline-delimited
//! JSON chunks into one string before returning.

use async_trait::async_trait;
use serde::Deserialize;

use courier_core::config::LlmConfig;

use crate::error::LlmError;
use crate::llm::LanguageModelClient;

/// One line of a streamed `/api/chat` response.
#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChatMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

/// Accumulates streamed bytes and extracts message content line by line.
#[derive(Debug, Default)]
pub(crate) struct ChunkAssembler {
    pending: Vec<u8>,
    text: String,
    done: bool,
}

impl ChunkAssembler {
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Result<(), LlmError> {
        self.pending.extend_from_slice(bytes);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.line(&line)?;
        }
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<String, LlmError> {
        let rest = std::mem::take(&mut self.pending);
        self.line(&rest)?;
        if !self.done {
            tracing::debug!("Stream ended without a done marker");
        }
        Ok(self.text)
    }

    fn line(&mut self, raw: &[u8]) -> Result<(), LlmError> {
        let line = std::str::from_utf8(raw)
            .map_err(|e| LlmError::InvalidResponse(format!("chunk is not UTF-8: {}", e)))?
            .trim();
        if line.is_empty() {
            return Ok(());
        }
        let chunk: ChatChunk = serde_json::from_str(line)
            .map_err(|e| LlmError::InvalidResponse(format!("undecodable chunk: {}", e)))?;
        if let Some(error) = chunk.error {
            return Err(LlmError::Provider {
                status: 200,
                message: error,
            });
        }
        if let Some(message) = chunk.message {
            self.text.push_str(&message.content);
        }
        self.done |= chunk.done;
        Ok(())
    }
}

/// [`LanguageModelClient`] backed by an Ollama server.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    system_prompt: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Http(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": self.system_prompt},
                {"role": "user", "content": prompt},
            ],
            "stream": true,
            "options": {"temperature": self.temperature},
        })
    }
}

#[async_trait]
impl LanguageModelClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let mut response = self
            .http
            .post(self.endpoint())
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Auth(format!("HTTP {}: {}", status.as_u16(), body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider {
                status: status.as_u16(),
                message: body,
            });
        }

        let mut assembler = ChunkAssembler::default();
        while let Some(bytes) = response.chunk().await? {
            assembler.push(&bytes)?;
        }
        let text = assembler.finish()?;
        tracing::debug!(model = %self.model, chars = text.len(), "Model response assembled");
        Ok(text)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LlmConfig {
        LlmConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let client = OllamaClient::new(&config()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:11434/api/chat");
        assert_eq!(client.name(), "ollama");
    }

    #[test]
    fn test_request_body() {
        let client = OllamaClient::new(&config()).unwrap();
        let body = client.request_body("list photos");
        assert_eq!(body["model"], "llama3.1");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(
            body["messages"][0]["content"],
            "You are a command parser. Output valid JSON."
        );
        assert_eq!(body["messages"][1]["content"], "list photos");
    }

    #[test]
    fn test_assembler_joins_chunks() {
        let mut a = ChunkAssembler::default();
        a.push(b"{\"message\":{\"role\":\"assistant\",\"content\":\"{\\\"operation\\\"\"},\"done\":false}\n")
            .unwrap();
        a.push(b"{\"message\":{\"role\":\"assistant\",\"content\":\":\\\"list_photos\\\"}\"},\"done\":false}\n")
            .unwrap();
        a.push(b"{\"done\":true}\n").unwrap();
        assert_eq!(a.finish().unwrap(), r#"{"operation":"list_photos"}"#);
    }

    #[test]
    fn test_assembler_handles_split_lines() {
        let line = b"{\"message\":{\"content\":\"hello\"},\"done\":true}";
        let mut a = ChunkAssembler::default();
        a.push(&line[..10]).unwrap();
        a.push(&line[10..]).unwrap();
        // no trailing newline: finish flushes the remainder
        assert_eq!(a.finish().unwrap(), "hello");
    }

    #[test]
    fn test_assembler_empty_stream() {
        let a = ChunkAssembler::default();
        assert_eq!(a.finish().unwrap(), "");
    }

    #[test]
    fn test_assembler_bad_chunk() {
        let mut a = ChunkAssembler::default();
        let err = a.push(b"not json\n").unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn test_assembler_reported_error() {
        let mut a = ChunkAssembler::default();
        let err = a.push(b"{\"error\":\"model 'x' not found\"}\n").unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
    }
}
