//! OpenAI LLM provider using the Chat Completions API.
//!
//! The system instruction becomes a leading `system` message; images are sent
//! as data URLs inside the user message content array.

use super::provider::{
    http_error, require_text, LlmProvider, LlmRequest, LlmResponse, Part, Turn,
};
use crate::error::LlmError;
use crate::types::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// OpenAI provider using the Chat Completions API.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiProvider {
    /// Create against a Chat Completions URL (OpenAI or a compatible gateway).
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    fn build_body(&self, request: &LlmRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.turns.len() + 1);
        if let Some(ref system) = request.system_instruction {
            messages.push(ChatMessage {
                role: "system",
                content: vec![ChatContent::Text {
                    text: system.clone(),
                }],
            });
        }
        messages.extend(request.turns.iter().map(to_message));

        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

fn to_message(turn: &Turn) -> ChatMessage {
    ChatMessage {
        role: match turn.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        },
        content: turn
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => ChatContent::Text { text: text.clone() },
                Part::Image(image) => ChatContent::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_url(),
                    },
                },
            })
            .collect(),
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();
        let body = self.build_body(request);

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::request(format!("OpenAI request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(http_error("OpenAI", resp).await);
        }

        let chat_resp: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::request(format!("Failed to parse OpenAI response: {e}")))?;

        let text = chat_resp
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        let text = require_text(text, "OpenAI")?;

        Ok(LlmResponse {
            text,
            model: chat_resp.model,
            tokens_used: chat_resp.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::ImageInput;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new("https://api.openai.com/v1/chat/completions", "key", "gpt-test")
    }

    #[test]
    fn test_body_leads_with_system_message() {
        let request = LlmRequest::chat("You are Aurelius.", &[], "Tell me about the clock.");
        let json = serde_json::to_value(provider().build_body(&request)).unwrap();

        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"][0]["text"], "You are Aurelius.");
        assert_eq!(messages[1]["role"], "user");
    }

    #[test]
    fn test_body_sends_image_as_data_url() {
        let request =
            LlmRequest::image_prompt(ImageInput::new("AAAA", "image/webp"), "Appraise this.");
        let json = serde_json::to_value(provider().build_body(&request)).unwrap();

        let content = &json["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image_url");
        assert_eq!(content[0]["image_url"]["url"], "data:image/webp;base64,AAAA");
        assert_eq!(content[1]["type"], "text");
    }
}
