//! Google Gemini provider using the `generateContent` REST endpoint.
//!
//! Images travel as `inlineData` parts; the persona goes in `systemInstruction`.
//! Gemini names the assistant role `model`.

use super::provider::{
    http_error, require_text, LlmProvider, LlmRequest, LlmResponse, Part, Turn,
};
use crate::error::LlmError;
use crate::types::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Gemini provider.
pub struct GeminiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

// --- Request types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

fn to_content(turn: &Turn) -> Content {
    Content {
        role: Some(wire_role(turn.role).to_string()),
        parts: turn
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => WirePart {
                    text: Some(text.clone()),
                    ..WirePart::default()
                },
                Part::Image(image) => WirePart {
                    inline_data: Some(InlineData {
                        mime_type: image.media_type.clone(),
                        data: image.data.clone(),
                    }),
                    ..WirePart::default()
                },
            })
            .collect(),
    }
}

fn build_body(request: &LlmRequest) -> GenerateRequest {
    GenerateRequest {
        contents: request.turns.iter().map(to_content).collect(),
        system_instruction: request.system_instruction.as_ref().map(|text| Content {
            role: None,
            parts: vec![WirePart {
                text: Some(text.clone()),
                ..WirePart::default()
            }],
        }),
        generation_config: GenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: request.temperature,
        },
    }
}

/// Join the text parts of the first candidate.
fn extract_text(resp: &GenerateResponse) -> String {
    resp.candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();
        let body = build_body(request);

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::request(format!("Gemini request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(http_error("Gemini", resp).await);
        }

        let gen_resp: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::request(format!("Failed to parse Gemini response: {e}")))?;

        let text = require_text(extract_text(&gen_resp), "Gemini")?;

        Ok(LlmResponse {
            text,
            model: gen_resp.model_version.unwrap_or_else(|| self.model.clone()),
            tokens_used: gen_resp.usage_metadata.and_then(|u| u.total_token_count),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::ImageInput;

    #[test]
    fn test_url_includes_model() {
        let provider = GeminiProvider::new(
            "https://generativelanguage.googleapis.com/v1beta/",
            "key",
            "gemini-2.5-flash",
        );
        assert_eq!(
            provider.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_image_body_uses_inline_data() {
        let request =
            LlmRequest::image_prompt(ImageInput::new("AAAA", "image/png"), "Appraise this.");
        let json = serde_json::to_value(build_body(&request)).unwrap();

        assert!(json.get("systemInstruction").is_none());
        let parts = &json["contents"][0]["parts"];
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert_eq!(parts[1]["text"], "Appraise this.");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn test_chat_body_maps_assistant_to_model() {
        let history = vec![Turn::user_text("Hello"), Turn::assistant_text("Greetings.")];
        let request = LlmRequest::chat("You are Aurelius.", &history, "Is it signed?");
        let json = serde_json::to_value(build_body(&request)).unwrap();

        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "You are Aurelius."
        );
        assert!(json["systemInstruction"].get("role").is_none());
        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "Is it signed?");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let resp: GenerateResponse = serde_json::from_str(
            r###"{
                "candidates": [{"content": {"role": "model", "parts": [{"text": "## Era\n"}, {"text": "1880s"}]}}],
                "usageMetadata": {"totalTokenCount": 57},
                "modelVersion": "gemini-2.5-flash"
            }"###,
        )
        .unwrap();
        assert_eq!(extract_text(&resp), "## Era\n1880s");
        assert_eq!(resp.usage_metadata.unwrap().total_token_count, Some(57));
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let resp: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(extract_text(&resp), "");
    }
}
