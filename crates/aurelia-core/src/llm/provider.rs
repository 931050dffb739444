//! LLM provider trait and provider-neutral request/response types.
//!
//! A request is an optional system instruction plus an ordered list of turns.
//! Each turn carries text and/or inline base64 images. Providers translate
//! this into their own wire format.

use crate::error::LlmError;
use crate::types::Role;
use async_trait::async_trait;
use base64::Engine;
use std::path::Path;

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    /// Base64-encoded image bytes, without any data-URL prefix
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    pub fn new(data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The format is the image format identifier (e.g., "jpeg", "png", "webp").
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type_for(format).to_string(),
        }
    }

    /// Read an image file, inferring the format from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        Ok(Self::from_bytes(&bytes, &format))
    }

    /// Split a `data:<mime>;base64,<payload>` URL into media type and payload.
    ///
    /// Returns `None` if the string is not a base64 data URL.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let media_type = header.strip_suffix(";base64")?;
        Some(Self::new(payload, media_type))
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

fn media_type_for(format: &str) -> &'static str {
    match format {
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        other => {
            tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
            "image/jpeg"
        }
    }
}

/// One piece of a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    Image(ImageInput),
}

/// A single conversational turn sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts (images are skipped).
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// A provider-neutral generation request.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Persona or standing instructions, if any
    pub system_instruction: Option<String>,
    /// Conversation so far, oldest first, ending with the new user turn
    pub turns: Vec<Turn>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmRequest {
    /// A single-turn request: the image first, then the instruction.
    pub fn image_prompt(image: ImageInput, prompt: &str) -> Self {
        Self {
            system_instruction: None,
            turns: vec![Turn {
                role: Role::User,
                parts: vec![Part::Image(image), Part::Text(prompt.to_string())],
            }],
            max_tokens: 1024,
            temperature: 0.4,
        }
    }

    /// A chat request: the bound instruction, prior history, and the new message.
    pub fn chat(system_instruction: &str, history: &[Turn], message: &str) -> Self {
        let mut turns = history.to_vec();
        turns.push(Turn::user_text(message));
        Self {
            system_instruction: Some(system_instruction.to_string()),
            turns,
            max_tokens: 512,
            temperature: 0.7,
        }
    }
}

/// The response from a generation call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn LlmProvider>` for the shared client handle).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini", "anthropic").
    fn name(&self) -> &str;

    /// Check whether the provider is configured.
    async fn is_available(&self) -> bool;

    /// Generate text for the given request.
    ///
    /// Implementations return [`LlmError::EmptyResponse`] when the service
    /// answers without any text.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Pass model text through untouched unless the service returned nothing at all.
pub(crate) fn require_text(text: String, provider: &'static str) -> Result<String, LlmError> {
    if text.is_empty() {
        return Err(LlmError::EmptyResponse { provider });
    }
    Ok(text)
}

/// Map a non-success HTTP response into an [`LlmError`].
pub(crate) async fn http_error(provider: &str, resp: reqwest::Response) -> LlmError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    LlmError::Request {
        message: format!("{provider} HTTP {status}: {text}"),
        status_code: Some(status.as_u16()),
    }
}
