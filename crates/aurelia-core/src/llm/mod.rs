//! Access to the external generative-AI service.
//!
//! Provides a provider abstraction over the supported backends (Gemini,
//! Anthropic, OpenAI) and the factory that builds and memoizes the single
//! shared client.

pub(crate) mod anthropic;
pub(crate) mod factory;
pub(crate) mod gemini;
#[cfg(test)]
pub(crate) mod mock;
pub(crate) mod openai;
pub(crate) mod provider;

pub use factory::{build_provider, ClientFactory, ClientHandle};
pub use provider::{
    resolve_env_var, ImageInput, LlmProvider, LlmRequest, LlmResponse, Part, Turn,
};
