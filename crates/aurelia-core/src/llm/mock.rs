//! Scripted provider shared by the appraisal and curator tests.

use super::provider::{LlmProvider, LlmRequest, LlmResponse};
use crate::error::LlmError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A configurable mock LLM provider.
///
/// Each call to `generate()` invokes the response factory with the current
/// call index and records the request it was given.
pub(crate) struct MockProvider {
    response_fn: Box<dyn Fn(u32) -> Result<String, LlmError> + Send + Sync>,
    call_count: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<LlmRequest>>>,
    delay: Option<Duration>,
}

impl MockProvider {
    pub(crate) fn from_fn<F>(f: F) -> Self
    where
        F: Fn(u32) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            response_fn: Box::new(f),
            call_count: Arc::new(AtomicU32::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub(crate) fn success(text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(move |_| Ok(text.clone()))
    }

    /// Replies "reply N" for the N-th call (starting at 1).
    pub(crate) fn numbered() -> Self {
        Self::from_fn(|idx| Ok(format!("reply {}", idx + 1)))
    }

    pub(crate) fn failing(status_code: Option<u16>, message: &str) -> Self {
        let message = message.to_string();
        Self::from_fn(move |_| {
            Err(LlmError::Request {
                message: message.clone(),
                status_code,
            })
        })
    }

    pub(crate) fn empty() -> Self {
        Self::from_fn(|_| Err(LlmError::EmptyResponse { provider: "mock" }))
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared handle to the call counter (clone before moving the provider).
    pub(crate) fn call_count_handle(&self) -> Arc<AtomicU32> {
        self.call_count.clone()
    }

    /// Shared handle to every request received so far.
    pub(crate) fn requests_handle(&self) -> Arc<Mutex<Vec<LlmRequest>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.response_fn)(idx).map(|text| LlmResponse {
            text,
            model: "mock-v1".to_string(),
            tokens_used: Some(42),
            latency_ms: 10,
        })
    }
}
