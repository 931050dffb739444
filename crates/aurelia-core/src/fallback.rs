//! The "always answer with text" policy.
//!
//! Appraisal and curator calls compute a `Result<String, Fallback>` internally
//! and collapse it to a `String` at their public boundary.

use crate::error::LlmError;
use std::sync::atomic::{AtomicBool, Ordering};

/// Fixed replies for one feature.
#[derive(Debug, Clone, Copy)]
pub struct FallbackTexts {
    /// The service answered with no text
    pub empty: &'static str,
    /// The call failed
    pub failed: &'static str,
    /// A previous request on the same interaction is still pending
    pub busy: &'static str,
}

/// Why a call produced no usable answer.
#[derive(Debug)]
pub enum Fallback {
    Busy,
    Empty,
    Failed(LlmError),
}

impl From<LlmError> for Fallback {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyResponse { .. } => Fallback::Empty,
            other => Fallback::Failed(other),
        }
    }
}

impl Fallback {
    pub fn text(&self, texts: &FallbackTexts) -> &'static str {
        match self {
            Fallback::Busy => texts.busy,
            Fallback::Empty => texts.empty,
            Fallback::Failed(_) => texts.failed,
        }
    }
}

/// Collapse an outcome into display text, logging whatever went wrong.
pub(crate) fn collapse(
    outcome: Result<String, Fallback>,
    texts: &FallbackTexts,
    what: &str,
) -> String {
    match outcome {
        Ok(text) => text,
        Err(fallback) => {
            match &fallback {
                Fallback::Busy => tracing::debug!("{what} skipped: request already in flight"),
                Fallback::Empty => tracing::warn!("{what} returned no text"),
                Fallback::Failed(e) => tracing::warn!("{what} failed: {e}"),
            }
            fallback.text(texts).to_string()
        }
    }
}

/// One-request-at-a-time flag for an appraiser or a curator session.
#[derive(Debug, Default)]
pub(crate) struct BusyFlag(AtomicBool);

impl BusyFlag {
    /// Claim the flag, or `None` if a request is already in flight.
    pub(crate) fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(&self.0))
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Clears the flag on drop, including when the request future is dropped.
pub(crate) struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
