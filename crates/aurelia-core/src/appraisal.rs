//! One-shot image appraisal.
//!
//! Sends a single image plus a fixed appraiser instruction and returns the
//! model's report. Every failure is turned into a fixed sentence for the user.

use crate::fallback::{collapse, BusyFlag, Fallback, FallbackTexts};
use crate::llm::{ClientHandle, ImageInput, LlmRequest};

/// Instruction sent after the image on every appraisal.
pub const APPRAISAL_PROMPT: &str = "Act as an expert antique appraiser. Analyze this image. \
Identify the likely era, style, materials, and potential origin. \
Provide a rough estimated price range in USD. Format the response with clear headings.";

/// Replies used when no report can be produced.
pub const APPRAISAL_FALLBACKS: FallbackTexts = FallbackTexts {
    empty: "I could not generate an appraisal for this image.",
    failed: "Sorry, I encountered an error while analyzing the image. Please try again.",
    busy: "An appraisal is already underway. Please wait for it to finish.",
};

/// Issues appraisal requests against the shared client, one at a time.
pub struct Appraiser {
    client: ClientHandle,
    busy: BusyFlag,
}

impl Appraiser {
    pub fn new(client: ClientHandle) -> Self {
        Self {
            client,
            busy: BusyFlag::default(),
        }
    }

    /// Appraise a base64 image (no data-URL prefix) of the given MIME type.
    ///
    /// Always returns text: the report, or one of [`APPRAISAL_FALLBACKS`].
    pub async fn appraise(&self, image_base64: &str, media_type: &str) -> String {
        self.appraise_image(ImageInput::new(image_base64, media_type))
            .await
    }

    pub async fn appraise_image(&self, image: ImageInput) -> String {
        let outcome = self.try_appraise(image).await;
        collapse(outcome, &APPRAISAL_FALLBACKS, "Appraisal")
    }

    /// Whether an appraisal is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    async fn try_appraise(&self, image: ImageInput) -> Result<String, Fallback> {
        let _guard = self.busy.try_acquire().ok_or(Fallback::Busy)?;

        tracing::debug!(
            media_type = %image.media_type,
            bytes_b64 = image.data.len(),
            provider = self.client.name(),
            "Requesting appraisal"
        );
        let request = LlmRequest::image_prompt(image, APPRAISAL_PROMPT);
        let response = self.client.generate(&request).await?;
        tracing::info!(
            "Appraisal complete via {} in {}ms",
            response.model,
            response.latency_ms
        );
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockProvider;
    use crate::llm::Part;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    // 1x1 white JPEG, truncated to the header; enough to exercise plumbing.
    const TINY_JPEG_B64: &str = "/9j/4AAQSkZJRgABAQEASABIAAD/2wBDAP//////////";

    #[tokio::test]
    async fn test_appraise_returns_stub_text_verbatim() {
        let report = "## Era\nLate Victorian\n\n## Estimated Value\n$300 - $450";
        let provider = MockProvider::success(report);
        let requests = provider.requests_handle();
        let appraiser = Appraiser::new(Arc::new(provider));

        let result = appraiser.appraise(TINY_JPEG_B64, "image/jpeg").await;
        assert_eq!(result, report);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let parts = &requests[0].turns[0].parts;
        assert_eq!(
            parts[0],
            Part::Image(ImageInput::new(TINY_JPEG_B64, "image/jpeg"))
        );
        assert_eq!(parts[1], Part::Text(APPRAISAL_PROMPT.to_string()));
        assert!(requests[0].system_instruction.is_none());
    }

    #[tokio::test]
    async fn test_appraise_failure_returns_fallback() {
        let appraiser = Appraiser::new(Arc::new(MockProvider::failing(
            Some(429),
            "quota exceeded",
        )));
        let result = appraiser.appraise(TINY_JPEG_B64, "image/jpeg").await;
        assert_eq!(result, APPRAISAL_FALLBACKS.failed);
    }

    #[tokio::test]
    async fn test_appraise_empty_response_returns_fallback() {
        let appraiser = Appraiser::new(Arc::new(MockProvider::empty()));
        let result = appraiser.appraise(TINY_JPEG_B64, "image/jpeg").await;
        assert_eq!(result, APPRAISAL_FALLBACKS.empty);
    }

    #[tokio::test]
    async fn test_appraise_empty_payload_still_returns_text() {
        for provider in [
            MockProvider::failing(Some(400), "invalid image"),
            MockProvider::failing(None, "connection refused"),
            MockProvider::empty(),
        ] {
            let appraiser = Appraiser::new(Arc::new(provider));
            let result = appraiser.appraise("", "application/octet-stream").await;
            assert!(!result.is_empty());
        }
    }

    #[tokio::test]
    async fn test_each_call_is_a_single_request() {
        let provider = MockProvider::failing(Some(503), "unavailable");
        let calls = provider.call_count_handle();
        let appraiser = Appraiser::new(Arc::new(provider));

        appraiser.appraise(TINY_JPEG_B64, "image/jpeg").await;
        appraiser.appraise(TINY_JPEG_B64, "image/jpeg").await;
        // No retries: one request per appraisal
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_appraisal_is_rejected_while_busy() {
        let provider = MockProvider::success("report").with_delay(Duration::from_millis(200));
        let calls = provider.call_count_handle();
        let appraiser = Arc::new(Appraiser::new(Arc::new(provider)));

        let first = {
            let appraiser = appraiser.clone();
            tokio::spawn(async move { appraiser.appraise(TINY_JPEG_B64, "image/jpeg").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(appraiser.is_busy());

        let second = appraiser.appraise(TINY_JPEG_B64, "image/jpeg").await;
        assert_eq!(second, APPRAISAL_FALLBACKS.busy);

        assert_eq!(first.await.unwrap(), "report");
        assert!(!appraiser.is_busy());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
