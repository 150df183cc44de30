//! Completion backend trait and test double.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text-completion providers.
///
/// One prompt in, one completion out. Callers own prompt construction and
/// response shaping; implementations own transport.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete a prompt, bounded by `max_tokens`.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;

    /// Name of this backend, for logging.
    fn name(&self) -> &str;
}

/// A backend that can be shared across handlers.
pub type SharedBackend = Arc<dyn CompletionBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

/// One recorded call to a [`MockBackend`].
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPrompt {
    pub prompt: String,
    pub max_tokens: u32,
}

/// Canned-response backend for tests.
///
/// Responses are returned in order; every prompt that reaches the backend is
/// recorded for assertion.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct MockBackend {
    responses: std::sync::Mutex<Vec<String>>,
    request_log: std::sync::Mutex<Vec<RecordedPrompt>>,
}

#[cfg(any(test, feature = "testing"))]
impl MockBackend {
    /// Create a mock that serves the given responses in order.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            request_log: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create a mock with a single response.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(vec![text.into()])
    }

    /// All prompts that were sent to this backend.
    pub fn requests(&self) -> Vec<RecordedPrompt> {
        self.request_log.lock().unwrap().clone()
    }

    /// Number of prompts sent so far.
    pub fn request_count(&self) -> usize {
        self.request_log.lock().unwrap().len()
    }
}

#[cfg(any(test, feature = "testing"))]
#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        self.request_log.lock().unwrap().push(RecordedPrompt {
            prompt: prompt.to_string(),
            max_tokens,
        });

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(crate::error::LlmError::Backend(
                "MockBackend: no more responses available".to_string(),
            ));
        }
        Ok(responses.remove(0))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
