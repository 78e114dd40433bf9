//! Mock LLM backend for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use super::backend::*;

/// Mock backend for testing.
///
/// Scriptable responses and behavior for unit tests.
pub struct MockBackend {
    model_id: String,
    available: AtomicBool,
    /// Number of leading complete() calls that fail with RequestFailed
    remaining_failures: AtomicU32,
    /// Responses returned in order; the last one repeats once drained
    responses: Mutex<Vec<String>>,
    call_count: AtomicU32,
}

impl MockBackend {
    /// Create a new mock backend.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            available: AtomicBool::new(true),
            remaining_failures: AtomicU32::new(0),
            responses: Mutex::new(vec!["Mock response".to_string()]),
            call_count: AtomicU32::new(0),
        }
    }

    /// Set a single response content.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        *self.responses.lock().unwrap() = vec![content.into()];
        self
    }

    /// Set a sequence of responses, returned one per call.
    pub fn with_responses(self, contents: Vec<String>) -> Self {
        *self.responses.lock().unwrap() = contents;
        self
    }

    /// Make every complete() call fail with RequestFailed.
    pub fn with_failure(self) -> Self {
        self.remaining_failures.store(u32::MAX, Ordering::SeqCst);
        self
    }

    /// Make the first `n` complete() calls fail, then serve responses.
    pub fn with_failure_count(self, n: u32) -> Self {
        self.remaining_failures.store(n, Ordering::SeqCst);
        self
    }

    /// Set availability.
    pub fn with_available(self, available: bool) -> Self {
        self.available.store(available, Ordering::SeqCst);
        self
    }

    /// Get the number of times complete was called.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock-model")
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn id(&self) -> &str {
        &self.model_id
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if !self.available.load(Ordering::SeqCst) {
            return Err(LlmError::Unavailable("Mock backend disabled".to_string()));
        }

        if self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(LlmError::RequestFailed("Mock backend failure".to_string()));
        }

        let content = {
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses[0].clone()
            }
        };

        let prompt_tokens: u32 = request
            .messages
            .iter()
            .map(|m| m.content.len() as u32 / 4)
            .sum();

        let completion_tokens = content.len() as u32 / 4;

        Ok(CompletionResponse {
            content,
            finish_reason: FinishReason::Stop,
            usage: Usage {
                prompt_tokens,
                completion_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend() {
        let backend = MockBackend::new("test-model").with_response("Hello, world!");

        assert!(backend.is_available().await);
        assert_eq!(backend.call_count(), 0);

        let response = backend.complete(CompletionRequest::user("Hi")).await.unwrap();

        assert_eq!(response.content, "Hello, world!");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_response_sequence() {
        let backend = MockBackend::default()
            .with_responses(vec!["one".to_string(), "two".to_string()]);

        let first = backend.complete(CompletionRequest::user("a")).await.unwrap();
        let second = backend.complete(CompletionRequest::user("b")).await.unwrap();
        let third = backend.complete(CompletionRequest::user("c")).await.unwrap();

        assert_eq!(first.content, "one");
        assert_eq!(second.content, "two");
        assert_eq!(third.content, "two");
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let backend = MockBackend::default().with_failure();

        let result = backend.complete(CompletionRequest::user("Hi")).await;
        assert!(matches!(result, Err(LlmError::RequestFailed(_))));
    }
}
