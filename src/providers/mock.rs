/*!
 * Mock provider for testing.
 *
 * The mock simulates a remote service without any network access:
 * - `MockProvider::working()` - Always succeeds with a tagged copy of the document
 * - `MockProvider::failing_on(n)` - Fails only the n-th request (1-based)
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::empty()` - Answers with no text
 *
 * Clones share the request counter and the request log, so a test can keep
 * one handle and pass the other to the code under test.
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Mock request for testing
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    /// The document to translate
    pub content: String,
    /// System instructions sent along
    pub instructions: String,
    /// Model identifier
    pub model: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The translated text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a translation
    Working,
    /// Fails the request with this 1-based number, succeeds otherwise
    FailOn { request: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty response
    Empty,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that fails only the given request
    pub fn failing_on(request: usize) -> Self {
        Self::new(MockBehavior::FailOn { request })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of the requests received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// The text a working mock produces for `content`
    pub fn translated(content: &str) -> String {
        format!("[TRANSLATED] {}", content)
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let number = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match self.behavior {
            MockBehavior::Working => Ok(MockResponse {
                text: Self::translated(&request.content),
            }),

            MockBehavior::FailOn { request: failing } if failing == number => Err(ProviderError::ApiError {
                message: format!("Simulated failure (request #{})", number),
                status_code: 503,
            }),

            MockBehavior::FailOn { .. } => Ok(MockResponse {
                text: Self::translated(&request.content),
            }),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(MockResponse { text: String::new() }),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}
