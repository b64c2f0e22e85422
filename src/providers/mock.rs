/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds, echoing the text to translate
 * - `MockProvider::intermittent(n)` - Fails every n-th request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::with_reply(text)` - Always answers with a fixed reply
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{CompletionBackend, Provider};

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// Model identifier the adapter asked for
    pub model: String,
    /// The full rendered prompt
    pub prompt: String,
}

impl MockRequest {
    /// The quoted text at the end of a translation prompt, or the whole prompt
    pub fn quoted_text(&self) -> &str {
        match self.prompt.find(": '") {
            Some(start) if self.prompt.ends_with('\'') && self.prompt.len() > start + 3 => {
                &self.prompt[start + 3..self.prompt.len() - 1]
            }
            _ => &self.prompt,
        }
    }
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The reply text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[TRANSLATED] <text>`
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Always returns the given reply
    Fixed(String),
    /// Returns empty response
    Empty,
    /// Simulates slow response (for ordering tests)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Model named in the most recent request
    last_model: Arc<Mutex<Option<String>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            last_model: Arc::new(Mutex::new(None)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent {
            fail_every: fail_every.max(1),
        })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that always answers with `reply`
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fixed(reply.into()))
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that waits before answering like `working()`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator used by working mocks
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Model named in the most recent request
    pub fn last_model(&self) -> Option<String> {
        self.last_model.lock().ok().and_then(|guard| guard.clone())
    }

    fn working_reply(&self, request: &MockRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => format!("[TRANSLATED] {}", request.quoted_text()),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            request_count: Arc::clone(&self.request_count),
            last_model: Arc::clone(&self.last_model),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_model.lock() {
            *guard = Some(request.model.clone());
        }

        match &self.behavior {
            MockBehavior::Working => Ok(MockResponse {
                text: self.working_reply(&request),
            }),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(MockResponse {
                        text: self.working_reply(&request),
                    })
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Fixed(reply) => Ok(MockResponse { text: reply.clone() }),

            MockBehavior::Empty => Ok(MockResponse { text: String::new() }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Ok(MockResponse {
                    text: self.working_reply(&request),
                })
            }
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}

#[async_trait]
impl CompletionBackend for MockProvider {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let response = self
            .complete(MockRequest {
                model: model.to_string(),
                prompt: prompt.to_string(),
            })
            .await?;
        Ok(Self::extract_text(&response))
    }
}
