/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported LLM providers:
 * - OpenAI and DeepSeek: chat completion API (shared wire protocol)
 * - Anthropic: messages API
 *
 * [`ProviderAdapter`] puts them behind one call returning plain text, with any
 * trailing "Notes:" section the model appended trimmed away.
 */

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, Credentials, ModelProvider, WireFormat};
use crate::errors::{ConfigurationError, ProviderError};

/// Common trait for all LLM providers
///
/// This trait defines the wire-level interface each client implements: a
/// typed request, a typed response, and how to pull the text out of it.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Object-safe text generation used by the adapter
///
/// Implemented by every concrete client (and by the mock provider) so that a
/// heterogeneous set of backends can live in one table.
#[async_trait]
pub trait CompletionBackend: Send + Sync + Debug {
    /// Send a single user prompt to `model` and return the raw reply text
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;
}

/// Trailing notes heading: `### Notes:`, `# Note:`, or a line opening with `**Notes:**` / `**Notes**:`.
///
/// A bare `Note :` line is translated content (French punctuation) and is kept.
static NOTES_SECTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(?:#{1,6}[ \t]*(?:\*\*|__)?[ \t]*notes?[ \t]*:|(?m:^)[ \t]*(?:\*\*|__)[ \t]*notes?[ \t]*(?:\*\*|__)?[ \t]*:).*\z")
        .unwrap()
});

/// Remove a trailing "Notes:" section and surrounding whitespace.
///
/// If nothing but the notes would remain, the trimmed input is returned
/// unchanged so a reply is never erased entirely.
pub fn strip_notes_section(text: &str) -> String {
    let stripped = NOTES_SECTION_REGEX.replace(text, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        text.trim().to_string()
    } else {
        stripped.to_string()
    }
}

/// One row of the static provider table
#[derive(Debug, Clone)]
struct RegisteredProvider {
    model: String,
    backend: Arc<dyn CompletionBackend>,
}

/// Uniform entry point over every configured provider
#[derive(Debug, Clone, Default)]
pub struct ProviderAdapter {
    providers: HashMap<ModelProvider, RegisteredProvider>,
}

impl ProviderAdapter {
    /// Create an adapter with no providers registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the provider table from configuration and credentials
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self, ConfigurationError> {
        let mut adapter = Self::new();

        for provider in ModelProvider::ALL {
            let api_key = credentials
                .api_key(provider)
                .ok_or_else(|| ConfigurationError::MissingCredentials(vec![provider.api_key_env().to_string()]))?;

            let (endpoint, timeout) = match config.get_provider_config(provider) {
                Some(pc) => (pc.effective_endpoint(), Duration::from_secs(pc.timeout_secs)),
                None => (provider.default_endpoint(), Duration::from_secs(60)),
            };

            let backend: Arc<dyn CompletionBackend> = match provider.wire_format() {
                WireFormat::ChatCompletion => Arc::new(openai::OpenAI::with_timeout(api_key, endpoint, timeout)),
                WireFormat::Messages => Arc::new(anthropic::Anthropic::with_timeout(api_key, endpoint, timeout)),
            };
            adapter = adapter.register(provider, backend);
        }

        Ok(adapter)
    }

    /// Register (or replace) the backend serving `provider` with its fixed model
    pub fn register(self, provider: ModelProvider, backend: Arc<dyn CompletionBackend>) -> Self {
        self.register_with_model(provider, provider.model_id(), backend)
    }

    /// Register a backend with an explicit model identifier
    pub fn register_with_model(
        mut self,
        provider: ModelProvider,
        model: impl Into<String>,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        self.providers.insert(
            provider,
            RegisteredProvider {
                model: model.into(),
                backend,
            },
        );
        self
    }

    /// Whether a backend is registered for `provider`
    pub fn is_configured(&self, provider: ModelProvider) -> bool {
        self.providers.contains_key(&provider)
    }

    /// Model identifier used for `provider`
    pub fn model_for(&self, provider: ModelProvider) -> Option<&str> {
        self.providers.get(&provider).map(|p| p.model.as_str())
    }

    /// Send `prompt` to `provider` and return the cleaned reply text
    pub async fn call(&self, provider: ModelProvider, prompt: &str) -> Result<String, ProviderError> {
        let registered = self
            .providers
            .get(&provider)
            .ok_or_else(|| ProviderError::RequestFailed(format!("Provider {} is not configured", provider)))?;

        let raw = registered.backend.generate(&registered.model, prompt).await?;
        debug!("{} ({}) raw reply: {} chars", provider, registered.model, raw.chars().count());
        Ok(strip_notes_section(&raw))
    }
}

pub mod anthropic;
pub mod mock;
pub mod openai;
