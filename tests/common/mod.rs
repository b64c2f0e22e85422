/*!
 * Common test utilities for the polytrans test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use polytrans::app_config::{Config, Credentials, ModelProvider, ProviderConfig};
use polytrans::errors::BaselineError;
use polytrans::evaluation::BaselineTranslator;
use polytrans::providers::ProviderAdapter;
use polytrans::providers::mock::MockProvider;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Default configuration with a 1 ms retry base so failure paths stay fast
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.retry.retry_backoff_ms = 1;
    config.log_file = None;
    config
}

/// Configuration pointing every provider at `endpoint`
pub fn config_with_endpoint(endpoint: &str) -> Config {
    let mut config = fast_config();
    config.providers = ModelProvider::ALL
        .iter()
        .map(|p| {
            let mut pc = ProviderConfig::new(*p);
            pc.endpoint = endpoint.to_string();
            pc.timeout_secs = 5;
            pc
        })
        .collect();
    config
}

/// Credentials with a fake key for every provider
pub fn test_credentials() -> Credentials {
    Credentials::from_lookup(|name| Some(format!("test-{}", name.to_lowercase()))).unwrap()
}

/// Adapter serving `provider` with the given mock
pub fn adapter_with(provider: ModelProvider, mock: MockProvider) -> ProviderAdapter {
    ProviderAdapter::new().register(provider, Arc::new(mock))
}

/// Baseline translator answering from a fixed table, counting calls
#[derive(Debug, Default)]
pub struct MockBaseline {
    /// (text, target code) -> translation
    translations: HashMap<(String, String), String>,
    /// Target codes that always fail
    failing_codes: Vec<String>,
    calls: AtomicUsize,
}

impl MockBaseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `translation` for `text` into `code`
    pub fn with(mut self, text: &str, code: &str, translation: &str) -> Self {
        self.translations
            .insert((text.to_string(), code.to_string()), translation.to_string());
        self
    }

    /// Fail every request into `code`
    pub fn failing_for(mut self, code: &str) -> Self {
        self.failing_codes.push(code.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaselineTranslator for MockBaseline {
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, BaselineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_codes.iter().any(|c| c == target_code) {
            return Err(BaselineError::ApiError {
                status_code: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self
            .translations
            .get(&(text.to_string(), target_code.to_string()))
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target_code, text)))
    }
}
