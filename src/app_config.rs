use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::ConfigurationError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. API keys are never part of
/// the file: they come from the environment through [`Credentials`].
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Provider endpoints and timeouts
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,

    /// Retry policy for provider calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Baseline translation service settings
    #[serde(default)]
    pub baseline: BaselineConfig,

    /// Webpage extraction settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Number of (provider, language) pairs translated at once; 1 is sequential
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Optional file receiving a copy of every log line
    #[serde(default = "default_log_file")]
    pub log_file: Option<String>,
}

/// Wire protocol spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// `POST /chat/completions` with a `choices` array
    ChatCompletion,
    /// `POST /v1/messages` with `content` blocks
    Messages,
}

/// Large-language-model providers and their fixed model identifiers
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    // @provider: OpenAI
    OpenAI,
    // @provider: DeepSeek (OpenAI-compatible)
    DeepSeek,
    // @provider: Anthropic
    Anthropic,
}

impl ModelProvider {
    /// All providers in display order
    pub const ALL: [ModelProvider; 3] = [Self::OpenAI, Self::DeepSeek, Self::Anthropic];

    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::DeepSeek => "DeepSeek",
            Self::Anthropic => "Anthropic",
        }
    }

    /// The single model each provider is pinned to
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4o",
            Self::DeepSeek => "deepseek-reasoner",
            Self::Anthropic => "claude-3-5-sonnet-20240620",
        }
    }

    pub fn wire_format(&self) -> WireFormat {
        match self {
            Self::OpenAI | Self::DeepSeek => WireFormat::ChatCompletion,
            Self::Anthropic => WireFormat::Messages,
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::DeepSeek => "DEEPSEEK_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_endpoint(&self) -> String {
        match self {
            Self::OpenAI => default_openai_endpoint(),
            Self::DeepSeek => default_deepseek_endpoint(),
            Self::Anthropic => default_anthropic_endpoint(),
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ModelProvider {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "deepseek" => Ok(Self::DeepSeek),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(ConfigurationError::UnknownProvider(s.to_string())),
        }
    }
}

/// Per-provider connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider identifier
    #[serde(rename = "type")]
    pub provider: ModelProvider,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider: ModelProvider) -> Self {
        Self {
            provider,
            endpoint: provider.default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Endpoint to use, falling back to the provider default when unset
    pub fn effective_endpoint(&self) -> String {
        if self.endpoint.is_empty() {
            self.provider.default_endpoint()
        } else {
            self.endpoint.clone()
        }
    }
}

/// Retry settings for provider calls
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Total number of attempts per provider call
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base delay in milliseconds; attempt k waits base * 2^k
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Baseline translation service settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BaselineConfig {
    /// Service endpoint URL
    #[serde(default = "default_baseline_endpoint")]
    pub endpoint: String,

    /// Language of the reference texts
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_baseline_endpoint(),
            source_language: default_source_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Webpage extraction settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScraperConfig {
    /// Page load timeout in seconds
    #[serde(default = "default_page_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent by the browser-profile fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_page_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_providers() -> Vec<ProviderConfig> {
    ModelProvider::ALL.iter().map(|p| ProviderConfig::new(*p)).collect()
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_page_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    5000 // 5 second base, doubled on each retry
}

fn default_log_file() -> Option<String> {
    Some("translation_debug.log".to_string())
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_deepseek_endpoint() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_baseline_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

impl Config {
    /// Load the configuration file, creating it with defaults when absent
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        if self.retry.retry_count == 0 {
            return Err(ConfigurationError::Invalid("retry_count must be at least 1".to_string()));
        }
        if self.concurrent_requests == 0 {
            return Err(ConfigurationError::Invalid("concurrent_requests must be at least 1".to_string()));
        }
        for provider in &self.providers {
            let endpoint = provider.effective_endpoint();
            url::Url::parse(&endpoint).map_err(|e| {
                ConfigurationError::Invalid(format!("Invalid endpoint for {}: {} ({})", provider.provider, endpoint, e))
            })?;
        }
        url::Url::parse(&self.baseline.endpoint).map_err(|e| {
            ConfigurationError::Invalid(format!("Invalid baseline endpoint: {} ({})", self.baseline.endpoint, e))
        })?;
        if crate::language_utils::get_language_name(&self.baseline.source_language).is_err() {
            return Err(ConfigurationError::Invalid(format!(
                "Invalid baseline source language: {}",
                self.baseline.source_language
            )));
        }
        Ok(())
    }

    /// Get the configuration of a specific provider
    pub fn get_provider_config(&self, provider: ModelProvider) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.provider == provider)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            providers: default_providers(),
            retry: RetryConfig::default(),
            baseline: BaselineConfig::default(),
            scraper: ScraperConfig::default(),
            concurrent_requests: default_concurrent_requests(),
            log_level: LogLevel::default(),
            log_file: default_log_file(),
        }
    }
}

/// API keys for every provider, read once at startup
#[derive(Clone, Default)]
pub struct Credentials {
    keys: Vec<(ModelProvider, String)>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers: Vec<_> = self.keys.iter().map(|(p, _)| p.display_name()).collect();
        f.debug_struct("Credentials").field("providers", &providers).finish()
    }
}

impl Credentials {
    /// Read every provider key from the environment; all three are required
    pub fn from_env() -> std::result::Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build credentials from an arbitrary lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut keys = Vec::new();
        let mut missing = Vec::new();

        for provider in ModelProvider::ALL {
            match lookup(provider.api_key_env()) {
                Some(key) if !key.trim().is_empty() => keys.push((provider, key)),
                _ => missing.push(provider.api_key_env().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ConfigurationError::MissingCredentials(missing));
        }
        Ok(Self { keys })
    }

    /// API key for a provider, if present
    pub fn api_key(&self, provider: ModelProvider) -> Option<&str> {
        self.keys.iter().find(|(p, _)| *p == provider).map(|(_, k)| k.as_str())
    }
}
