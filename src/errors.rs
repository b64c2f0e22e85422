/*!
 * Error types for the polytrans application.
 *
 * This module contains custom error types for the different parts of the
 * translate-and-score pipeline, using the thiserror crate for ergonomic
 * error definitions. Each enum maps to one unit of work so that a failure
 * can be recorded for that unit without aborting its siblings.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered but returned no text
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Classify a non-success HTTP status into a provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Classify a reqwest transport error
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Terminal error of the retry wrapper once every attempt has failed
#[derive(Error, Debug)]
#[error("{operation} failed after {attempts} attempts: {last_error}")]
pub struct RetryExhausted<E: std::error::Error + 'static> {
    /// Name of the operation that was retried
    pub operation: String,
    /// Number of attempts made (equals the policy's maximum)
    pub attempts: u32,
    /// Error returned by the final attempt
    #[source]
    pub last_error: E,
}

/// Configuration problems: unknown providers, missing credentials, bad files
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A provider name that is not part of the static provider table
    #[error("Invalid model name {0}")]
    UnknownProvider(String),

    /// A known provider that has no backend registered
    #[error("Provider {0} is not configured")]
    ProviderNotConfigured(String),

    /// One or more required API keys are absent
    #[error("Missing API keys: {}. Please check your .env file.", .0.join(", "))]
    MissingCredentials(Vec<String>),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur while translating one (provider, language) pair
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The pair could not be dispatched at all
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// The provider kept failing until the retry budget ran out
    #[error("{0}")]
    Provider(#[from] RetryExhausted<ProviderError>),
}

/// A translation column label that does not follow `{model} - {language}`
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid column name format: {label}")]
pub struct ParseError {
    /// The offending column label
    pub label: String,
}

/// Schema problems in an evaluation import; fatal for the whole run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The table has no header row
    #[error("The uploaded table is empty")]
    EmptyTable,

    /// The first column is not one of the accepted reference names
    #[error("The first column should be 'Original Text' or 'English', found '{0}'")]
    InvalidReferenceColumn(String),
}

/// Errors from the baseline translation service
#[derive(Error, Debug)]
pub enum BaselineError {
    /// Request could not be sent or timed out
    #[error("Baseline request failed: {0}")]
    RequestFailed(String),

    /// Service answered with a non-success status
    #[error("Baseline service responded with {status_code}: {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Body returned by the service
        message: String,
    },

    /// Service answered with an unexpected payload
    #[error("Failed to parse baseline response: {0}")]
    ParseError(String),
}

/// Tokenization failure for one evaluation column
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Tokenization failed: {0}")]
pub struct TokenizationError(pub String);

/// Failure of a single metric computation
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{metric} computation failed: {reason}")]
pub struct MetricError {
    /// Metric name (BLEU, METEOR, ...)
    pub metric: &'static str,
    /// Why the metric could not be computed
    pub reason: String,
}

/// Errors from the webpage text extraction collaborator
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// URL could not be parsed or uses an unsupported scheme
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request failed before a response was received
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Server answered with a non-200 status
    #[error("HTTP {0}")]
    Http(u16),

    /// The page is an anti-bot challenge rather than content
    #[error("Verification challenge detected")]
    Challenge,

    /// Extraction produced no text
    #[error("No content found.")]
    NoContent,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error reading or writing CSV data
    #[error("CSV error: {0}")]
    Csv(String),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error validating an evaluation import
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error scraping a webpage
    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        Self::Csv(error.to_string())
    }
}
