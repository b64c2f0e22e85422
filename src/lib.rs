/*!
 * # polytrans
 *
 * A Rust library for translating text with several LLM providers at once and
 * scoring the results.
 *
 * ## Features
 *
 * - Translate one text into several languages with several providers:
 *   - OpenAI API
 *   - DeepSeek API (OpenAI-compatible)
 *   - Anthropic API
 * - Keep bracketed placeholders such as `[country]` verbatim
 * - Bounded retry with exponential backoff around every provider call
 * - Score translation tables against a baseline translation (BLEU, METEOR,
 *   fluency, word matching)
 * - Extract the main text of a web page as translation input
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration and credentials
 * - `translation`: Placeholder masking, retry, prompts and the orchestrator
 * - `providers`: Client implementations for the LLM providers
 * - `evaluation`: Tokenization, metrics, baseline service and the engine
 * - `scraper`: Webpage text extraction
 * - `file_utils`: CSV tables and file system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Supported target languages
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod evaluation;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod scraper;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, Credentials, ModelProvider};
pub use errors::{AppError, ConfigurationError, ProviderError, TranslationError, ValidationError};
pub use evaluation::{EvaluationEngine, EvaluationReport};
pub use file_utils::DataTable;
pub use language_utils::SupportedLanguage;
pub use providers::ProviderAdapter;
pub use translation::{TranslationBatch, TranslationOrchestrator};
