/*!
 * Translation of one source text into many (provider, language) pairs.
 *
 * It is split into several submodules:
 *
 * - `placeholders`: masking of bracketed placeholders before translation
 * - `retry`: bounded retry with exponential backoff
 * - `prompts`: prompt templates for translation requests
 * - `orchestrator`: fan-out over providers and languages
 */

// Re-export main types for easier usage
pub use self::orchestrator::{TranslationBatch, TranslationOrchestrator, TranslationResult};
pub use self::placeholders::{PlaceholderSet, mask};
pub use self::prompts::PromptTemplate;
pub use self::retry::RetryPolicy;

// Submodules
pub mod orchestrator;
pub mod placeholders;
pub mod prompts;
pub mod retry;
