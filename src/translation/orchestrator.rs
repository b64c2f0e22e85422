/*!
 * Translation orchestrator.
 *
 * Fans one source text out to every requested (provider, language) pair,
 * masking placeholders before each call and restoring them afterwards. A
 * failing pair produces an error-valued result for that pair only.
 */

use futures::stream::{self, StreamExt};
use log::{error, info};

use crate::app_config::{Config, ModelProvider};
use crate::errors::{ConfigurationError, TranslationError};
use crate::file_utils::DataTable;
use crate::language_utils::SupportedLanguage;
use crate::providers::ProviderAdapter;

use super::placeholders::mask;
use super::prompts::PromptTemplate;
use super::retry::RetryPolicy;

/// Header of the source text column in translation tables
pub const ORIGINAL_TEXT_HEADER: &str = "Original Text";

/// Outcome of one (provider, language) pair
#[derive(Debug)]
pub struct TranslationResult {
    /// Provider display name, or the raw name when it was not recognised
    pub provider_label: String,
    /// Target language
    pub language: SupportedLanguage,
    /// Restored translation or the reason the pair failed
    pub outcome: Result<String, TranslationError>,
}

impl TranslationResult {
    /// Column label `"{Provider} - {Language}"`
    pub fn key(&self) -> String {
        format!("{} - {}", self.provider_label, self.language.display_name())
    }

    /// Table cell: the translation, or `Error: <description>`
    pub fn cell(&self) -> String {
        match &self.outcome {
            Ok(text) => text.clone(),
            Err(e) => format!("Error: {}", e),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// All results of one orchestration call, in iteration order
#[derive(Debug)]
pub struct TranslationBatch {
    /// The unmasked source text
    pub source_text: String,
    /// One result per (provider, language) pair, provider-major
    pub results: Vec<TranslationResult>,
}

impl TranslationBatch {
    /// Look up a result by its `"{Provider} - {Language}"` key
    pub fn get(&self, key: &str) -> Option<&TranslationResult> {
        self.results.iter().find(|r| r.key() == key)
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    /// Render as a one-row table: `Original Text` followed by one column per pair
    pub fn to_table(&self) -> DataTable {
        let mut headers = Vec::with_capacity(self.results.len() + 1);
        let mut row = Vec::with_capacity(self.results.len() + 1);

        headers.push(ORIGINAL_TEXT_HEADER.to_string());
        row.push(self.source_text.clone());

        for result in &self.results {
            headers.push(result.key());
            row.push(result.cell());
        }

        DataTable::new(headers, vec![row])
    }
}

/// Drives translation of one text into many (provider, language) pairs
#[derive(Debug, Clone)]
pub struct TranslationOrchestrator {
    adapter: ProviderAdapter,
    retry: RetryPolicy,
    template: PromptTemplate,
    /// Number of pairs in flight at once
    concurrency: usize,
}

impl TranslationOrchestrator {
    /// Create a sequential orchestrator with the default prompt
    pub fn new(adapter: ProviderAdapter, retry: RetryPolicy) -> Self {
        Self {
            adapter,
            retry,
            template: PromptTemplate::default(),
            concurrency: 1,
        }
    }

    /// Create an orchestrator using the retry and concurrency settings of `config`
    pub fn from_config(config: &Config, adapter: ProviderAdapter) -> Self {
        Self::new(adapter, RetryPolicy::from(&config.retry)).with_concurrency(config.concurrent_requests)
    }

    /// Set how many pairs may be in flight at once (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Translate `text` for every provider and language
    pub async fn translate_all(
        &self,
        text: &str,
        languages: &[SupportedLanguage],
        providers: &[String],
    ) -> TranslationBatch {
        self.translate_all_with_progress(text, languages, providers, |_, _| {})
            .await
    }

    /// Same as [`translate_all`](Self::translate_all), reporting `(completed, total)` after each pair
    pub async fn translate_all_with_progress<F>(
        &self,
        text: &str,
        languages: &[SupportedLanguage],
        providers: &[String],
        mut on_progress: F,
    ) -> TranslationBatch
    where
        F: FnMut(usize, usize),
    {
        let pairs: Vec<(&str, SupportedLanguage)> = providers
            .iter()
            .flat_map(|provider| languages.iter().map(move |language| (provider.as_str(), *language)))
            .collect();
        let total = pairs.len();

        info!(
            "Translating into {} pair(s) ({} provider(s) x {} language(s))",
            total,
            providers.len(),
            languages.len()
        );

        let mut in_flight = stream::iter(pairs)
            .map(move |(provider, language)| self.translate_pair(text, provider, language))
            .buffered(self.concurrency);

        let mut results = Vec::with_capacity(total);
        while let Some(result) = in_flight.next().await {
            results.push(result);
            on_progress(results.len(), total);
        }

        TranslationBatch {
            source_text: text.to_string(),
            results,
        }
    }

    async fn translate_pair(&self, text: &str, provider_name: &str, language: SupportedLanguage) -> TranslationResult {
        let provider = match provider_name.parse::<ModelProvider>() {
            Ok(provider) => provider,
            Err(e) => {
                error!("Skipping {} - {}: {}", provider_name, language, e);
                return TranslationResult {
                    provider_label: provider_name.to_string(),
                    language,
                    outcome: Err(e.into()),
                };
            }
        };

        if !self.adapter.is_configured(provider) {
            let e = ConfigurationError::ProviderNotConfigured(provider.to_string());
            error!("Skipping {} - {}: {}", provider, language, e);
            return TranslationResult {
                provider_label: provider.to_string(),
                language,
                outcome: Err(e.into()),
            };
        }

        let (masked, placeholders) = mask(text);
        let prompt = self.template.render(language, &masked, &placeholders);
        let operation = format!("{} translation to {}", provider, language);

        let adapter = &self.adapter;
        let prompt = prompt.as_str();
        let outcome = self
            .retry
            .run(&operation, move || adapter.call(provider, prompt))
            .await
            .map(|translated| placeholders.unmask(&translated))
            .map_err(TranslationError::from);

        match &outcome {
            Ok(_) => info!("{} - {}: translated", provider, language),
            Err(e) => error!("{} - {}: {}", provider, language, e),
        }

        TranslationResult {
            provider_label: provider.to_string(),
            language,
            outcome,
        }
    }
}
