use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::evaluation::{BaselineTranslator, EvaluationEngine, EvaluationReport};
use crate::file_utils::FileManager;
use crate::language_utils::SupportedLanguage;
use crate::providers::ProviderAdapter;
use crate::scraper::WebScraper;
use crate::translation::{TranslationBatch, TranslationOrchestrator};

// @module: Application controller for translation, evaluation and scraping

/// Default file names of the exported artifacts
pub const DEFAULT_TRANSLATIONS_FILE: &str = "translations.csv";
pub const DEFAULT_EVALUATION_FILE: &str = "evaluation.csv";
pub const DEFAULT_SCRAPED_FILE: &str = "scraped_text.txt";

/// Where the text to translate comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
    /// Text given directly
    Literal(String),
    /// Main text of a web page
    Url(String),
    /// Contents of a text file
    File(PathBuf),
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reject text that cannot be translated: blank, or an error value from extraction
    pub fn check_source_text(text: &str) -> Result<()> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("Nothing to translate: the source text is empty"));
        }
        if trimmed.starts_with("Error") {
            return Err(anyhow!("Refusing to translate an error value: {}", trimmed));
        }
        Ok(())
    }

    /// Resolve a source into the text to translate
    pub async fn load_source_text(&self, source: &TextSource) -> Result<String> {
        let text = match source {
            TextSource::Literal(text) => text.clone(),
            TextSource::File(path) => FileManager::read_to_string(path)?,
            TextSource::Url(url) => WebScraper::new(&self.config.scraper)
                .scrape(url)
                .await
                .with_context(|| format!("Failed to extract text from {}", url))?,
        };
        Ok(text.trim().to_string())
    }

    /// Translate the source into every (provider, language) pair and export the table
    pub async fn translate(
        &self,
        adapter: ProviderAdapter,
        source: &TextSource,
        providers: &[String],
        languages: &[SupportedLanguage],
        output: &Path,
    ) -> Result<TranslationBatch> {
        let start_time = Instant::now();

        let text = self.load_source_text(source).await?;
        Self::check_source_text(&text)?;
        if providers.is_empty() || languages.is_empty() {
            return Err(anyhow!("Select at least one provider and one language"));
        }

        let orchestrator = TranslationOrchestrator::from_config(&self.config, adapter);

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message("Translating");

        let pb = spinner.clone();
        let batch = orchestrator
            .translate_all_with_progress(&text, languages, providers, move |completed, total| {
                pb.set_message(format!("Translating ({}/{})", completed, total));
            })
            .await;
        spinner.finish_and_clear();

        for result in &batch.results {
            match &result.outcome {
                Ok(_) => info!("{}: ok", result.key()),
                Err(e) => error!("{}: {}", result.key(), e),
            }
        }

        FileManager::write_csv_table(output, &batch.to_table())?;
        info!(
            "Translation completed in {} ({} succeeded, {} failed). Success: {}",
            Self::format_duration(start_time.elapsed()),
            batch.success_count(),
            batch.failure_count(),
            output.display()
        );

        Ok(batch)
    }

    /// Score an imported translation table and export the report when it has rows
    pub async fn evaluate(
        &self,
        baseline: Arc<dyn BaselineTranslator>,
        input: &Path,
        output: &Path,
    ) -> Result<EvaluationReport> {
        let start_time = Instant::now();
        let table = FileManager::read_csv_table(input)?;

        let engine = EvaluationEngine::new(baseline);

        let progress_bar = ProgressBar::new(table.rows.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Evaluating");

        let pb = progress_bar.clone();
        let report = engine
            .evaluate(&table, move |completed, _total| pb.set_position(completed as u64))
            .await;
        progress_bar.finish_and_clear();
        let report = report.context("The imported table cannot be evaluated")?;

        for warning in &report.warnings {
            warn!("Skipped {}", warning);
        }

        if report.is_empty() {
            warn!("No evaluation data generated");
            return Ok(report);
        }

        FileManager::write_csv_table(output, &report.to_table())?;
        info!(
            "Evaluation completed in {}: {} row(s). Success: {}",
            Self::format_duration(start_time.elapsed()),
            report.rows.len(),
            output.display()
        );

        Ok(report)
    }

    /// Extract the main text of `url`, writing it to `output` when given
    pub async fn scrape(&self, url: &str, output: Option<&Path>) -> Result<String> {
        let text = WebScraper::new(&self.config.scraper)
            .scrape(url)
            .await
            .with_context(|| format!("Failed to extract text from {}", url))?;

        match output {
            Some(path) => {
                FileManager::write_to_file(path, &text)?;
                info!("Success: {}", path.display());
            }
            None => println!("{}", text),
        }

        Ok(text)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:01}s", seconds, duration.subsec_millis() / 100)
        }
    }
}
