/*!
 * Evaluation engine.
 *
 * Scores every candidate translation of an imported table against a
 * baseline translation of the reference text. Schema problems abort the run;
 * everything else is recorded as a warning for the affected cell and the run
 * continues with the next one.
 */

use log::{debug, info, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{ParseError, ValidationError};
use crate::file_utils::DataTable;
use crate::language_utils::SupportedLanguage;

use super::baseline::BaselineTranslator;
use super::metrics::{self, MetricScore};
use super::tokenize::{Tokenizer, WordTokenizer, split_sentences};

/// Accepted names for the first (reference text) column
pub const REFERENCE_COLUMNS: [&str; 2] = ["Original Text", "English"];

/// Column headers of the evaluation export
pub const EVALUATION_HEADERS: [&str; 9] = [
    "English Text",
    "Model",
    "Language",
    "Application Translation",
    "Google Translate Translation",
    "BLEU Score",
    "METEOR Score",
    "Fluency Score",
    "Word Matching Percentage",
];

/// Split a candidate column label `"{model} - {language}"`
pub fn parse_column_label(label: &str) -> Result<(String, String), ParseError> {
    let parts: Vec<&str> = label.split(" - ").collect();
    match parts.as_slice() {
        [model, language] => Ok((model.to_string(), language.to_string())),
        _ => Err(ParseError {
            label: label.to_string(),
        }),
    }
}

/// A cell that was skipped, and why
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationWarning {
    /// 1-based data row number
    pub row: usize,
    /// Column label
    pub column: String,
    pub reason: String,
}

impl fmt::Display for EvaluationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column '{}': {}", self.row, self.column, self.reason)
    }
}

/// Scores of one candidate translation
#[derive(Debug, Clone)]
pub struct EvaluationRow {
    pub source_text: String,
    pub model: String,
    pub language: SupportedLanguage,
    /// The application's translation
    pub candidate: String,
    /// The baseline translation it was scored against
    pub baseline: String,
    pub bleu: MetricScore,
    pub meteor: MetricScore,
    pub fluency: MetricScore,
    pub word_matching: MetricScore,
}

impl EvaluationRow {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.source_text.clone(),
            self.model.clone(),
            self.language.display_name().to_string(),
            self.candidate.clone(),
            self.baseline.clone(),
            self.bleu.to_string(),
            self.meteor.to_string(),
            self.fluency.to_string(),
            self.word_matching.to_string(),
        ]
    }
}

/// Everything produced by one evaluation run
#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    pub rows: Vec<EvaluationRow>,
    pub warnings: Vec<EvaluationWarning>,
}

impl EvaluationReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render with the evaluation export headers
    pub fn to_table(&self) -> DataTable {
        DataTable::new(
            EVALUATION_HEADERS.iter().map(|h| h.to_string()).collect(),
            self.rows.iter().map(EvaluationRow::to_record).collect(),
        )
    }
}

/// Why one candidate cell was not scored
enum Skip {
    /// Expected (an error value from the translation run); logged at debug only
    Silent(String),
    /// Reported to the user
    Warn(String),
}

/// Scores imported translation tables
pub struct EvaluationEngine {
    baseline: Arc<dyn BaselineTranslator>,
    tokenizer: Box<dyn Tokenizer>,
}

impl EvaluationEngine {
    /// Create an engine using the default word tokenizer
    pub fn new(baseline: Arc<dyn BaselineTranslator>) -> Self {
        Self {
            baseline,
            tokenizer: Box::new(WordTokenizer),
        }
    }

    /// Replace the tokenizer
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Check that the table has a header row starting with a reference column
    pub fn validate(table: &DataTable) -> Result<(), ValidationError> {
        let first = table.headers.first().ok_or(ValidationError::EmptyTable)?;
        if REFERENCE_COLUMNS.iter().any(|name| *name == first.trim()) {
            Ok(())
        } else {
            Err(ValidationError::InvalidReferenceColumn(first.clone()))
        }
    }

    /// Score every candidate column of every row.
    ///
    /// `on_progress(completed, total)` is called after each source row.
    pub async fn evaluate<F>(&self, table: &DataTable, mut on_progress: F) -> Result<EvaluationReport, ValidationError>
    where
        F: FnMut(usize, usize),
    {
        Self::validate(table)?;

        let total = table.rows.len();
        let mut report = EvaluationReport::default();
        // (reference text, language code) -> baseline translation; failures are refetched per column
        let mut baselines: HashMap<(String, &'static str), String> = HashMap::new();

        info!(
            "Evaluating {} row(s) x {} candidate column(s)",
            total,
            table.headers.len().saturating_sub(1)
        );

        for row_index in 0..total {
            let source_text = table.cell(row_index, 0).to_string();
            debug!("Evaluating row {}/{}: '{}'", row_index + 1, total, source_text);

            for (column_index, label) in table.headers.iter().enumerate().skip(1) {
                let candidate = table.cell(row_index, column_index);
                match self
                    .score_cell(&source_text, label, candidate, &mut baselines)
                    .await
                {
                    Ok(row) => report.rows.push(row),
                    Err(Skip::Silent(reason)) => debug!("Skipping {} in row {}: {}", label, row_index + 1, reason),
                    Err(Skip::Warn(reason)) => {
                        warn!("Skipping {} in row {}: {}", label, row_index + 1, reason);
                        report.warnings.push(EvaluationWarning {
                            row: row_index + 1,
                            column: label.clone(),
                            reason,
                        });
                    }
                }
            }

            on_progress(row_index + 1, total);
        }

        info!(
            "Evaluation finished: {} scored, {} warning(s)",
            report.rows.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    async fn score_cell(
        &self,
        source_text: &str,
        label: &str,
        candidate: &str,
        baselines: &mut HashMap<(String, &'static str), String>,
    ) -> Result<EvaluationRow, Skip> {
        let (model, language_name) = parse_column_label(label).map_err(|e| Skip::Warn(e.to_string()))?;

        let language = SupportedLanguage::from_display_name(&language_name)
            .ok_or_else(|| Skip::Warn(format!("Unknown language: {}", language_name)))?;

        if candidate.starts_with("Error") {
            return Err(Skip::Silent(format!("translation error: {}", candidate)));
        }
        if candidate.trim().is_empty() {
            return Err(Skip::Warn("missing translation".to_string()));
        }

        let key = (source_text.to_string(), language.code());
        let baseline = match baselines.get(&key) {
            Some(cached) => cached.clone(),
            None => {
                let fetched = self
                    .fetch_baseline(source_text, language)
                    .await
                    .map_err(|reason| Skip::Warn(format!("Baseline translation failed for {}: {}", language, reason)))?;
                baselines.insert(key, fetched.clone());
                fetched
            }
        };

        let candidate_tokens = self
            .tokenizer
            .tokenize(candidate)
            .map_err(|e| Skip::Warn(e.to_string()))?;
        let baseline_tokens = self
            .tokenizer
            .tokenize(&baseline)
            .map_err(|e| Skip::Warn(e.to_string()))?;

        let bleu = MetricScore::from(metrics::bleu(&baseline_tokens, &candidate_tokens));
        let meteor = MetricScore::from(metrics::meteor(&baseline_tokens, &candidate_tokens));
        let fluency = MetricScore::Value(metrics::fluency(&baseline_tokens, &candidate_tokens));
        let word_matching = MetricScore::Value(metrics::word_matching(&baseline_tokens, &candidate_tokens));

        for (name, score) in [("BLEU", &bleu), ("METEOR", &meteor)] {
            if let MetricScore::Error(e) = score {
                warn!("{} failed for {}: {}", name, label, e);
            }
        }
        debug!("{}: BLEU {}, METEOR {}, fluency {}, word matching {}", label, bleu, meteor, fluency, word_matching);

        Ok(EvaluationRow {
            source_text: source_text.to_string(),
            model,
            language,
            candidate: candidate.to_string(),
            baseline,
            bleu,
            meteor,
            fluency,
            word_matching,
        })
    }

    /// Translate sentence by sentence and join with single spaces
    async fn fetch_baseline(&self, source_text: &str, language: SupportedLanguage) -> Result<String, String> {
        let mut translated = Vec::new();
        for sentence in split_sentences(source_text) {
            let text = self
                .baseline
                .translate(&sentence, language.code())
                .await
                .map_err(|e| e.to_string())?;
            translated.push(text.trim().to_string());
        }
        Ok(translated.join(" "))
    }
}
