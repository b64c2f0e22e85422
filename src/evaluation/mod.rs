/*!
 * Scoring of candidate translations against a baseline translation.
 *
 * - `tokenize`: word tokenization and sentence splitting
 * - `metrics`: BLEU, METEOR, fluency and word-matching scores
 * - `baseline`: the reference translation service
 * - `engine`: table validation and the per-cell scoring loop
 */

pub use self::baseline::{BaselineTranslator, GoogleTranslate};
pub use self::engine::{EvaluationEngine, EvaluationReport, EvaluationRow, EvaluationWarning};
pub use self::metrics::MetricScore;
pub use self::tokenize::{Tokenizer, WordTokenizer};

pub mod baseline;
pub mod engine;
pub mod metrics;
pub mod tokenize;
