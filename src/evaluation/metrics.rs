/*!
 * Translation quality metrics against a single reference.
 *
 * Provides sentence-level scores over token sequences:
 * - BLEU: clipped n-gram precision (n = 1..4) with brevity penalty
 * - METEOR: exact then Porter-stem unigram alignment with fragmentation penalty
 * - Fluency: symmetric token-count ratio
 * - Word matching: share of the candidate's distinct tokens found in the reference
 *
 * Fluency is only a length proxy: it says nothing about grammar or word order.
 */

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::errors::MetricError;

/// Highest n-gram order used by BLEU
const BLEU_MAX_ORDER: usize = 4;

/// METEOR parameters: precision/recall weight, penalty shape and penalty weight
const METEOR_ALPHA: f64 = 0.9;
const METEOR_BETA: f64 = 3.0;
const METEOR_GAMMA: f64 = 0.5;

/// Longest token sequence METEOR will align; each stage scans |ref| x |hyp| pairs
pub const METEOR_MAX_TOKENS: usize = 5_000;

static ENGLISH_STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Outcome of one metric for one evaluation row
#[derive(Debug, Clone, PartialEq)]
pub enum MetricScore {
    /// Computed score
    Value(f64),
    /// Why the metric could not be computed
    Error(String),
}

impl MetricScore {
    /// Numeric value, if the metric succeeded
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Error(_) => None,
        }
    }
}

impl From<Result<f64, MetricError>> for MetricScore {
    fn from(result: Result<f64, MetricError>) -> Self {
        match result {
            Ok(v) => Self::Value(v),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

impl fmt::Display for MetricScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::Error(e) => write!(f, "Error: {}", e),
        }
    }
}

fn finite(metric: &'static str, value: f64) -> Result<f64, MetricError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MetricError {
            metric,
            reason: format!("non-finite result {}", value),
        })
    }
}

fn ngram_counts<S: AsRef<str>>(tokens: &[S], n: usize) -> HashMap<Vec<&str>, usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        let gram: Vec<&str> = window.iter().map(|t| t.as_ref()).collect();
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Clipped n-gram matches and the number of hypothesis n-grams (at least 1)
fn modified_precision<S: AsRef<str>>(reference: &[S], hypothesis: &[S], n: usize) -> (usize, usize) {
    let hyp_counts = ngram_counts(hypothesis, n);
    let ref_counts = ngram_counts(reference, n);

    let matched = hyp_counts
        .iter()
        .map(|(gram, count)| (*count).min(ref_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total = hyp_counts.values().sum::<usize>().max(1);

    (matched, total)
}

fn brevity_penalty(reference_len: usize, hypothesis_len: usize) -> f64 {
    if hypothesis_len > reference_len {
        1.0
    } else if hypothesis_len == 0 {
        0.0
    } else {
        (1.0 - reference_len as f64 / hypothesis_len as f64).exp()
    }
}

/// Sentence BLEU with uniform 4-gram weights and no smoothing.
///
/// No unigram overlap scores 0. A higher order without matches contributes
/// the smallest positive float as its precision, which drives the score
/// towards 0 without producing a log of zero.
pub fn bleu<S: AsRef<str>>(reference: &[S], hypothesis: &[S]) -> Result<f64, MetricError> {
    let precisions: Vec<(usize, usize)> = (1..=BLEU_MAX_ORDER)
        .map(|n| modified_precision(reference, hypothesis, n))
        .collect();

    if precisions[0].0 == 0 {
        return Ok(0.0);
    }

    let weight = 1.0 / BLEU_MAX_ORDER as f64;
    let log_sum: f64 = precisions
        .iter()
        .map(|&(matched, total)| {
            let p = if matched == 0 {
                f64::MIN_POSITIVE
            } else {
                matched as f64 / total as f64
            };
            weight * p.ln()
        })
        .sum();

    let score = brevity_penalty(reference.len(), hypothesis.len()) * log_sum.exp();
    finite("BLEU", score)
}

/// One matching stage over the tokens left unmatched by earlier stages.
///
/// Hypothesis tokens are matched from the end; each one takes the last
/// unused reference token with the same key.
fn match_stage(
    reference_keys: &[String],
    hypothesis_keys: &[String],
    reference_used: &mut [bool],
    hypothesis_used: &mut [bool],
    matches: &mut Vec<(usize, usize)>,
) {
    for i in (0..hypothesis_keys.len()).rev() {
        if hypothesis_used[i] {
            continue;
        }
        let found = (0..reference_keys.len())
            .rev()
            .find(|&j| !reference_used[j] && reference_keys[j] == hypothesis_keys[i]);
        if let Some(j) = found {
            reference_used[j] = true;
            hypothesis_used[i] = true;
            matches.push((i, j));
        }
    }
}

/// Unigram alignment as (hypothesis index, reference index), sorted by hypothesis index.
///
/// Exact matches are taken first, then the remaining tokens are matched on
/// their English Porter stems.
fn align<S: AsRef<str>>(reference: &[S], hypothesis: &[S]) -> Vec<(usize, usize)> {
    let mut reference_used = vec![false; reference.len()];
    let mut hypothesis_used = vec![false; hypothesis.len()];
    let mut matches = Vec::new();

    let exact = |tokens: &[S]| tokens.iter().map(|t| t.as_ref().to_string()).collect::<Vec<_>>();
    match_stage(
        &exact(reference),
        &exact(hypothesis),
        &mut reference_used,
        &mut hypothesis_used,
        &mut matches,
    );

    let stems = |tokens: &[S]| {
        tokens
            .iter()
            .map(|t| ENGLISH_STEMMER.stem(t.as_ref()).into_owned())
            .collect::<Vec<_>>()
    };
    match_stage(
        &stems(reference),
        &stems(hypothesis),
        &mut reference_used,
        &mut hypothesis_used,
        &mut matches,
    );

    matches.sort_unstable_by_key(|&(i, _)| i);
    matches
}

/// Number of runs of matches adjacent in both sequences
fn count_chunks(matches: &[(usize, usize)]) -> usize {
    if matches.is_empty() {
        return 0;
    }
    1 + matches
        .windows(2)
        .filter(|pair| !(pair[1].0 == pair[0].0 + 1 && pair[1].1 == pair[0].1 + 1))
        .count()
}

/// METEOR with exact and stem matching (alpha 0.9, beta 3, gamma 0.5).
///
/// Returns 0 when nothing aligns or either side is empty. Fails when either
/// side is longer than [`METEOR_MAX_TOKENS`].
pub fn meteor<S: AsRef<str>>(reference: &[S], hypothesis: &[S]) -> Result<f64, MetricError> {
    let longest = reference.len().max(hypothesis.len());
    if longest > METEOR_MAX_TOKENS {
        return Err(MetricError {
            metric: "METEOR",
            reason: format!("{} tokens exceed the alignment limit of {}", longest, METEOR_MAX_TOKENS),
        });
    }

    let matches = align(reference, hypothesis);
    let matched = matches.len();
    if matched == 0 || hypothesis.is_empty() || reference.is_empty() {
        return Ok(0.0);
    }

    let precision = matched as f64 / hypothesis.len() as f64;
    let recall = matched as f64 / reference.len() as f64;
    let fmean = (precision * recall) / (METEOR_ALPHA * precision + (1.0 - METEOR_ALPHA) * recall);

    let fragmentation = count_chunks(&matches) as f64 / matched as f64;
    let penalty = METEOR_GAMMA * fragmentation.powf(METEOR_BETA);

    finite("METEOR", (1.0 - penalty) * fmean)
}

/// `min(|c|/|b|, |b|/|c|)`, or 0 when either side has no tokens
pub fn fluency<S: AsRef<str>>(reference: &[S], candidate: &[S]) -> f64 {
    let (c, b) = (candidate.len(), reference.len());
    if c == 0 || b == 0 {
        return 0.0;
    }
    let (c, b) = (c as f64, b as f64);
    (c / b).min(b / c)
}

/// Share of the candidate's distinct tokens that also occur in the reference
pub fn word_matching<S: AsRef<str>>(reference: &[S], candidate: &[S]) -> f64 {
    let candidate_words: HashSet<&str> = candidate.iter().map(|t| t.as_ref()).collect();
    if candidate_words.is_empty() {
        return 0.0;
    }
    let reference_words: HashSet<&str> = reference.iter().map(|t| t.as_ref()).collect();
    let shared = candidate_words.intersection(&reference_words).count();
    shared as f64 / candidate_words.len() as f64
}
