/*!
 * Tests for tokenization and the scoring metrics on realistic sentences
 */

use polytrans::evaluation::metrics::{bleu, fluency, meteor, word_matching};
use polytrans::evaluation::tokenize::split_sentences;
use polytrans::evaluation::{MetricScore, Tokenizer, WordTokenizer};

fn tokenize(text: &str) -> Vec<String> {
    WordTokenizer.tokenize(text).unwrap()
}

/// Test that a perfect candidate scores at the top of every metric
#[test]
fn test_metrics_withIdenticalSentence_shouldScoreHigh() {
    let reference = tokenize("Los mejores brokers de forex en [country].");
    let candidate = tokenize("los mejores brokers de forex en [country].");

    assert!((bleu(&reference, &candidate).unwrap() - 1.0).abs() < 1e-9);
    assert!(meteor(&reference, &candidate).unwrap() > 0.99);
    assert_eq!(fluency(&reference, &candidate), 1.0);
    assert_eq!(word_matching(&reference, &candidate), 1.0);
}

/// Test a one-word substitution
#[test]
fn test_metrics_withOneSubstitution_shouldDegradeGracefully() {
    let reference = tokenize("The cat sat on the mat.");
    let candidate = tokenize("The cat is on the mat.");

    let bleu_score = bleu(&reference, &candidate).unwrap();
    let meteor_score = meteor(&reference, &candidate).unwrap();

    assert!(bleu_score > 0.0 && bleu_score < 1.0);
    assert!(meteor_score > bleu_score);
    assert_eq!(fluency(&reference, &candidate), 1.0);
    // Distinct candidate tokens: the, cat, is, on, mat, "."
    assert!((word_matching(&reference, &candidate) - 5.0 / 6.0).abs() < 1e-9);
}

/// Test that scores stay within [0, 1]
#[test]
fn test_metrics_withUnrelatedTexts_shouldStayInRange() {
    let pairs = [
        ("Hola mundo", "Bonjour le monde"),
        ("a", "a a a a a a a a"),
        ("", "something"),
        ("ベストブローカー", "ベストブローカー"),
    ];
    for (reference, candidate) in pairs {
        let (r, c) = (tokenize(reference), tokenize(candidate));
        for score in [
            bleu(&r, &c).unwrap(),
            meteor(&r, &c).unwrap(),
            fluency(&r, &c),
            word_matching(&r, &c),
        ] {
            assert!((0.0..=1.0).contains(&score), "{score} out of range for {reference:?}/{candidate:?}");
        }
    }
}

/// Test that stem matching credits inflected forms
#[test]
fn test_meteor_withPluralInCandidate_shouldScoreAboveZero() {
    let reference = tokenize("The best broker in Spain");
    let candidate = tokenize("The best brokers in Spain");

    let score = meteor(&reference, &candidate).unwrap();
    assert!(score > 0.9, "got {score}");
    assert!(bleu(&reference, &candidate).unwrap() < score);
}

/// Test sentence splitting for Latin and CJK text
#[test]
fn test_splitSentences_shouldHandleMixedTerminators() {
    assert_eq!(
        split_sentences("Version 2.5 is out. Try it! Really?"),
        vec!["Version 2.5 is out.", "Try it!", "Really?"]
    );
    assert_eq!(split_sentences("最高。ブローカー！"), vec!["最高。", "ブローカー！"]);
    assert!(split_sentences("   ").is_empty());
}

/// Test metric score cells
#[test]
fn test_metricScore_value_shouldExposeNumbers() {
    assert_eq!(MetricScore::Value(0.25).value(), Some(0.25));
    assert_eq!(MetricScore::Error("x".to_string()).value(), None);
    assert_eq!(MetricScore::Error("x".to_string()).to_string(), "Error: x");
}
