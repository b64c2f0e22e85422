/*!
 * Word tokenization and sentence splitting for scoring.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TokenizationError;

/// Words (with inner apostrophes) or single punctuation characters
static WORD_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+(?:['’]\w+)*|[^\w\s]").unwrap());

/// Turns a text into the token sequence the metrics compare
///
/// Implementations backed by external models or services may fail; the
/// engine then skips the affected column.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizationError>;
}

/// Lower-cased word tokenizer; punctuation marks become separate tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizationError> {
        Ok(WORD_TOKEN_REGEX
            .find_iter(&text.to_lowercase())
            .map(|m| m.as_str().to_string())
            .collect())
    }
}

/// Split a text into sentences.
///
/// Latin terminators (`.`, `!`, `?`) end a sentence when followed by
/// whitespace or the end of the text; CJK terminators end one immediately.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let boundary = match c {
            '。' | '！' | '？' => true,
            '.' | '!' | '?' => chars.peek().is_none_or(|next| next.is_whitespace()),
            _ => false,
        };
        if boundary {
            push_sentence(&mut sentences, &mut current);
        }
    }
    push_sentence(&mut sentences, &mut current);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, current: &mut String) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
    current.clear();
}
