/*!
 * Placeholder masking for template tokens.
 *
 * Bracketed tokens such as `[country]` must survive translation verbatim.
 * Before a prompt is built they are swapped for positional markers
 * (`__PH0__`, `__PH1__`, ...) and swapped back once the model has answered.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Bracket-delimited token without nested brackets or line breaks
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\[\]\r\n]*\]").unwrap());

/// Any marker shape, whatever its prefix tag
static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(PH(?:_\d+_)?)(\d+)__").unwrap());

const DEFAULT_TAG: &str = "PH";

/// Ordered original placeholders of one source text and their markers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceholderSet {
    tag: String,
    originals: Vec<String>,
}

impl PlaceholderSet {
    /// Original bracketed substrings in extraction order
    pub fn originals(&self) -> &[String] {
        &self.originals
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Marker standing in for the placeholder at `index`
    pub fn marker(&self, index: usize) -> String {
        format!("__{}{}__", self.tag, index)
    }

    /// Put the original placeholders back into a translated text.
    ///
    /// Markers are resolved in a single pass so a restored placeholder can
    /// never be rewritten again. Markers the model dropped are simply absent
    /// from the output; markers with an unknown index, or from another
    /// tag, are left untouched.
    pub fn unmask(&self, text: &str) -> String {
        if self.originals.is_empty() {
            return text.to_string();
        }

        MARKER_REGEX
            .replace_all(text, |caps: &Captures| {
                let whole = caps[0].to_string();
                if caps[1] != self.tag {
                    return whole;
                }
                caps[2]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.originals.get(index).cloned())
                    .unwrap_or(whole)
            })
            .into_owned()
    }
}

/// Replace every bracketed token with a positional marker.
///
/// The i-th occurrence (left to right) becomes marker i, so repeated tokens
/// get distinct markers. If the text already contains the default marker
/// prefix, a disambiguated tag is used instead so existing text can never be
/// mistaken for a marker during restoration.
pub fn mask(text: &str) -> (String, PlaceholderSet) {
    let tag = choose_tag(text);
    let mut originals = Vec::new();

    let masked = PLACEHOLDER_REGEX
        .replace_all(text, |caps: &Captures| {
            let index = originals.len();
            originals.push(caps[0].to_string());
            format!("__{}{}__", tag, index)
        })
        .into_owned();

    (masked, PlaceholderSet { tag, originals })
}

fn choose_tag(text: &str) -> String {
    if !text.contains(&format!("__{}", DEFAULT_TAG)) {
        return DEFAULT_TAG.to_string();
    }
    (1..)
        .map(|n| format!("{}_{}_", DEFAULT_TAG, n))
        .find(|tag| !text.contains(&format!("__{}", tag)))
        .unwrap_or_else(|| DEFAULT_TAG.to_string())
}
