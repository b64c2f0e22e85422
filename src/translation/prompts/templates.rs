/*!
 * Prompt templates for placeholder-safe translation.
 *
 * The rendered prompt names the target language, embeds the masked source text
 * and tells the model to leave every positional marker untouched.
 */

use crate::language_utils::SupportedLanguage;
use crate::translation::placeholders::PlaceholderSet;

/// Single-message prompt template for one translation request.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default translation instruction.
    pub const TRANSLATOR: &'static str = "Translate the following text to {target_language}, \
preserving all placeholder markers (e.g., {marker_example}) exactly as they appear, without translating or altering them. \
Respond with the translation only: '{text}'";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default translator template.
    pub fn translator() -> Self {
        Self::new(Self::TRANSLATOR)
    }

    /// Render the template for a masked text.
    pub fn render(&self, target_language: SupportedLanguage, masked_text: &str, placeholders: &PlaceholderSet) -> String {
        let marker_example = if placeholders.is_empty() {
            placeholders.marker(0)
        } else {
            (0..placeholders.len())
                .map(|i| placeholders.marker(i))
                .collect::<Vec<_>>()
                .join(", ")
        };

        // Text goes last so markers inside it are never re-substituted
        self.template
            .replace("{target_language}", target_language.display_name())
            .replace("{marker_example}", &marker_example)
            .replace("{text}", masked_text)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::translator()
    }
}
