use anyhow::{Result, anyhow};
use isolang::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language utilities for the closed set of target languages
///
/// Every target language is known both by its English display name (used in
/// prompts and table column labels) and by the ISO 639-1 code understood by the
/// baseline translation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedLanguage {
    Spanish,
    French,
    German,
    Japanese,
    Arabic,
    Hindi,
    Portuguese,
}

impl SupportedLanguage {
    /// All supported languages in display order
    pub const ALL: [SupportedLanguage; 7] = [
        Self::Spanish,
        Self::French,
        Self::German,
        Self::Japanese,
        Self::Arabic,
        Self::Hindi,
        Self::Portuguese,
    ];

    /// English display name, as used in column labels
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Japanese => "Japanese",
            Self::Arabic => "Arabic",
            Self::Hindi => "Hindi",
            Self::Portuguese => "Portuguese",
        }
    }

    /// ISO 639-1 code used by the baseline translation service
    pub fn code(&self) -> &'static str {
        match self {
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::Japanese => "ja",
            Self::Arabic => "ar",
            Self::Hindi => "hi",
            Self::Portuguese => "pt",
        }
    }

    /// Look up a language by its exact display name (column labels are case sensitive)
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|lang| lang.display_name() == name)
    }

    /// Look up a language by its ISO 639-1 code
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.iter().copied().find(|lang| lang.code() == code)
    }

    /// The isolang entry for this language
    pub fn iso_language(&self) -> Option<Language> {
        Language::from_639_1(self.code())
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for SupportedLanguage {
    type Err = anyhow::Error;

    /// Accepts a display name (any case) or an ISO 639-1 code
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.display_name().eq_ignore_ascii_case(trimmed))
            .or_else(|| Self::from_code(trimmed))
            .ok_or_else(|| {
                anyhow!(
                    "Unsupported language: {}. Supported languages: {}",
                    s,
                    Self::ALL.iter().map(|l| l.display_name()).collect::<Vec<_>>().join(", ")
                )
            })
    }
}

/// Get the English name of any ISO 639-1 language code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();
    Language::from_639_1(&normalized_code)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}
