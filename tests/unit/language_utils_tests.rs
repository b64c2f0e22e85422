/*!
 * Tests for the supported language table
 */

use polytrans::language_utils::{SupportedLanguage, get_language_name};

/// Test that every language maps to its ISO 639-1 code
#[test]
fn test_supportedLanguage_codes_shouldMatchTable() {
    let pairs: Vec<(&str, &str)> = SupportedLanguage::ALL
        .iter()
        .map(|l| (l.display_name(), l.code()))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("Spanish", "es"),
            ("French", "fr"),
            ("German", "de"),
            ("Japanese", "ja"),
            ("Arabic", "ar"),
            ("Hindi", "hi"),
            ("Portuguese", "pt"),
        ]
    );
}

/// Test lookups by code
#[test]
fn test_fromCode_withUnknownCode_shouldReturnNone() {
    assert_eq!(SupportedLanguage::from_code("PT"), Some(SupportedLanguage::Portuguese));
    assert_eq!(SupportedLanguage::from_code("it"), None);
}

/// Test isolang integration
#[test]
fn test_getLanguageName_withValidAndInvalidCodes() {
    assert_eq!(get_language_name("de").unwrap(), "German");
    assert!(get_language_name("zz").is_err());
    assert!(SupportedLanguage::Arabic.iso_language().is_some());
}

/// Test display formatting
#[test]
fn test_display_shouldUseEnglishName() {
    assert_eq!(SupportedLanguage::Hindi.to_string(), "Hindi");
}
