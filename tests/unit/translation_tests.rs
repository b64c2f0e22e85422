/*!
 * Tests for placeholder masking, retry policy and prompt rendering
 */

use std::time::Duration;

use polytrans::app_config::RetryConfig;
use polytrans::language_utils::SupportedLanguage;
use polytrans::providers::mock::MockRequest;
use polytrans::translation::{PromptTemplate, RetryPolicy, mask};

/// Test that the configured retry settings map onto the policy
#[test]
fn test_retryPolicy_fromConfig_shouldUseCountAndBackoff() {
    let config = RetryConfig {
        retry_count: 4,
        retry_backoff_ms: 250,
    };
    let policy = RetryPolicy::from(&config);

    assert_eq!(policy.max_attempts, 4);
    assert_eq!(policy.delay_after(1), Duration::from_millis(500));
    assert_eq!(policy.delay_after(3), Duration::from_millis(2000));
}

/// Test that a zero retry count still allows one attempt
#[test]
fn test_retryPolicy_fromConfig_withZeroCount_shouldAttemptOnce() {
    let config = RetryConfig {
        retry_count: 0,
        retry_backoff_ms: 10,
    };
    assert_eq!(RetryPolicy::from(&config).max_attempts, 1);
    assert_eq!(RetryPolicy::from(&config).total_backoff(), Duration::ZERO);
}

/// Test that the prompt quotes exactly the masked text
#[test]
fn test_prompt_withMaskedText_shouldQuoteMaskedSource() {
    let (masked, set) = mask("Top [count] brokers in [country]");
    let prompt = PromptTemplate::default().render(SupportedLanguage::French, &masked, &set);

    let request = MockRequest {
        model: "gpt-4o".to_string(),
        prompt: prompt.clone(),
    };
    assert_eq!(request.quoted_text(), "Top __PH0__ brokers in __PH1__");
    assert!(prompt.contains("__PH0__, __PH1__"));
    assert!(prompt.contains("to French"));
}

/// Test a custom template
#[test]
fn test_prompt_withCustomTemplate_shouldSubstituteAllTokens() {
    let (masked, set) = mask("Hello [name]");
    let template = PromptTemplate::new("[{target_language}] {text} / keep {marker_example}");

    assert_eq!(
        template.render(SupportedLanguage::Japanese, &masked, &set),
        "[Japanese] Hello __PH0__ / keep __PH0__"
    );
}

/// Test restoring placeholders after the model reorders them
#[test]
fn test_unmask_withReorderedMarkers_shouldRestoreEach() {
    let (_, set) = mask("[brokerName] is regulated in [country]");
    let translated = "En __PH1__, __PH0__ está regulado";

    assert_eq!(set.unmask(translated), "En [country], [brokerName] está regulado");
}
