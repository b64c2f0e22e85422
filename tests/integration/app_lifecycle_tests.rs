/*!
 * Full app lifecycle tests: translate, export, import and evaluate
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use polytrans::app_config::ModelProvider;
use polytrans::app_controller::{Controller, TextSource};
use polytrans::file_utils::FileManager;
use polytrans::language_utils::SupportedLanguage;
use polytrans::providers::ProviderAdapter;
use polytrans::providers::mock::MockProvider;
use crate::common::{self, MockBaseline};

fn spanish_reply(req: &polytrans::providers::mock::MockRequest) -> String {
    req.quoted_text().replace("Best forex brokers in", "Los mejores brokers de forex en")
}

/// Test that a controller cannot be built from an invalid configuration
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = common::fast_config();
    config.concurrent_requests = 0;
    assert!(Controller::with_config(config).is_err());
}

/// Test the translate then evaluate round trip through CSV files
#[tokio::test]
async fn test_translateThenEvaluate_shouldProduceBothExports() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let translations = temp_dir.path().join("translations.csv");
    let evaluation = temp_dir.path().join("evaluation.csv");

    let controller = Controller::with_config(common::fast_config())?;
    let adapter = ProviderAdapter::new()
        .register(ModelProvider::OpenAI, Arc::new(MockProvider::working().with_custom_response(spanish_reply)))
        .register(ModelProvider::DeepSeek, Arc::new(MockProvider::failing()));

    let batch = controller
        .translate(
            adapter,
            &TextSource::Literal("Best forex brokers in [country]".to_string()),
            &["OpenAI".to_string(), "DeepSeek".to_string()],
            &[SupportedLanguage::Spanish],
            &translations,
        )
        .await?;
    assert_eq!(batch.success_count(), 1);

    let bytes = fs::read(&translations)?;
    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
    let exported = FileManager::read_csv_table(&translations)?;
    assert_eq!(exported.headers, vec!["Original Text", "OpenAI - Spanish", "DeepSeek - Spanish"]);
    assert_eq!(exported.cell(0, 1), "Los mejores brokers de forex en [country]");
    assert!(exported.cell(0, 2).starts_with("Error: DeepSeek translation to Spanish failed after 3 attempts"));

    let baseline = Arc::new(MockBaseline::new().with(
        "Best forex brokers in [country]",
        "es",
        "Los mejores brokers de forex en [country]",
    ));
    let report = controller.evaluate(baseline, &translations, &evaluation).await?;

    assert_eq!(report.rows.len(), 1);
    assert!(report.warnings.is_empty());
    let scored = FileManager::read_csv_table(&evaluation)?;
    assert_eq!(scored.headers[0], "English Text");
    assert_eq!(scored.cell(0, 1), "OpenAI");
    assert_eq!(scored.cell(0, 2), "Spanish");
    assert_eq!(scored.cell(0, 5), "1");
    Ok(())
}

/// Test that an evaluation with nothing to score writes no file
#[tokio::test]
async fn test_evaluate_withOnlyErrorCells_shouldNotWriteExport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "translations.csv",
        "Original Text,OpenAI - French\nHello,Error: API request failed\n",
    )?;
    let output = temp_dir.path().join("evaluation.csv");

    let controller = Controller::with_config(common::fast_config())?;
    let report = controller
        .evaluate(Arc::new(MockBaseline::new()), &input, &output)
        .await?;

    assert!(report.is_empty());
    assert!(!output.exists());
    Ok(())
}

/// Test that an import with the wrong first column is rejected
#[tokio::test]
async fn test_evaluate_withWrongReferenceColumn_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "scores.csv", "Score,OpenAI - French\n1,Bonjour\n")?;
    let output = temp_dir.path().join("evaluation.csv");

    let controller = Controller::with_config(common::fast_config())?;
    let err = controller
        .evaluate(Arc::new(MockBaseline::new()), &input, &output)
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("'Original Text' or 'English'"));
    assert!(!output.exists());
    Ok(())
}

/// Test translating text read from a file
#[tokio::test]
async fn test_translate_withFileSource_shouldTrimAndTranslate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "source.txt", "\n  Hello [name]  \n")?;
    let output = temp_dir.path().join("out").join("translations.csv");

    let controller = Controller::with_config(common::fast_config())?;
    let batch = controller
        .translate(
            common::adapter_with(ModelProvider::Anthropic, MockProvider::working()),
            &TextSource::File(source),
            &["anthropic".to_string()],
            &[SupportedLanguage::German, SupportedLanguage::Japanese],
            &output,
        )
        .await?;

    assert_eq!(batch.source_text, "Hello [name]");
    assert_eq!(batch.success_count(), 2);
    assert_eq!(batch.results[1].cell(), "[TRANSLATED] Hello [name]");
    assert!(output.exists());
    Ok(())
}

/// Test that empty and error-valued sources are refused before any provider call
#[tokio::test]
async fn test_translate_withUnusableSource_shouldFailWithoutCalls() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("translations.csv");
    let mock = MockProvider::working();

    let controller = Controller::with_config(common::fast_config())?;
    for text in ["   ", "Error: HTTP 404"] {
        let result = controller
            .translate(
                common::adapter_with(ModelProvider::OpenAI, mock.clone()),
                &TextSource::Literal(text.to_string()),
                &["OpenAI".to_string()],
                &[SupportedLanguage::Spanish],
                &output,
            )
            .await;
        assert!(result.is_err());
    }

    assert_eq!(mock.request_count(), 0);
    assert!(!output.exists());
    Ok(())
}
