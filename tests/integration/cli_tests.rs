/*!
 * Command line tests running the polytrans binary
 */

use std::process::{Command, Output};

use tempfile::TempDir;

use crate::common;

const KEY_VARS: [&str; 3] = ["OPENAI_API_KEY", "DEEPSEEK_API_KEY", "ANTHROPIC_API_KEY"];

/// Run the binary inside `dir` with no provider keys in the environment
fn run_without_keys(dir: &TempDir, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_polytrans"));
    command.current_dir(dir.path()).args(args);
    for var in KEY_VARS {
        command.env_remove(var);
    }
    command.output().unwrap()
}

/// Test that evaluate refuses to start without provider keys
#[test]
fn test_cli_evaluateWithoutKeys_shouldFailBeforeConfigSetup() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(temp_dir.path(), "translations.csv", "Original Text,OpenAI - Spanish\nHello,Hola\n")
        .unwrap();

    let output = run_without_keys(&temp_dir, &["evaluate", "translations.csv"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing API keys"), "stderr: {stderr}");
    assert!(!temp_dir.path().join("conf.json").exists());
    assert!(!temp_dir.path().join("evaluation.csv").exists());
}

/// Test that scrape refuses to start without provider keys
#[test]
fn test_cli_scrapeWithoutKeys_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();

    let output = run_without_keys(&temp_dir, &["scrape", "http://127.0.0.1:9/page", "--stdout"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("OPENAI_API_KEY"));
}

/// Test that completions need no keys and no configuration
#[test]
fn test_cli_completionsWithoutKeys_shouldSucceed() {
    let temp_dir = common::create_temp_dir().unwrap();

    let output = run_without_keys(&temp_dir, &["completions", "bash"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("polytrans"));
    assert!(!temp_dir.path().join("conf.json").exists());
}
