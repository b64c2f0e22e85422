/*!
 * Baseline translation service used as the scoring reference.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::app_config::BaselineConfig;
use crate::errors::BaselineError;

/// Independent translator producing reference translations
#[async_trait]
pub trait BaselineTranslator: Send + Sync {
    /// Translate `text` from the configured source language into `target_code`
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, BaselineError>;
}

/// Client for the public Google Translate web endpoint
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, e.g. `https://translate.googleapis.com`
    endpoint: String,
    /// ISO 639-1 source language code
    source_language: String,
}

impl GoogleTranslate {
    pub fn new(endpoint: impl Into<String>, source_language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder().timeout(timeout).build().unwrap_or_default(),
            endpoint: endpoint.into(),
            source_language: source_language.into(),
        }
    }

    pub fn from_config(config: &BaselineConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            config.source_language.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn translate_url(&self) -> String {
        format!("{}/translate_a/single", self.endpoint.trim_end_matches('/'))
    }

    /// Concatenate the translated segments of a `translate_a/single` payload
    fn parse_response(body: &Value) -> Result<String, BaselineError> {
        let segments = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| BaselineError::ParseError("missing translation segments".to_string()))?;

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if text.trim().is_empty() {
            return Err(BaselineError::ParseError("empty translation".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl BaselineTranslator for GoogleTranslate {
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, BaselineError> {
        let response = self
            .client
            .get(self.translate_url())
            .query(&[
                ("client", "gtx"),
                ("sl", self.source_language.as_str()),
                ("tl", target_code),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| BaselineError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Baseline translation error ({}): {}", status, message);
            return Err(BaselineError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BaselineError::ParseError(e.to_string()))?;

        let translated = Self::parse_response(&body)?;
        debug!("Baseline {} -> {}: {}", self.source_language, target_code, translated);
        Ok(translated)
    }
}
